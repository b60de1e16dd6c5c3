//! Validation module
//!
//! Identifier checks for everything that ends up in SQL text instead of a
//! bound parameter, plus the argument errors the builder reports.

use std::fmt;

/// Validation errors for identifiers and builder arguments
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
    /// `with` referenced a relation the model does not declare
    UnknownRelation { model: String, relation: String },
    /// Two eager relations would produce the same aggregate column
    DuplicateRelation(String),
    /// Operator text that does not map to a supported operator
    UnknownOperator(String),
    /// Pagination asked for zero rows per page
    InvalidPageSize,
    /// Write payload was not a JSON object
    ExpectedObject(String),
    /// Update payload had no fillable column in it
    NothingToUpdate(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => {
                write!(f, "Name cannot be empty")
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQL keyword", name)
            }
            ValidationError::UnknownRelation { model, relation } => {
                write!(f, "Model '{}' has no relation named '{}'", model, relation)
            }
            ValidationError::DuplicateRelation(alias) => {
                write!(f, "Relation column '{}' is already eager loaded", alias)
            }
            ValidationError::UnknownOperator(op) => {
                write!(f, "Unsupported query operator '{}'", op)
            }
            ValidationError::InvalidPageSize => {
                write!(f, "Page size must be at least 1")
            }
            ValidationError::ExpectedObject(found) => {
                write!(f, "Expected a JSON object payload, found {}", found)
            }
            ValidationError::NothingToUpdate(table) => {
                write!(f, "Update on '{}' has no fillable columns to set", table)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// PostgreSQL identifier length limit
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Common validation logic for SQL identifiers
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }

    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if is_reserved_keyword(name) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

/// Check if a name is a reserved SQL keyword
fn is_reserved_keyword(name: &str) -> bool {
    // Words PostgreSQL refuses as bare column or table names
    const RESERVED_KEYWORDS: &[&str] = &[
        "ALL", "AND", "ANY", "ARRAY", "AS", "ASC", "BETWEEN", "BOTH", "CASE", "CAST", "CHECK",
        "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DO",
        "DROP", "ELSE", "END", "EXCEPT", "FALSE", "FOR", "FOREIGN", "FROM", "FULL", "GRANT",
        "GROUP", "HAVING", "IN", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "LEADING",
        "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY",
        "REFERENCES", "RETURNING", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE",
        "UNION", "UNIQUE", "UPDATE", "USING", "WHEN", "WHERE", "WITH",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

/// A validated table name that is safe to use in SQL queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedTableName(String);

impl ValidatedTableName {
    /// Create a new validated table name
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A column reference accepted by the builder.
///
/// Accepts `column`, `table.column`, `table.*` and the bare `*` projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedColumnRef(String);

impl ValidatedColumnRef {
    pub fn new(reference: &str) -> Result<Self, ValidationError> {
        let reference = reference.trim();
        if reference == "*" {
            return Ok(Self(reference.to_string()));
        }

        match reference.split_once('.') {
            Some((table, column)) => {
                validate_identifier(table)?;
                if column != "*" {
                    validate_identifier(column)?;
                }
            }
            None => validate_identifier(reference)?,
        }

        Ok(Self(reference.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
