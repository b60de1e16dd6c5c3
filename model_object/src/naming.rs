//! Table naming
//!
//! Derives a table name from a Rust type name: `BlogPost` becomes
//! `blog_posts`, `Category` becomes `categories`.

/// Table name for `T`, derived from its type name.
pub fn table_name_for<T: ?Sized>() -> String {
    table_name_from_type_path(std::any::type_name::<T>())
}

/// Strip the module path and generic arguments, then snake-case and pluralize.
pub fn table_name_from_type_path(path: &str) -> String {
    let without_generics = path.split('<').next().unwrap_or(path);
    let base = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);

    pluralize(&to_snake_case(base))
}

/// Every uppercase letter after the first starts a new underscore-separated word.
pub fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }

    snake
}

pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let after_vowel = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
        if !after_vowel {
            return format!("{}ies", stem);
        }
    } else if word.ends_with('s') {
        return word.to_string();
    }

    format!("{}s", word)
}
