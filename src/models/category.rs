//! Category names
//!
//! Categories are plain names in an ordered list. Transactions and budgets refer
//! to them by name, so renaming or removing one leaves existing references as
//! they are.

use std::fmt;

/// Categories seeded into a fresh ledger
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Salary",
    "Food & Drink",
    "Transport",
    "Shopping",
    "Entertainment",
    "Health",
    "Education",
    "Home",
];

/// The default category list as owned strings
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Find a category by name, ignoring case and surrounding whitespace
pub fn find_category<'a>(categories: &'a [String], name: &str) -> Option<&'a String> {
    let name = name.trim();
    categories.iter().find(|c| c.eq_ignore_ascii_case(name))
}

/// Validate a new category name against the existing list
pub fn validate_category_name(
    categories: &[String],
    name: &str,
) -> Result<(), CategoryValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    if name.len() > 50 {
        return Err(CategoryValidationError::NameTooLong(name.len()));
    }
    if find_category(categories, name).is_some() {
        return Err(CategoryValidationError::Duplicate(name.to_string()));
    }
    Ok(())
}

/// Validation errors for category names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    Duplicate(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::Duplicate(name) => write!(f, "Category '{}' already exists", name),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let categories = default_categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(categories[0], "Salary");
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let categories = default_categories();
        assert_eq!(
            find_category(&categories, " transport ").map(String::as_str),
            Some("Transport")
        );
        assert!(find_category(&categories, "Travel").is_none());
    }

    #[test]
    fn test_validate_name() {
        let categories = default_categories();
        assert!(validate_category_name(&categories, "Travel").is_ok());
        assert_eq!(
            validate_category_name(&categories, "   "),
            Err(CategoryValidationError::EmptyName)
        );
        assert_eq!(
            validate_category_name(&categories, "HEALTH"),
            Err(CategoryValidationError::Duplicate("HEALTH".into()))
        );
        assert!(matches!(
            validate_category_name(&categories, &"x".repeat(51)),
            Err(CategoryValidationError::NameTooLong(51))
        ));
    }
}
