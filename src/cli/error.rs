// Error handling utilities for consistent error messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a document ID is valid (positive integer)
pub fn validate_document_id(id_str: &str) -> Result<i64, String> {
    id_str.parse::<i64>()
        .map_err(|_| format!("Invalid document ID: '{}'. Document ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(id)
            } else {
                Err(format!("Invalid document ID: {}. Document ID must be positive.", id))
            }
        })
}

/// Validate category name (letters, numbers, spaces, dots, underscores, hyphens, '?')
pub fn validate_category(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category cannot be empty".to_string());
    }

    // '?' is the placeholder category for unclassified documents
    if name.chars().all(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-' | '?')) {
        Ok(())
    } else {
        Err(format!("Invalid category: '{}'. Categories can only contain letters, numbers, spaces, dots, underscores, hyphens and '?'.", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("test", "field").is_ok());
        assert!(validate_non_empty("", "field").is_err());
        assert!(validate_non_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_document_id() {
        assert_eq!(validate_document_id("1"), Ok(1));
        assert_eq!(validate_document_id("42"), Ok(42));
        assert!(validate_document_id("0").is_err());
        assert!(validate_document_id("-1").is_err());
        assert!(validate_document_id("abc").is_err());
        assert!(validate_document_id("").is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Securities").is_ok());
        assert!(validate_category("Risk management").is_ok());
        assert!(validate_category("?").is_ok());
        assert!(validate_category("").is_err());
        assert!(validate_category("risk/management").is_err());
    }
}
