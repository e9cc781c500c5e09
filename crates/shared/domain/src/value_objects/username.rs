use std::fmt;

use crate::error::{DomainError, DomainResult};

use super::impl_string_value_object;

/// Login name stored for a site. Any non-blank text, e-mail addresses included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(value: &str) -> DomainResult<Self> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidUsername(
                "Username cannot be empty".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl_string_value_object!(Username);

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_trimmed() {
        let username = Username::new("  a@b.com\n").unwrap();
        assert_eq!(username.as_str(), "a@b.com");
    }

    #[test]
    fn test_username_blank_rejected() {
        let result = Username::new("   ");
        assert!(matches!(result, Err(DomainError::InvalidUsername(_))));
    }

    #[test]
    fn test_username_keeps_case() {
        let username = Username::new("Alice").unwrap();
        assert_eq!(username.to_string(), "Alice");
        assert_ne!(username, Username::new("alice").unwrap());
    }
}
