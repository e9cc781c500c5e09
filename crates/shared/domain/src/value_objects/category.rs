use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CATEGORY_EMAIL, CATEGORY_FINANCE, CATEGORY_OTHER, CATEGORY_PERSONAL, CATEGORY_SHOPPING,
    CATEGORY_SOCIAL, CATEGORY_WORK, VALID_CATEGORIES,
};
use crate::error::{DomainError, DomainResult};

use super::ValueObject;

/// Closed set of entry categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Personal,
    Work,
    Finance,
    Social,
    Email,
    Shopping,
    Other,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Category; 7] = [
        Category::Personal,
        Category::Work,
        Category::Finance,
        Category::Social,
        Category::Email,
        Category::Shopping,
        Category::Other,
    ];

    /// Match an exact upper-case label (the persisted form).
    ///
    /// # Errors
    /// `InvalidCategory` for anything outside the enumeration.
    pub fn new(label: &str) -> DomainResult<Self> {
        match label {
            CATEGORY_PERSONAL => Ok(Category::Personal),
            CATEGORY_WORK => Ok(Category::Work),
            CATEGORY_FINANCE => Ok(Category::Finance),
            CATEGORY_SOCIAL => Ok(Category::Social),
            CATEGORY_EMAIL => Ok(Category::Email),
            CATEGORY_SHOPPING => Ok(Category::Shopping),
            CATEGORY_OTHER => Ok(Category::Other),
            _ => Err(DomainError::InvalidCategory(format!(
                "'{}' is not one of {}",
                label,
                VALID_CATEGORIES.join(", ")
            ))),
        }
    }

    /// Case-insensitive parse of free text: upper-cases, then validates.
    pub fn from_string(value: &str) -> DomainResult<Self> {
        Self::new(&value.to_uppercase())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => CATEGORY_PERSONAL,
            Category::Work => CATEGORY_WORK,
            Category::Finance => CATEGORY_FINANCE,
            Category::Social => CATEGORY_SOCIAL,
            Category::Email => CATEGORY_EMAIL,
            Category::Shopping => CATEGORY_SHOPPING,
            Category::Other => CATEGORY_OTHER,
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl ValueObject for Category {
    type Primitive = String;

    fn to_primitive(&self) -> String {
        self.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_string_is_case_insensitive() {
        assert_eq!(Category::from_string("email").unwrap(), Category::Email);
        assert_eq!(Category::from_string("Work").unwrap(), Category::Work);
        assert_eq!("shopping".parse::<Category>().unwrap(), Category::Shopping);
    }

    #[test]
    fn test_category_new_is_strict() {
        assert_eq!(Category::new("FINANCE").unwrap(), Category::Finance);
        assert!(matches!(
            Category::new("finance"),
            Err(DomainError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_category_unknown_rejected() {
        let err = Category::from_string("games").unwrap_err();
        assert!(matches!(err, DomainError::InvalidCategory(_)));
        assert!(err.to_string().contains("PERSONAL"));
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::new(category.as_str()).unwrap(), category);
            assert!(crate::constants::is_valid_category(&category.to_string()));
        }
    }
}
