//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Maximum length of a site name, in characters
pub const MAX_SITE_NAME_LENGTH: usize = 100;

/// Maximum length of free-form notes, in characters
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Maximum length of a single tag, in characters
pub const MAX_TAG_LENGTH: usize = 30;

/// Minimum length of an encrypted password payload.
///
/// A structural floor only; the decrypt step is the real trust boundary.
pub const MIN_ENCRYPTED_PASSWORD_LENGTH: usize = 32;

/// Allowed tag characters after normalization
pub const TAG_PATTERN: &str = r"^[a-z0-9_-]+$";

// =============================================================================
// Categories
// =============================================================================

pub const CATEGORY_PERSONAL: &str = "PERSONAL";
pub const CATEGORY_WORK: &str = "WORK";
pub const CATEGORY_FINANCE: &str = "FINANCE";
pub const CATEGORY_SOCIAL: &str = "SOCIAL";
pub const CATEGORY_EMAIL: &str = "EMAIL";
pub const CATEGORY_SHOPPING: &str = "SHOPPING";
pub const CATEGORY_OTHER: &str = "OTHER";

/// All valid category labels
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_PERSONAL,
    CATEGORY_WORK,
    CATEGORY_FINANCE,
    CATEGORY_SOCIAL,
    CATEGORY_EMAIL,
    CATEGORY_SHOPPING,
    CATEGORY_OTHER,
];

/// Check if a category label is valid (case-sensitive, upper-case labels)
pub fn is_valid_category(category: &str) -> bool {
    VALID_CATEGORIES.contains(&category)
}
