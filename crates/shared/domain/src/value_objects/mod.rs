//! Value objects owned by the password entry aggregate.
//!
//! Every value object normalizes its raw input, validates it, and is
//! immutable afterwards. Two instances holding the same normalized value
//! compare equal. Invalid input fails with the variant of
//! [`DomainError`](crate::DomainError) named after the type.

mod category;
mod encrypted_password;
mod notes;
mod site_name;
mod site_url;
mod tag;
mod timestamps;
mod username;

pub use category::Category;
pub use encrypted_password::EncryptedPassword;
pub use notes::Notes;
pub use site_name::SiteName;
pub use site_url::SiteUrl;
pub use tag::{Tag, Tags};
pub use timestamps::{CreatedAt, UpdatedAt};
pub use username::Username;

/// Capability shared by all value objects: projection to a persistable primitive.
pub trait ValueObject: Clone + PartialEq + Eq + std::fmt::Debug {
    /// Primitive form stored by the persistence layer
    type Primitive;

    /// Project the normalized value to its primitive form.
    fn to_primitive(&self) -> Self::Primitive;
}

/// Implements the conversions shared by every required string value object.
///
/// The type must be a single-field tuple struct over `String` exposing a
/// fallible `new(&str)` constructor.
macro_rules! impl_string_value_object {
    ($t:ty) => {
        impl $t {
            /// Borrow the normalized value.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the normalized value.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<&str> for $t {
            type Error = $crate::error::DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                <$t>::new(value)
            }
        }

        impl TryFrom<String> for $t {
            type Error = $crate::error::DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                <$t>::new(&value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl $crate::value_objects::ValueObject for $t {
            type Primitive = String;

            fn to_primitive(&self) -> String {
                self.0.clone()
            }
        }
    };
}

pub(crate) use impl_string_value_object;
