//! Type-safe string keys for the portal's entities.
//!
//! Students are identified by their national identity number and courses
//! by their catalog code. Both are plain strings in the store; wrapping
//! them prevents passing a course code where a student id is expected.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(String);

        impl $name {
            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_key! {
    /// Identity number of a student (`idnr` in the store).
    StudentId
}

define_key! {
    /// Catalog code of a course, e.g. `CCC111`.
    CourseCode
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn keys_serialize_as_bare_strings() {
        let student = StudentId::from("1111111111");
        assert_eq!(serde_json::to_string(&student).unwrap(), "\"1111111111\"");

        let course: CourseCode = serde_json::from_str("\"CCC111\"").unwrap();
        assert_eq!(course.as_str(), "CCC111");
    }

    #[test]
    fn keys_order_lexically() {
        let a = CourseCode::from("CCC111");
        let b = CourseCode::from("CCC222");
        assert!(a < b);
        assert_eq!(a.to_string(), "CCC111");
    }

    #[test]
    fn keys_convert_back_to_plain_strings() {
        let student = StudentId::from("2222222222".to_owned());
        assert_eq!(student.as_ref(), "2222222222");
        assert_eq!(String::from(student), "2222222222");
    }
}
