//! Redaction wrapper for credential values
//!
//! Component defaults carry development credentials (database passwords,
//! object-store keys). They are rendered into manifests verbatim but must not
//! leak into log output, so they travel through logging as `Sensitive<T>`.

use std::fmt;

/// A value that prints as `***REDACTED***` in both Debug and Display
///
/// ```
/// use kdev_core_types::Sensitive;
///
/// let password = Sensitive::new("devpassword");
/// assert_eq!(format!("{}", password), "***REDACTED***");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

const REDACTED: &str = "***REDACTED***";

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
