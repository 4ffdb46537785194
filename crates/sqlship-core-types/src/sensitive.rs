//! Sensitive data marker for automatic redaction
//!
//! Server credentials travel through configuration, the transfer client and
//! log statements. Wrapping them in `Sensitive<T>` keeps them out of every
//! `Debug` and `Display` rendering.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use sqlship_core_types::Sensitive;
///
/// let password = Sensitive::new("secret123");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(format!("{}", password), "***REDACTED***");
///
/// // Access the actual value when authenticating
/// assert_eq!(password.expose(), &"secret123");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    ///
    /// Only the transport should call this, right before authenticating.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Sensitive<String> {
    /// Length-preserving mask for startup logs (`<empty>` when empty)
    pub fn masked(&self) -> String {
        if self.0.is_empty() {
            "<empty>".to_string()
        } else {
            "*".repeat(self.0.chars().count())
        }
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Sensitive<T> {
    fn default() -> Self {
        Self(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_redaction() {
        let secret = Sensitive::new("ftp-password");
        let debug_str = format!("{:?}", secret);
        assert_eq!(debug_str, "***REDACTED***");
        assert!(!debug_str.contains("ftp-password"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let secret = Sensitive::new("hunter2");
        assert_eq!(format!("{}", secret), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_expose_and_into_inner() {
        let secret = Sensitive::new(String::from("pw"));
        assert_eq!(secret.expose(), "pw");
        assert_eq!(secret.into_inner(), "pw");
    }

    #[test]
    fn test_masked_preserves_length() {
        assert_eq!(Sensitive::new("abcd".to_string()).masked(), "****");
        assert_eq!(Sensitive::new(String::new()).masked(), "<empty>");
    }

    #[test]
    fn test_sensitive_inside_config_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            user: String,
            password: Sensitive<String>,
        }

        let creds = Credentials {
            user: "backup".to_string(),
            password: Sensitive::new("secret123".to_string()),
        };

        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("backup"));
        assert!(debug_str.contains("***REDACTED***"));
        assert!(!debug_str.contains("secret123"));
    }
}
