use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ShipError
pub type Result<T> = std::result::Result<T, ShipError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every `ShipError` maps onto exactly one kind, and each kind has a stable
/// code used in structured log events and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Store
    Schema,
    Write,
    Query,
    Backup,

    // Transfer
    LocalFileMissing,
    ConnectionInit,
    UploadFailed,

    // Configuration
    InvalidConfig,
    MissingCredential,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::Write => "ERR_WRITE",
            ExErrorKind::Query => "ERR_QUERY",
            ExErrorKind::Backup => "ERR_BACKUP",
            ExErrorKind::LocalFileMissing => "ERR_LOCAL_FILE_MISSING",
            ExErrorKind::ConnectionInit => "ERR_CONNECTION_INIT",
            ExErrorKind::UploadFailed => "ERR_UPLOAD_FAILED",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::MissingCredential => "ERR_MISSING_CREDENTIAL",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// A flattened, log-friendly view of a `ShipError`: classification plus the
/// context fields that help when reading a failed run's log.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    attempts: Option<u32>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            attempts: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add attempt count context
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Get the attempt count, if any
    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(attempts) = self.attempts {
            write!(f, " (attempts: {})", attempts)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for sqlship operations
///
/// Store and transfer errors propagate unmodified up to the orchestrator,
/// which is the only place they are caught and turned into a pass/fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShipError {
    // ===== Store Errors =====
    /// The engine rejected schema DDL
    #[error("Schema error: {reason}")]
    Schema { reason: String },

    /// A write (or its transaction) failed; nothing from the batch is visible
    #[error("Write error: {reason}")]
    Write { reason: String },

    /// A read query failed at engine level
    #[error("Query error: {reason}")]
    Query { reason: String },

    /// The online backup did not reach a clean completion state
    #[error("Backup to {} failed: {reason}", path.display())]
    Backup { path: PathBuf, reason: String },

    // ===== Transfer Errors =====
    /// The file to upload does not exist or cannot be opened
    #[error("Local file does not exist: {}", path.display())]
    LocalFileMissing { path: PathBuf },

    /// A connection handle could not be configured
    #[error("Failed to initialize connection: {reason}")]
    ConnectionInitFailed { reason: String },

    /// Every attempt failed; `detail` is the last attempt's error text
    #[error("Upload failed after {attempts} attempt(s): {detail}")]
    UploadFailed { attempts: u32, detail: String },

    // ===== Configuration Errors =====
    /// A configuration value is out of range or malformed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A credential was requested from the environment but is absent
    #[error("Credential requested from environment but {variable} is not set")]
    MissingCredential { variable: String },

    // ===== IO / Internal =====
    /// Filesystem failure outside the store and transfer taxonomies
    #[error("I/O error during {op}: {reason}")]
    Io { op: String, reason: String },

    /// Unexpected failure (e.g. a contained panic)
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl ShipError {
    /// Kind classification of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ShipError::Schema { .. } => ExErrorKind::Schema,
            ShipError::Write { .. } => ExErrorKind::Write,
            ShipError::Query { .. } => ExErrorKind::Query,
            ShipError::Backup { .. } => ExErrorKind::Backup,
            ShipError::LocalFileMissing { .. } => ExErrorKind::LocalFileMissing,
            ShipError::ConnectionInitFailed { .. } => ExErrorKind::ConnectionInit,
            ShipError::UploadFailed { .. } => ExErrorKind::UploadFailed,
            ShipError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            ShipError::MissingCredential { .. } => ExErrorKind::MissingCredential,
            ShipError::Io { .. } => ExErrorKind::Io,
            ShipError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    /// True for failures the CLI reports as configuration errors
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ShipError::InvalidConfig { .. } | ShipError::MissingCredential { .. }
        )
    }

    /// Shorthand for an IO error with operation context
    pub fn io(op: impl Into<String>, err: &std::io::Error) -> Self {
        ShipError::Io {
            op: op.into(),
            reason: err.to_string(),
        }
    }
}

impl From<ShipError> for ExError {
    fn from(err: ShipError) -> Self {
        let base = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            ShipError::Backup { path, .. } => base.with_op("backup").with_path(path),
            ShipError::LocalFileMissing { path } => base.with_op("upload_file").with_path(path),
            ShipError::UploadFailed { attempts, .. } => {
                base.with_op("upload_file").with_attempts(attempts)
            }
            ShipError::ConnectionInitFailed { .. } => base.with_op("upload_file"),
            ShipError::Schema { .. } => base.with_op("ensure_schema"),
            ShipError::Write { .. } => base.with_op("insert_rows"),
            ShipError::Io { op, .. } => base.with_op(op),
            _ => base,
        }
    }
}

impl From<&ShipError> for ExError {
    fn from(err: &ShipError) -> Self {
        err.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::Schema,
            ExErrorKind::Write,
            ExErrorKind::Query,
            ExErrorKind::Backup,
            ExErrorKind::LocalFileMissing,
            ExErrorKind::ConnectionInit,
            ExErrorKind::UploadFailed,
            ExErrorKind::InvalidConfig,
            ExErrorKind::MissingCredential,
            ExErrorKind::Io,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_ex_error_display_includes_context() {
        let err = ExError::new(ExErrorKind::UploadFailed)
            .with_op("upload_file")
            .with_attempts(3)
            .with_message("timeout");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_UPLOAD_FAILED]"));
        assert!(rendered.contains("upload_file"));
        assert!(rendered.contains("attempts: 3"));
    }
}
