//! Transfer configuration

use crate::progress::ProgressSink;
use sqlship_core::TlsMode;
use sqlship_core_types::Sensitive;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default connect/response timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a `TransferClient`
///
/// The password is only exposed to the transport while configuring a
/// connection; `Debug` redacts it.
#[derive(Clone)]
pub struct TransferConfig {
    host: String,
    port: u16,
    user: String,
    password: Sensitive<String>,
    ssl_verify: bool,
    tls: TlsMode,
    timeout: Duration,
    max_retries: u32,
    verbose: bool,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl TransferConfig {
    /// Configuration with a single attempt, TLS required and peer/host
    /// verification on
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: Sensitive<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password,
            ssl_verify: true,
            tls: TlsMode::Required,
            timeout: DEFAULT_TIMEOUT,
            max_retries: 1,
            verbose: false,
            progress: None,
        }
    }

    /// Maximum number of attempts; zero is raised to one
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Emit the protocol trace at DEBUG
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Install a progress sink invoked during every attempt
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &Sensitive<String> {
        &self.password
    }

    pub fn ssl_verify(&self) -> bool {
        self.ssl_verify
    }

    pub fn tls(&self) -> TlsMode {
        self.tls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn progress_sink(&self) -> Option<&Arc<dyn ProgressSink>> {
        self.progress.as_ref()
    }
}

impl fmt::Debug for TransferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password)
            .field("ssl_verify", &self.ssl_verify)
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("verbose", &self.verbose)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}
