//! libcurl-backed transport
//!
//! Each attempt builds a new `Easy` handle so no connection state leaks from
//! a failed attempt into the next one.

use crate::config::TransferConfig;
use crate::progress::TransferProgress;
use crate::transport::{response_lines, AttemptFailure, Transport, TransferEvents, UploadRequest};
use curl::easy::{Easy, InfoType, ReadError};
use sqlship_core::TlsMode;
use std::io::Read;
use std::os::raw::c_long;

/// `CURLFTP_CREATE_DIR_RETRY`: MKD missing directories, retry CWD once
const FTP_CREATE_DIR_RETRY: c_long = 2;

/// FTP/FTPS uploads through libcurl
#[derive(Debug, Clone, Copy)]
pub struct CurlTransport;

impl CurlTransport {
    /// Initialize libcurl's global state (idempotent)
    pub fn new() -> Self {
        curl::init();
        Self
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn ssl_level(mode: TlsMode) -> c_long {
    let level = match mode {
        TlsMode::Required => curl_sys::CURLUSESSL_ALL,
        TlsMode::Optional => curl_sys::CURLUSESSL_TRY,
        TlsMode::Disabled => curl_sys::CURLUSESSL_NONE,
    };
    level as c_long
}

/// Set a long-valued option the safe `Easy` API does not expose
fn set_long(
    easy: &mut Easy,
    option: curl_sys::CURLoption,
    value: c_long,
) -> Result<(), curl::Error> {
    // SAFETY: the handle is live for the duration of the call and `option`
    // is a CURLOPTTYPE_LONG option, so libcurl reads exactly one long.
    let code = unsafe { curl_sys::curl_easy_setopt(easy.raw(), option, value) };
    if code == curl_sys::CURLE_OK {
        Ok(())
    } else {
        Err(curl::Error::new(code))
    }
}

fn configure(
    easy: &mut Easy,
    request: &UploadRequest<'_>,
    config: &TransferConfig,
) -> Result<(), curl::Error> {
    easy.url(request.url)?;
    if !config.user().is_empty() {
        easy.username(config.user())?;
    }
    if !config.password().expose().is_empty() {
        easy.password(config.password().expose())?;
    }

    set_long(easy, curl_sys::CURLOPT_USE_SSL, ssl_level(config.tls()))?;
    easy.ssl_verify_peer(config.ssl_verify())?;
    easy.ssl_verify_host(config.ssl_verify())?;

    easy.upload(true)?;
    easy.in_filesize(request.size)?;
    set_long(
        easy,
        curl_sys::CURLOPT_FTP_CREATE_MISSING_DIRS,
        FTP_CREATE_DIR_RETRY,
    )?;

    // A stalled control or data channel counts as a response timeout.
    easy.connect_timeout(config.timeout())?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(config.timeout())?;

    easy.verbose(config.verbose())?;
    easy.progress(config.progress_sink().is_some())?;
    Ok(())
}

fn trace_prefix(kind: InfoType) -> Option<&'static str> {
    match kind {
        InfoType::Text => Some("*"),
        InfoType::HeaderIn => Some("<"),
        InfoType::HeaderOut => Some(">"),
        _ => None,
    }
}

impl Transport for CurlTransport {
    fn upload(
        &self,
        request: &UploadRequest<'_>,
        body: &mut dyn Read,
        events: &dyn TransferEvents,
    ) -> Result<(), AttemptFailure> {
        let config = request.config;
        let setup = |e: curl::Error| AttemptFailure::Setup(e.to_string());

        let mut easy = Easy::new();
        configure(&mut easy, request, config).map_err(setup)?;

        let mut transfer = easy.transfer();
        transfer
            .read_function(|buf| body.read(buf).map_err(|_| ReadError::Abort))
            .map_err(setup)?;
        transfer
            .header_function(|data| {
                for line in response_lines(data) {
                    events.server_line(&line);
                }
                true
            })
            .map_err(setup)?;
        transfer
            .write_function(|data| {
                for line in response_lines(data) {
                    events.server_line(&line);
                }
                Ok(data.len())
            })
            .map_err(setup)?;
        if config.progress_sink().is_some() {
            transfer
                .progress_function(|_dltotal, _dlnow, ultotal, ulnow| {
                    events.progress(TransferProgress::upload(ultotal as u64, ulnow as u64));
                    true
                })
                .map_err(setup)?;
        }
        if config.verbose() {
            transfer
                .debug_function(|kind, data| {
                    if let Some(prefix) = trace_prefix(kind) {
                        for line in response_lines(data) {
                            events.trace(&format!("{} {}", prefix, line));
                        }
                    }
                })
                .map_err(setup)?;
        }

        transfer
            .perform()
            .map_err(|e| AttemptFailure::Transfer(e.to_string()))
    }
}
