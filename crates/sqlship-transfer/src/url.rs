//! Remote URL construction

/// Scheme used for every upload; TLS is negotiated on top (explicit FTPS)
pub const SCHEME: &str = "ftp";

/// Compose `ftp://host[:port]/remote_dir/filename`
///
/// Backslashes in `remote_dir` become forward slashes and leading/trailing
/// slashes are stripped, so `dir\sub\` and `/dir/sub/` give the same URL.
/// Port 0 omits the port segment.
pub fn build_url(host: &str, port: u16, remote_dir: &str, filename: &str) -> String {
    let cleaned = remote_dir.replace('\\', "/");
    let cleaned = cleaned.trim_matches('/');

    let mut url = format!("{}://{}", SCHEME, host);
    if port > 0 {
        url.push_str(&format!(":{}", port));
    }
    if !cleaned.is_empty() {
        url.push('/');
        url.push_str(cleaned);
    }
    url.push('/');
    url.push_str(filename);
    url
}
