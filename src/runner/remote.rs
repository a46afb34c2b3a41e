//! Remote pairing output handling
//!
//! TestCafe prints the connect URL and waits for a device. We relay its
//! output, point the connect URL at the LAN address and note when pairing
//! is done. Every other line is relayed untouched.

/// Something notable in TestCafe's output during remote pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingEvent {
    /// The URL a device has to open
    ConnectUrl(String),
    /// A device attached and tests started
    Connected,
}

/// Replace loopback host names in a line with the LAN address
pub fn rewrite_loopback(line: &str, host: &str) -> String {
    line.replace("localhost", host).replace("127.0.0.1", host)
}

/// Classify an output line
pub fn classify(line: &str) -> Option<PairingEvent> {
    let trimmed = line.trim();
    if let Some(idx) = trimmed.find("http://").or_else(|| trimmed.find("https://")) {
        let url = &trimmed[idx..];
        if url.contains("/browser/connect") {
            let url = url.split_whitespace().next().unwrap_or(url);
            return Some(PairingEvent::ConnectUrl(url.to_string()));
        }
    }
    if trimmed.starts_with("Running tests in:") || trimmed.starts_with("Remote browser connected") {
        return Some(PairingEvent::Connected);
    }
    None
}

/// Prepare one relayed line: only the connect URL line is rewritten
pub fn relay_line(line: &str, host: &str) -> (String, Option<PairingEvent>) {
    match classify(line) {
        Some(PairingEvent::ConnectUrl(url)) => (
            rewrite_loopback(line, host),
            Some(PairingEvent::ConnectUrl(rewrite_loopback(&url, host))),
        ),
        event => (line.to_string(), event),
    }
}

/// Failed count from the reporter summary, e.g. ` 2/5 failed (1m 3s)`
///
/// The exit status wraps at 256, so this line is the reliable count.
pub fn parse_failed_summary(line: &str) -> Option<u32> {
    let (failed, rest) = line.trim().split_once('/')?;
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let (total, tail) = rest.split_once(' ')?;
    if !digits(failed) || !digits(total) || !tail.starts_with("failed") {
        return None;
    }
    failed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_loopback() {
        assert_eq!(
            rewrite_loopback("http://localhost:12345/browser/connect", "192.168.0.7"),
            "http://192.168.0.7:12345/browser/connect"
        );
        assert_eq!(
            rewrite_loopback("http://127.0.0.1:12345/browser/connect/abc", "10.0.0.2"),
            "http://10.0.0.2:12345/browser/connect/abc"
        );
        assert_eq!(rewrite_loopback("no host here", "10.0.0.2"), "no host here");
    }

    #[test]
    fn test_classify_connect_url() {
        assert_eq!(
            classify("Connect URL: http://10.0.0.2:12345/browser/connect"),
            Some(PairingEvent::ConnectUrl(
                "http://10.0.0.2:12345/browser/connect".to_string()
            ))
        );
        assert_eq!(
            classify("  http://10.0.0.2:12345/browser/connect/XyZ  "),
            Some(PairingEvent::ConnectUrl(
                "http://10.0.0.2:12345/browser/connect/XyZ".to_string()
            ))
        );
    }

    #[test]
    fn test_classify_connected() {
        assert_eq!(
            classify(" Running tests in:"),
            Some(PairingEvent::Connected)
        );
        assert_eq!(classify("   - Chrome 120.0 / Android 14"), None);
        assert_eq!(classify("see http://example.com/docs"), None);
    }

    #[test]
    fn test_relay_rewrites_only_connect_url() {
        let (line, event) = relay_line("Connect URL: http://localhost:12345/browser/connect", "10.1.2.3");
        assert_eq!(line, "Connect URL: http://10.1.2.3:12345/browser/connect");
        assert_eq!(
            event,
            Some(PairingEvent::ConnectUrl(
                "http://10.1.2.3:12345/browser/connect".to_string()
            ))
        );

        let assertion = "AssertionError: expected 'http://localhost:3000/home' to equal 'http://127.0.0.1:3000/login'";
        let (line, event) = relay_line(assertion, "10.1.2.3");
        assert_eq!(line, assertion);
        assert_eq!(event, None);
    }

    #[test]
    fn test_parse_failed_summary() {
        assert_eq!(parse_failed_summary(" 2/5 failed (1m 3s)"), Some(2));
        assert_eq!(parse_failed_summary(" 256/300 failed (9m 1s)"), Some(256));
        assert_eq!(parse_failed_summary(" 5 passed (12s)"), None);
        assert_eq!(parse_failed_summary("   - Chrome 120.0 / Android 14"), None);
        assert_eq!(parse_failed_summary("1/2 skipped"), None);
    }
}
