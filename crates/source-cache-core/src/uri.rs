//! Syntactic URI classification.
//!
//! These helpers never touch the network or the filesystem. They only look
//! at the shape of a string to decide whether it carries a scheme and
//! whether it points at the local machine.

/// Prefixes (lower-cased) that identify a local file or a loopback host.
const LOCAL_PREFIXES: &[&str] = &[
    "file:",
    "http://127.0.0.1",
    "http://localhost",
    "https://localhost",
    "https://127.0.0.1",
];

/// Returns `true` if `s` starts with an RFC 3986 scheme followed by `:`.
///
/// A scheme is a letter followed by any number of letters, digits, `+`,
/// `.` or `-`. Nothing after the colon is validated.
pub fn is_global_uri(s: &str) -> bool {
    scheme_end(s).is_some()
}

/// Returns the scheme of `s` (the text before the first `:`), or `None`
/// when `s` is not a global URI.
pub fn scheme(s: &str) -> Option<&str> {
    scheme_end(s).map(|end| &s[..end])
}

/// Returns `true` if `s` refers to a local file or a loopback HTTP(S) host.
pub fn is_local_file_or_loopback(s: &str) -> bool {
    let lower = s.to_lowercase();
    LOCAL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

fn scheme_end(s: &str) -> Option<usize> {
    let colon = s.find(':')?;
    let mut chars = s[..colon].chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        .then_some(colon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_schemes_are_global() {
        assert!(is_global_uri("file:///tmp/a.txt"));
        assert!(is_global_uri("https://example.org/notes.md"));
        assert!(is_global_uri("urn:src:notes"));
        assert!(is_global_uri("git+ssh://host/repo"));
        assert!(is_global_uri("x-custom.v1:whatever"));
    }

    #[test]
    fn test_rejects_invalid_schemes() {
        assert!(!is_global_uri("/tmp/a.txt"));
        assert!(!is_global_uri("relative/path"));
        assert!(!is_global_uri(":no-scheme"));
        assert!(!is_global_uri("1http://example.org"));
        assert!(!is_global_uri("ht tp://example.org"));
        assert!(!is_global_uri("ht_tp://example.org"));
        assert!(!is_global_uri(""));
    }

    #[test]
    fn test_scheme_extraction() {
        assert_eq!(scheme("file:///tmp/a.txt"), Some("file"));
        assert_eq!(scheme("HTTPS://example.org"), Some("HTTPS"));
        assert_eq!(scheme("mailto:someone@example.org"), Some("mailto"));
        assert_eq!(scheme("/etc/hosts"), None);
        assert_eq!(scheme("no colon here"), None);
    }

    #[test]
    fn test_local_and_loopback() {
        assert!(is_local_file_or_loopback("file:///tmp/a.txt"));
        assert!(is_local_file_or_loopback("FILE:///tmp/a.txt"));
        assert!(is_local_file_or_loopback("http://localhost:8080/x"));
        assert!(is_local_file_or_loopback("https://LOCALHOST/x"));
        assert!(is_local_file_or_loopback("http://127.0.0.1:3000"));
        assert!(is_local_file_or_loopback("https://127.0.0.1"));
    }

    #[test]
    fn test_remote_is_not_local() {
        assert!(!is_local_file_or_loopback("https://example.org"));
        assert!(!is_local_file_or_loopback("http://10.0.0.1/file"));
        assert!(!is_local_file_or_loopback("ftp://localhost/file"));
        assert!(!is_local_file_or_loopback("/tmp/a.txt"));
    }
}
