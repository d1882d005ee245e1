//! Connection URL fix-up for the scanner's credential parser.

/// Append a trailing `@` to a connection URL when the scanner needs one.
///
/// The rule is purely syntactic: the URL must contain `://`, must not
/// already contain `@`, and must not end with `//`. Nothing else is
/// checked or rewritten.
///
/// ```
/// use rdpshot_core::url::normalize_url;
///
/// assert_eq!(normalize_url("rdp://"), "rdp://");
/// assert_eq!(
///     normalize_url(r"rdp+ntlm-password://DOMAIN\user:pass"),
///     r"rdp+ntlm-password://DOMAIN\user:pass@",
/// );
/// ```
pub fn normalize_url(url: &str) -> String {
    if url.contains("://") && !url.contains('@') && !url.ends_with("//") {
        format!("{url}@")
    } else {
        url.to_owned()
    }
}
