//! Shared field validators.

use super::Error;

/// Structural e-mail check: one `@`, non-empty local part, dotted domain.
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2
}

/// Validate an e-mail or fail with the standard message.
///
/// # Errors
///
/// Returns [`Error::invalid_request`] when the address is malformed.
pub fn require_email(candidate: &str) -> Result<(), Error> {
    if is_valid_email(candidate) {
        Ok(())
    } else {
        Err(Error::invalid_request("Please add a valid email address"))
    }
}

/// Accept `http://`, `https://`, or `www.`-prefixed URLs.
#[must_use]
pub fn is_valid_url(candidate: &str) -> bool {
    (candidate.starts_with("http://")
        || candidate.starts_with("https://")
        || candidate.starts_with("www."))
        && !candidate.chars().any(char::is_whitespace)
        && candidate.contains('.')
}
