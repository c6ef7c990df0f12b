//! Address validation for Sumi-Skim
//!
//! An address is eligible for crawling or storage only when it parses into a
//! non-empty scheme and a non-empty host. Everything here is pure: no network
//! access, and malformed input yields `false`/`None` rather than an error.

use crate::{UrlError, UrlResult};
use url::Url;

/// Returns true if the string is an absolute address with a scheme and a host
///
/// # Examples
///
/// ```
/// use sumi_skim::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page"));
/// assert!(!is_valid_url("/relative/path"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// ```
pub fn is_valid_url(address: &str) -> bool {
    parse_valid_url(address).is_some()
}

/// Parses an address, keeping it only if it has both a scheme and a host
pub fn parse_valid_url(address: &str) -> Option<Url> {
    Url::parse(address).ok().filter(has_scheme_and_host)
}

/// Parses a seed address, explaining why it was rejected
///
/// # Arguments
///
/// * `address` - The seed address supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The parsed address
/// * `Err(UrlError)` - The address is malformed or has no host
pub fn parse_seed(address: &str) -> UrlResult<Url> {
    let url = Url::parse(address).map_err(|e| UrlError::Parse(format!("{}: {}", address, e)))?;

    if !has_scheme_and_host(&url) {
        return Err(UrlError::MissingHost(address.to_string()));
    }

    Ok(url)
}

/// Resolves a link target against the page it was found on
///
/// Relative targets become absolute. Targets that do not resolve to an
/// address with a scheme and host (`javascript:`, `mailto:`, `data:` and the
/// like) are dropped.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    base_url.join(href.trim()).ok().filter(has_scheme_and_host)
}

fn has_scheme_and_host(url: &Url) -> bool {
    !url.scheme().is_empty() && url.host_str().map_or(false, |h| !h.is_empty())
}
