//! Validation of names and redirect targets.
//!
//! An href must carry an explicit URI scheme (`ALPHA (ALPHA|DIGIT|'+'|'-'|'.')* "://"`)
//! and must never point the redirect back at the local machine.

use crate::error::ValidationError;

/// Hosts a record may never point at.
const FORBIDDEN_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Check that a name is present.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

/// Check href scheme grammar and the forbidden-host rule.
///
/// These checks run before any I/O in `bind`: they are cheap and
/// security-relevant.
pub fn validate_href(href: &str) -> Result<(), ValidationError> {
    if href.is_empty() {
        return Err(ValidationError::HrefRequired);
    }

    let rest = split_scheme(href).ok_or(ValidationError::InvalidScheme)?;

    let host = authority_host(rest);
    if FORBIDDEN_HOSTS
        .iter()
        .any(|f| host.eq_ignore_ascii_case(f))
    {
        return Err(ValidationError::InvalidLocalhost);
    }

    Ok(())
}

/// Split off a valid scheme prefix, returning the remainder after `"://"`.
fn split_scheme(href: &str) -> Option<&str> {
    let (scheme, rest) = href.split_once("://")?;

    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
        return None;
    }

    Some(rest)
}

/// Extract the host from the authority part of a URI remainder.
///
/// Strips userinfo, port, and everything from the first path/query/fragment
/// delimiter onward.
fn authority_host(rest: &str) -> &str {
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(rest);
    let after_userinfo = authority.rsplit('@').next().unwrap_or(authority);
    after_userinfo.split(':').next().unwrap_or(after_userinfo)
}
