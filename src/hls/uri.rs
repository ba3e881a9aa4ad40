//! Reference resolution for playlist URIs.
//!
//! Only the base is parsed; the reference is appended as written, so dot
//! segments and escapes in it are preserved.

use url::{Position, Url};

use crate::{Error, Result};

/// Resolve `reference` against `base`.
pub fn resolve(base: &str, reference: &str) -> Result<String> {
    let reference = reference.trim();

    if has_scheme(reference) {
        return Ok(reference.to_string());
    }

    let base = Url::parse(base.trim())?;
    if base.cannot_be_a_base() {
        return Err(Error::InvalidUrl(format!(
            "'{}' cannot be used as a base",
            base
        )));
    }

    if reference.starts_with("//") {
        return Ok(format!("{}:{}", base.scheme(), reference));
    }

    if reference.starts_with('/') {
        return Ok(format!("{}{}", &base[..Position::BeforePath], reference));
    }

    let through_path = &base[..Position::AfterPath];
    let directory = match through_path.rfind('/') {
        Some(slash) if slash >= base[..Position::BeforePath].len() => &through_path[..=slash],
        _ => through_path,
    };

    if directory.ends_with('/') {
        Ok(format!("{}{}", directory, reference))
    } else {
        Ok(format!("{}/{}", directory, reference))
    }
}

/// Resolve `reference`, keeping it as written when the base is unusable.
pub fn resolve_or_keep(base: &str, reference: &str) -> String {
    resolve(base, reference).unwrap_or_else(|e| {
        tracing::warn!("Keeping URI '{}' unresolved: {}", reference, e);
        reference.trim().to_string()
    })
}

/// RFC 3986 `scheme ":"` prefix check.
fn has_scheme(reference: &str) -> bool {
    let Some(colon) = reference.find(':') else {
        return false;
    };
    let scheme = &reference[..colon];
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        }
        _ => false,
    }
}
