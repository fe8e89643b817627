//! Session token extraction from sign-in responses.
//!
//! Every `Set-Cookie` value is reduced to its `name=value` pair (attributes
//! such as `Path` or `Expires` are dropped) and the pairs are joined with
//! `"; "`, which is exactly what a `Cookie` request header expects. A later
//! cookie with the same name replaces an earlier one. Cookies with an empty
//! value are deletions and are skipped.

/// Split one `Set-Cookie` value into its name and value.
pub fn parse_set_cookie(header: &str) -> Option<(&str, &str)> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    let value = value.trim().trim_matches('"');
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Build a `Cookie` header value from `Set-Cookie` values.
///
/// When `required` names a cookie, extraction fails unless that cookie is
/// present. Returns `None` when nothing usable was set.
pub fn cookie_header(set_cookies: &[String], required: Option<&str>) -> Option<String> {
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for header in set_cookies {
        if let Some((name, value)) = parse_set_cookie(header) {
            match pairs.iter_mut().find(|(n, _)| *n == name) {
                Some(existing) => existing.1 = value,
                None => pairs.push((name, value)),
            }
        }
    }

    if let Some(required) = required {
        if !pairs.iter().any(|(n, _)| *n == required) {
            return None;
        }
    }

    if pairs.is_empty() {
        return None;
    }

    Some(
        pairs
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
