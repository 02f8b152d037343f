//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the build-time content hash for a static asset kind.
///
/// Usage in templates: `{{ "css"|asset_hash }}`, `{{ "js"|asset_hash }}`
#[askama::filter_fn]
pub fn asset_hash(kind: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(hash_for(&kind.to_string()))
}

fn hash_for(kind: &str) -> &'static str {
    match kind {
        "css" => env!("CSS_HASH"),
        "js" => env!("JS_HASH"),
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_have_hashes() {
        assert_eq!(hash_for("css").len(), 8);
        assert_eq!(hash_for("js").len(), 8);
        assert_eq!(hash_for("fonts"), "");
    }
}
