//! Same-origin filtering of style sheets.
//!
//! Rule lists of cross-origin sheets are not accessible to the page, so they
//! are dropped before the extractor ever touches them.

use url::Url;

use super::source::StyleSheetInfo;

/// Whether a sheet with the given `href` may be inspected from `location`.
/// Sheets without an href (inline `<style>`) are always eligible; an href
/// that cannot be resolved is never eligible.
pub fn is_same_origin(href: Option<&str>, location: &Url) -> bool {
    let href = match href.map(str::trim) {
        None | Some("") => return true,
        Some(href) => href,
    };

    match location.join(href) {
        Ok(url) => origins_match(&url, location),
        Err(_) => false,
    }
}

fn origins_match(a: &Url, b: &Url) -> bool {
    let (origin_a, origin_b) = (a.origin(), b.origin());
    if origin_a.is_tuple() && origin_b.is_tuple() {
        return origin_a == origin_b;
    }
    // Opaque origins never compare equal, fall back to scheme and host so
    // that local pages can read their own local sheets.
    a.scheme() == b.scheme() && a.host_str() == b.host_str()
}

/// Keep only the sheets that may be inspected from `location`, preserving order
pub fn same_origin_sheets(sheets: Vec<StyleSheetInfo>, location: &Url) -> Vec<StyleSheetInfo> {
    sheets
        .into_iter()
        .filter(|sheet| is_same_origin(sheet.href.as_deref(), location))
        .collect()
}
