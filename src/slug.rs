//! Derives canonical document paths from a publication date and the
//! document's content path.

use chrono::{Datelike, NaiveDate};

/// Builds the canonical path for a document as
/// `{root}/{year}/{month}/{day}{remainder}`, with month and day zero-padded to
/// two digits.
///
/// `remainder` is `content_path` with the first occurrence of `{root}/`
/// removed and a single trailing `/` trimmed. The remainder is appended as-is,
/// so a content path of `/blog/hello/` under the `/blog` root yields
/// `/blog/2019/01/05hello` while `/hello/` yields `/blog/2019/01/05/hello`.
/// Under the site root (`/`) nothing is stripped, so `/hello/` yields
/// `/2019/01/05/hello`.
pub fn derive(root: &str, date: NaiveDate, content_path: &str) -> String {
    let root = root.trim_end_matches('/');
    let prefix = format!("{}/", root);
    let stripped = match root.is_empty() {
        true => content_path.to_owned(),
        false => content_path.replacen(&prefix, "", 1),
    };
    let remainder = match stripped.strip_suffix('/') {
        Some(s) => s,
        None => &stripped,
    };
    format!(
        "{}{:04}/{:02}/{:02}{}",
        prefix,
        date.year(),
        date.month(),
        date.day(),
        remainder,
    )
}
