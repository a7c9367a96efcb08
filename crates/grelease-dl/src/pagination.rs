//! Pagination metadata carried by the `link` response header.
//!
//! GitHub advertises neighbouring pages as a comma separated list of
//! `<url>; rel="name"` entries. Only the `last` relation matters here: it
//! tells the sync loop how many pages exist upstream.

use tracing::trace;

/// Pagination state of one fetched page.
///
/// `last_page` is `0` when the provider sent no usable `last` relation,
/// which is the normal case for repositories with a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u8,
    pub last_page: u32,
}

impl PageInfo {
    pub fn from_link(page: u32, per_page: u8, link: Option<&str>) -> Self {
        Self {
            page,
            per_page,
            last_page: link.map(last_page).unwrap_or(0),
        }
    }

    /// Whether the provider advertised pages after this one.
    pub fn has_more(&self) -> bool {
        self.last_page > self.page
    }
}

/// Extracts the page number of the `rel="last"` entry of a `link` header.
///
/// Returns `0` when the header is empty, has no `last` relation, or the
/// `page` query parameter of that entry is not a plain decimal number.
///
/// # Examples
///
/// ```
/// use grelease_dl::pagination::last_page;
///
/// let link = r#"<https://api.github.com/repositories/1/releases?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/releases?per_page=100&page=7>; rel="last""#;
/// assert_eq!(last_page(link), 7);
/// assert_eq!(last_page(""), 0);
/// ```
pub fn last_page(link: &str) -> u32 {
    let page = link
        .split(',')
        .find_map(|entry| {
            let (target, params) = entry.split_once(';')?;
            params.split(';').any(is_last_relation).then_some(target)
        })
        .and_then(page_param);

    trace!("link header {:?} -> last page {:?}", link, page);
    page.unwrap_or(0)
}

fn is_last_relation(param: &str) -> bool {
    param
        .trim()
        .strip_prefix("rel=")
        .is_some_and(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "last"))
}

fn page_param(target: &str) -> Option<u32> {
    let url = target.trim().strip_prefix('<')?.strip_suffix('>')?;
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    let value = url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "page")
        .last()?
        .1;

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
