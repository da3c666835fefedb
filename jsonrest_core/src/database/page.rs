use serde::{Deserialize, Serialize};

use super::value::parse_int;

pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// How a list result is sliced. Selected by which parameters are present:
/// `_page` wins over `_end`, which wins over `_limit`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pagination {
    #[default]
    None,
    Page { page: usize, limit: usize },
    Slice { start: i64, end: i64 },
    Limit { start: i64, limit: i64 },
}

impl Pagination {
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Self {
        let start = start.and_then(parse_int).unwrap_or(0);
        if let Some(page) = page {
            let page = parse_int(page).filter(|p| *p >= 1).unwrap_or(1) as usize;
            let limit = limit
                .and_then(parse_int)
                .filter(|l| *l > 0)
                .map(|l| l as usize)
                .unwrap_or(DEFAULT_PAGE_LIMIT);
            return Pagination::Page { page, limit };
        }
        if let Some(end) = end {
            return Pagination::Slice {
                start,
                end: parse_int(end).unwrap_or(0),
            };
        }
        if let Some(limit) = limit {
            return Pagination::Limit {
                start,
                limit: parse_int(limit).unwrap_or(0),
            };
        }
        Pagination::None
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Pagination::None)
    }
}

/// Resolve a possibly negative bound against a length, counting negative
/// bounds from the end.
fn resolve_bound(bound: i64, len: usize) -> usize {
    if bound < 0 {
        len.saturating_sub(bound.unsigned_abs() as usize)
    } else {
        (bound as usize).min(len)
    }
}

/// `items[start..end]` with out of range and inverted bounds yielding empty.
pub fn slice<T: Clone>(items: &[T], start: i64, end: i64) -> Vec<T> {
    let start = resolve_bound(start, items.len());
    let end = resolve_bound(end, items.len());
    if start >= end {
        return vec![];
    }
    items[start..end].to_vec()
}

/// One page of a list plus its navigation numbers. All numbers are 1-based and
/// are only present when they lead somewhere.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<usize>,
}

/// Slice `page` out of `items`, `limit` items per page.
///
/// ```
/// use jsonrest_core::database::page::get_page;
///
/// let page = get_page(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "l"], 2, 2);
/// assert_eq!(page.items, vec!["c", "d"]);
/// assert_eq!((page.first, page.prev, page.next, page.last), (Some(1), Some(1), Some(3), Some(5)));
/// ```
pub fn get_page<T: Clone>(items: &[T], page: usize, limit: usize) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let start = (page - 1).saturating_mul(limit);
    let end = page.saturating_mul(limit);
    let slice: Vec<T> = items
        .iter()
        .skip(start)
        .take(end - start)
        .cloned()
        .collect();

    let mut result = Page {
        items: slice,
        current: None,
        first: None,
        prev: None,
        next: None,
        last: None,
    };
    if result.items.is_empty() {
        return result;
    }
    if page > 1 {
        result.prev = Some(page - 1);
    }
    if end < items.len() {
        result.next = Some(page + 1);
    }
    if result.items.len() != items.len() {
        result.current = Some(page);
        result.first = Some(1);
        result.last = Some(items.len().div_ceil(limit));
    }
    result
}

/// Navigation URLs for a page, built from the URL that requested it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Links {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

impl Links {
    /// Swap `page=<current>` for each target page number in `full_url`.
    pub fn build<T>(page: &Page<T>, full_url: &str) -> Self {
        let current = match page.current {
            Some(current) => current,
            None => return Links::default(),
        };
        let needle = format!("page={current}");
        let link = |target: Option<usize>| {
            target.map(|target| full_url.replacen(&needle, &format!("page={target}"), 1))
        };
        Links {
            first: link(page.first),
            prev: link(page.prev),
            next: link(page.next),
            last: link(page.last),
        }
    }

    /// `(rel, url)` pairs in `first, prev, next, last` order.
    pub fn relations(&self) -> Vec<(&'static str, &str)> {
        [
            ("first", &self.first),
            ("prev", &self.prev),
            ("next", &self.next),
            ("last", &self.last),
        ]
        .into_iter()
        .filter_map(|(rel, url)| url.as_deref().map(|url| (rel, url)))
        .collect()
    }

    /// Render as an RFC 8288 `Link` header value.
    pub fn header_value(&self) -> Option<String> {
        let relations = self.relations();
        if relations.is_empty() {
            return None;
        }
        Some(
            relations
                .into_iter()
                .map(|(rel, url)| format!("<{url}>; rel=\"{rel}\""))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
