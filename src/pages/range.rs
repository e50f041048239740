//! Page-range expressions such as `1,3,5-9`.
//!
//! The whole expression is parsed before any page number is produced, so a
//! syntax error is always reported ahead of a bounds error. Resolved pages are
//! distinct and ascending whatever order the tokens were written in.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while turning a page-range expression into pages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRangeError {
    #[error("invalid page range syntax in '{token}': {reason}")]
    InvalidSyntax { token: String, reason: &'static str },

    #[error("page {page} is out of bounds, page count is {page_count}")]
    OutOfBounds { page: u32, page_count: u32 },
}

impl PageRangeError {
    fn syntax(token: &str, reason: &'static str) -> Self {
        PageRangeError::InvalidSyntax {
            token: token.to_string(),
            reason,
        }
    }
}

/// One token of an expression: a single page or an inclusive span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl PageSpan {
    pub fn single(page: u32) -> Self {
        Self {
            start: page,
            end: page,
        }
    }

    /// A reversed span such as `7-5` selects nothing
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A parsed page-range expression.
///
/// Spans keep the order in which they were written. Pages are produced from the
/// sorted, merged spans, lazily, so `1-4000000000` costs nothing until iterated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRanges {
    spans: Vec<PageSpan>,
}

impl PageRanges {
    /// Parse an expression: comma-separated `n` or `start-end` tokens
    pub fn parse(expression: &str) -> Result<Self, PageRangeError> {
        if expression.trim().is_empty() {
            return Err(PageRangeError::syntax(expression, "expression is empty"));
        }

        let spans = expression
            .split(',')
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?;

        if spans.iter().all(PageSpan::is_empty) {
            return Err(PageRangeError::syntax(expression, "expression selects no pages"));
        }

        Ok(Self { spans })
    }

    pub fn spans(&self) -> &[PageSpan] {
        &self.spans
    }

    /// Non-empty spans sorted by start, with overlapping and adjacent spans joined
    pub fn merged_spans(&self) -> Vec<PageSpan> {
        let mut spans: Vec<PageSpan> = self
            .spans
            .iter()
            .copied()
            .filter(|span| !span.is_empty())
            .collect();
        spans.sort_unstable_by_key(|span| span.start);

        let mut merged: Vec<PageSpan> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end.saturating_add(1) => {
                    last.end = last.end.max(span.end);
                }
                _ => merged.push(span),
            }
        }
        merged
    }

    /// Iterate distinct pages in ascending order
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.merged_spans()
            .into_iter()
            .flat_map(|span| span.start..=span.end)
    }

    /// Expand against a document of `page_count` pages.
    ///
    /// Stops at the smallest page beyond the document and returns no partial
    /// result.
    pub fn resolve(&self, page_count: u32) -> Result<PageSelection, PageRangeError> {
        let mut pages = Vec::new();
        for page in self.pages() {
            if page > page_count {
                return Err(PageRangeError::OutOfBounds { page, page_count });
            }
            pages.push(page);
        }
        Ok(PageSelection::from(pages))
    }
}

impl fmt::Display for PageRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.spans.iter().map(ToString::to_string).collect();
        write!(f, "{}", tokens.join(","))
    }
}

fn parse_token(raw: &str) -> Result<PageSpan, PageRangeError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(PageRangeError::syntax(raw, "empty token"));
    }

    match token.split_once('-') {
        None => parse_page(token, token).map(PageSpan::single),
        Some((start, end)) => {
            let start = parse_page(start.trim(), token)?;
            let end = parse_page(end.trim(), token)?;
            Ok(PageSpan { start, end })
        }
    }
}

fn parse_page(digits: &str, token: &str) -> Result<u32, PageRangeError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageRangeError::syntax(token, "expected a page number"));
    }
    let page: u32 = digits
        .parse()
        .map_err(|_| PageRangeError::syntax(token, "page number is too large"))?;
    if page == 0 {
        return Err(PageRangeError::syntax(token, "pages are numbered from 1"));
    }
    Ok(page)
}

/// Resolve `expression` against a document with `page_count` pages
pub fn resolve(expression: &str, page_count: u32) -> Result<PageSelection, PageRangeError> {
    PageRanges::parse(expression)?.resolve(page_count)
}

/// Concrete, bounds-checked pages: distinct and ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageSelection(Vec<u32>);

impl PageSelection {
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

impl From<Vec<u32>> for PageSelection {
    fn from(pages: Vec<u32>) -> Self {
        Self(pages)
    }
}

impl<'a> IntoIterator for &'a PageSelection {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
