use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

use super::error::FilterError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated, clamped page request (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

/// Resolve raw `page` / `page_size` query values. Page numbers below 1 and
/// non-positive sizes are rejected; oversized page sizes clamp silently to
/// the maximum. A page beyond the last simply selects an empty window.
pub fn resolve(page: Option<i64>, page_size: Option<i64>) -> Result<Page, FilterError> {
    let number = page.unwrap_or(1);
    if number < 1 {
        return Err(FilterError::InvalidPage(number));
    }

    let requested = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if requested < 1 {
        return Err(FilterError::InvalidPageSize(requested));
    }

    let size = if requested > MAX_PAGE_SIZE {
        tracing::debug!("page_size {} exceeds max {}, clamping", requested, MAX_PAGE_SIZE);
        MAX_PAGE_SIZE
    } else {
        requested
    };

    Ok(Page { number, size })
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    pub fn push_limit(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" LIMIT ");
        qb.push_bind(self.size);
        qb.push(" OFFSET ");
        qb.push_bind(self.offset());
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.number,
            page_size: self.size,
            total,
            has_next: self.number * self.size < total,
            has_previous: self.number > 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Collection response body: one page of items plus the page bookkeeping.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let page = resolve(None, None).unwrap();
        assert_eq!(page, Page { number: 1, size: DEFAULT_PAGE_SIZE });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn oversized_page_size_clamps_silently() {
        let page = resolve(Some(1), Some(1000)).unwrap();
        assert_eq!(page.size, MAX_PAGE_SIZE);
    }

    #[test]
    fn page_below_one_is_an_error() {
        assert_eq!(resolve(Some(0), None), Err(FilterError::InvalidPage(0)));
        assert_eq!(resolve(Some(-3), None), Err(FilterError::InvalidPage(-3)));
    }

    #[test]
    fn non_positive_page_size_is_an_error() {
        assert_eq!(resolve(Some(1), Some(0)), Err(FilterError::InvalidPageSize(0)));
        assert_eq!(resolve(Some(1), Some(-1)), Err(FilterError::InvalidPageSize(-1)));
    }

    #[test]
    fn offset_advances_with_page_number() {
        let page = resolve(Some(3), Some(25)).unwrap();
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn meta_flags_reflect_window_position() {
        let first = resolve(Some(1), Some(10)).unwrap().meta(35);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = resolve(Some(4), Some(10)).unwrap().meta(35);
        assert!(!last.has_next);
        assert!(last.has_previous);

        let beyond = resolve(Some(9), Some(10)).unwrap().meta(35);
        assert!(!beyond.has_next);
        assert!(beyond.has_previous);
    }

    #[test]
    fn limit_clause_binds_size_and_offset() {
        let page = resolve(Some(2), Some(10)).unwrap();
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1");
        page.push_limit(&mut qb);
        assert_eq!(qb.into_sql(), "SELECT 1 LIMIT $1 OFFSET $2");
    }
}
