//! Offset-based pagination for paginated listings (§4.B, §6).

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Smallest allowed page size.
pub const MIN_PAGE_SIZE: i64 = 1;
/// Largest allowed page size.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// A validated `(page, page_size)` pair. `page` is always ≥ 1; `page_size`
/// is always clamped to `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OffsetPagination {
    pub page: i64,
    pub page_size: i64,
}

impl OffsetPagination {
    /// Builds pagination from raw, possibly out-of-range caller input.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// The number of rows to skip for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// The number of rows to fetch for this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A single page of results, matching the `{page, page_size, total, data}`
/// response shape (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OffsetPage<T> {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub data: Vec<T>,
}

impl<T> OffsetPage<T> {
    pub fn new(pagination: OffsetPagination, total: i64, data: Vec<T>) -> Self {
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total,
            data,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> OffsetPage<U> {
        OffsetPage {
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            data: self.data.into_iter().map(f).collect(),
        }
    }

    /// The total number of pages needed to cover `total` rows at this page
    /// size (ceiling division), used by §8 property 9's round-trip test.
    pub fn page_count(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total + self.page_size - 1) / self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_size_to_bounds() {
        assert_eq!(OffsetPagination::new(1, 0).page_size, MIN_PAGE_SIZE);
        assert_eq!(OffsetPagination::new(1, 9001).page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn clamps_page_to_at_least_one() {
        assert_eq!(OffsetPagination::new(0, 25).page, 1);
        assert_eq!(OffsetPagination::new(-5, 25).page, 1);
    }

    #[test]
    fn offset_is_zero_indexed() {
        let page = OffsetPagination::new(1, 25);
        assert_eq!(page.offset(), 0);
        let page = OffsetPagination::new(3, 25);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn default_matches_spec() {
        let default = OffsetPagination::default();
        assert_eq!(default.page, 1);
        assert_eq!(default.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = OffsetPage::<()>::new(OffsetPagination::new(1, 25), 51, vec![]);
        assert_eq!(page.page_count(), 3);
    }

    #[test]
    fn round_trip_covers_all_rows_without_duplicates() {
        let all: Vec<i32> = (0..237).collect();
        let pagination = OffsetPagination::new(1, 25);
        let mut seen = Vec::new();
        for page_num in 1..=((all.len() as i64 + pagination.page_size - 1) / pagination.page_size)
        {
            let p = OffsetPagination::new(page_num, pagination.page_size);
            let start = p.offset() as usize;
            let end = (start + p.limit() as usize).min(all.len());
            seen.extend_from_slice(&all[start..end]);
        }
        assert_eq!(seen, all);
    }
}
