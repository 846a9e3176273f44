//! Pagination types used by every listing query in the gateway.

mod offset;

pub use offset::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE, OffsetPage, OffsetPagination,
};
