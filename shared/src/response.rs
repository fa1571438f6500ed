//! Response helper types

use serde::{Deserialize, Serialize};

/// Paging window echoed back by list endpoints
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of items requested
    pub limit: u32,
    /// Number of items skipped
    pub offset: u32,
    /// Total number of items matching the filters
    pub total: u64,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32, total: u64) -> Self {
        Self {
            limit,
            offset,
            total,
        }
    }

    /// Whether more items exist past this window
    pub fn has_more(&self) -> bool {
        (self.offset as u64) + (self.limit as u64) < self.total
    }
}
