//! Paginated user listings

use crate::user::dto::UserQuery;
use crate::user::error::UserError;
use crate::user::models::UserWithCounts;
use serde::{Deserialize, Serialize};

/// Pagination metadata attached to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Derive page counters from the requested page, page size and total row count
    pub fn new(page: u32, limit: u32, total: u64) -> Result<Self, UserError> {
        if page == 0 {
            return Err(UserError::InvalidPagination("page starts at 1".to_string()));
        }
        if limit == 0 {
            return Err(UserError::InvalidPagination("limit must be positive".to_string()));
        }

        let total_pages = total.div_ceil(u64::from(limit));
        Ok(Self {
            page,
            limit,
            total,
            total_pages,
            has_next: u64::from(page) < total_pages,
            has_prev: page > 1,
        })
    }

    /// Whether the derived counters agree with `page`, `limit` and `total`.
    ///
    /// Useful on metadata received from another service.
    pub fn is_consistent(&self) -> bool {
        Self::new(self.page, self.limit, self.total).is_ok_and(|expected| expected == *self)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of users with its pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedUsers {
    pub users: Vec<UserWithCounts>,
    pub pagination: PaginationMeta,
}

impl PaginatedUsers {
    pub fn new(
        users: Vec<UserWithCounts>,
        page: u32,
        limit: u32,
        total: u64,
    ) -> Result<Self, UserError> {
        let pagination = PaginationMeta::new(page, limit, total)?;
        if users.len() as u64 > u64::from(limit) {
            return Err(UserError::InvalidPagination(format!(
                "{} users returned for a page of {}",
                users.len(),
                limit
            )));
        }
        Ok(Self {
            users,
            pagination,
        })
    }

    /// Build the page answering a resolved listing query
    pub fn for_query(
        users: Vec<UserWithCounts>,
        query: &UserQuery,
        total: u64,
    ) -> Result<Self, UserError> {
        Self::new(users, query.page, query.limit, total)
    }

    pub fn empty(page: u32, limit: u32) -> Result<Self, UserError> {
        Self::new(Vec::new(), page, limit, 0)
    }
}
