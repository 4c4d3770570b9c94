//! Uniform response envelope for listing endpoints.

use serde::Serialize;
use serde_json::Value;

use crate::project::project_fields;
use crate::query::ListQuery;

/// Reference to an adjacent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// One-based page number.
    pub page: u32,
    /// Page size carried over from the request.
    pub limit: u32,
}

/// `next`/`prev` descriptors; either side is omitted at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    /// Present while further records exist beyond this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    /// Present when this page is not the first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl Pagination {
    /// Compute descriptors for `page`/`limit` against the filtered total.
    #[must_use]
    pub fn compute(page: u32, limit: u32, total: u64) -> Self {
        let skip = u64::from(page.saturating_sub(1)) * u64::from(limit);
        let end = u64::from(page) * u64::from(limit);

        Self {
            next: (end < total).then(|| PageLink {
                page: page + 1,
                limit,
            }),
            prev: (skip > 0).then(|| PageLink {
                page: page - 1,
                limit,
            }),
        }
    }
}

/// The uniform `{success, count, pagination, data}` listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,
    /// Number of records in `data` (this page, not the total).
    pub count: usize,
    /// Adjacent-page descriptors.
    pub pagination: Pagination,
    /// Serialized records, projected through `select` when present.
    pub data: Vec<Value>,
}

impl Envelope {
    /// Assemble the envelope for one page of results.
    ///
    /// `always_keep` names serialized fields that survive projection even
    /// when `select` omits them; listing endpoints pass their expanded
    /// relation keys here.
    #[must_use]
    pub fn build(
        mut data: Vec<Value>,
        query: &ListQuery,
        total: u64,
        always_keep: &[&str],
    ) -> Self {
        if let Some(select) = query.select.as_deref() {
            for record in &mut data {
                project_fields(record, select, always_keep);
            }
        }

        Self {
            success: true,
            count: data.len(),
            pagination: Pagination::compute(query.page, query.limit, total),
            data,
        }
    }
}
