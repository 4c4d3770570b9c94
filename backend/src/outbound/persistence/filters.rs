//! Shared helpers for interpreting typed list queries against SQL columns.
//!
//! Each repository owns its column whitelist; these helpers cover the value
//! parsing and the rejection messages so they read the same everywhere.

use listing::ListQuery;

use crate::domain::ports::StoreError;

pub(super) fn parse_f64(field: &str, value: &str) -> Result<f64, StoreError> {
    value.parse().map_err(|_| {
        StoreError::invalid_query(format!("Invalid numeric value '{value}' for field '{field}'"))
    })
}

pub(super) fn parse_i32(field: &str, value: &str) -> Result<i32, StoreError> {
    value.parse().map_err(|_| {
        StoreError::invalid_query(format!("Invalid integer value '{value}' for field '{field}'"))
    })
}

pub(super) fn parse_bool(field: &str, value: &str) -> Result<bool, StoreError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(StoreError::invalid_query(format!(
            "Invalid boolean value '{value}' for field '{field}'"
        ))),
    }
}

pub(super) fn unknown_field(field: &str) -> StoreError {
    StoreError::invalid_query(format!("Cannot filter on field '{field}'"))
}

pub(super) fn unsupported_operator(field: &str) -> StoreError {
    StoreError::invalid_query(format!("Operator not supported for field '{field}'"))
}

pub(super) fn unknown_sort_field(field: &str) -> StoreError {
    StoreError::invalid_query(format!("Cannot sort on field '{field}'"))
}

/// Zero-based offset and page size as SQL-friendly integers.
pub(super) fn page_bounds(query: &ListQuery) -> (i64, i64) {
    let offset = i64::try_from(query.skip()).unwrap_or(i64::MAX);
    let limit = i64::from(query.limit);
    (offset, limit)
}
