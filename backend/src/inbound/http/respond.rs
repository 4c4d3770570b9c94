//! Success-envelope helpers shared by the resource handlers.

use actix_web::{HttpResponse, HttpResponseBuilder};
use listing::{Envelope, ListQuery};
use serde::Serialize;
use serde_json::json;

use crate::domain::Error;

/// Serialize a value, surfacing failures as internal errors.
///
/// # Errors
///
/// Returns [`Error::internal`] when serialization fails.
pub fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|err| Error::internal(err.to_string()))
}

/// `{success: true, data}` with the given status.
pub fn data_response<T: Serialize>(
    mut builder: HttpResponseBuilder,
    data: &T,
) -> HttpResponse {
    builder.json(json!({"success": true, "data": data}))
}

/// Build the listing envelope response for one page of records.
///
/// # Errors
///
/// Returns [`Error::internal`] when a record fails to serialize.
pub fn list_response<T: Serialize>(
    items: &[T],
    query: &ListQuery,
    total: u64,
    always_keep: &[&str],
) -> Result<HttpResponse, Error> {
    let data = items.iter().map(to_value).collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(Envelope::build(data, query, total, always_keep)))
}

/// Parse the request's query string into a typed [`ListQuery`].
///
/// # Errors
///
/// Returns [`Error::invalid_request`] describing the malformed parameter.
pub fn parse_list_query(raw: &str) -> Result<ListQuery, Error> {
    Ok(ListQuery::from_query_str(raw)?)
}
