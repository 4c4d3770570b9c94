//! List-query primitives shared by campfinder listing endpoints.
//!
//! This crate owns the generic half of the query layer: parsing raw
//! query-string parameters into a typed [`ListQuery`] (filters, projection,
//! sort, pagination), computing the `next`/`prev` pagination descriptors,
//! and assembling the uniform `{success, count, pagination, data}` envelope.
//! Interpreting filters against concrete database columns stays with the
//! per-entity repositories in the backend crate.

mod envelope;
mod project;
mod query;

pub use envelope::{Envelope, PageLink, Pagination};
pub use project::project_fields;
pub use query::{
    Comparison, Filter, ListQuery, ParseError, SortKey, DEFAULT_LIMIT, DEFAULT_PAGE,
};
