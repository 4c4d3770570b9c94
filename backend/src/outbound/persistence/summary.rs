//! Bootcamp summary lookup shared by the course and review listings.
//!
//! Listing pages come off the plain table; the owning bootcamps' summaries
//! are fetched in one follow-up query and joined in memory, which keeps the
//! dynamic filter and sort machinery on a single table.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use super::error::map_diesel_error;
use super::schema::bootcamps;
use crate::domain::ports::StoreError;
use crate::domain::BootcampSummary;

pub(super) async fn load_summaries(
    conn: &mut PooledConnection<'_, AsyncPgConnection>,
    mut ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, BootcampSummary>, StoreError> {
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, String, String)> = bootcamps::table
        .filter(bootcamps::id.eq_any(ids))
        .select((bootcamps::id, bootcamps::name, bootcamps::description))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(rows
        .into_iter()
        .map(|(id, name, description)| {
            (
                id,
                BootcampSummary {
                    id,
                    name,
                    description,
                },
            )
        })
        .collect())
}

/// A page row referencing a bootcamp that no longer exists is a broken
/// foreign key, not a client error.
pub(super) fn summary_for(
    summaries: &HashMap<Uuid, BootcampSummary>,
    bootcamp_id: Uuid,
    row_id: Uuid,
) -> Result<BootcampSummary, StoreError> {
    summaries.get(&bootcamp_id).cloned().ok_or_else(|| {
        StoreError::query(format!("row {row_id} references missing bootcamp {bootcamp_id}"))
    })
}
