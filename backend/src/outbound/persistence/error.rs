//! Translation of Diesel failures into [`StoreError`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::ports::StoreError;

/// Field names for the unique constraints the migrations create, keyed by
/// constraint name. Unknown constraints fall back to a generic parse of the
/// constraint name.
const UNIQUE_CONSTRAINTS: [(&str, &str); 6] = [
    ("users_email_key", "email"),
    ("bootcamps_name_key", "name"),
    ("bootcamps_slug_key", "slug"),
    ("courses_title_key", "title"),
    ("reviews_title_key", "title"),
    ("reviews_bootcamp_id_user_id_key", "user"),
];

fn duplicate_field(constraint: Option<&str>) -> String {
    let Some(constraint) = constraint else {
        return "value".to_owned();
    };
    if let Some((_, field)) = UNIQUE_CONSTRAINTS
        .iter()
        .find(|(name, _)| *name == constraint)
    {
        return (*field).to_owned();
    }
    // Postgres names unique constraints "{table}_{column}_key" by default.
    constraint
        .strip_suffix("_key")
        .and_then(|rest| rest.split_once('_'))
        .map_or_else(|| constraint.to_owned(), |(_, column)| column.to_owned())
}

/// Map a Diesel error to the adapter-neutral store error.
///
/// Unique violations surface the duplicated field so the domain can report
/// it; everything else is a query failure carrying the driver message.
pub fn map_diesel_error(err: DieselError) -> StoreError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::duplicate(duplicate_field(info.constraint_name()))
        }
        _ => StoreError::query(err.to_string()),
    }
}
