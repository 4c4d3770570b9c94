//! PostgreSQL-backed bootcamp repository.
//!
//! Deleting a bootcamp removes its courses and reviews in the same
//! transaction; aggregate columns live on this table but are written by the
//! course and review repositories.

use async_trait::async_trait;
use diesel::expression::expression_types::NotSelectable;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::PgArrayExpressionMethods;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use listing::{Comparison, Filter, ListQuery, SortKey};
use uuid::Uuid;

use super::error::map_diesel_error;
use super::filters::{
    page_bounds, parse_bool, parse_f64, unknown_field, unknown_sort_field, unsupported_operator,
};
use super::models::BootcampRow;
use super::pool::DbPool;
use super::schema::{bootcamps, courses, reviews};
use crate::domain::ports::{BootcampRepository, StoreError};
use crate::domain::Bootcamp;

/// Bootcamp persistence over the shared connection pool.
#[derive(Clone)]
pub struct DieselBootcampRepository {
    pool: DbPool,
}

impl DieselBootcampRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type BoxedBootcamps = bootcamps::BoxedQuery<'static, Pg>;
type OrderExpr = Box<dyn BoxableExpression<bootcamps::table, Pg, SqlType = NotSelectable>>;

macro_rules! text_filter {
    ($query:expr, $column:expr, $field:expr, $comparison:expr) => {
        match $comparison {
            Comparison::Eq(value) => Ok($query.filter($column.eq(value.clone()))),
            Comparison::In(values) => Ok($query.filter($column.eq_any(values.clone()))),
            _ => Err(unsupported_operator($field)),
        }
    };
}

macro_rules! bool_filter {
    ($query:expr, $column:expr, $field:expr, $comparison:expr) => {
        match $comparison {
            Comparison::Eq(value) => Ok($query.filter($column.eq(parse_bool($field, value)?))),
            _ => Err(unsupported_operator($field)),
        }
    };
}

macro_rules! numeric_filter {
    ($query:expr, $column:expr, $field:expr, $comparison:expr) => {
        match $comparison {
            Comparison::Eq(value) => Ok($query.filter($column.eq(parse_f64($field, value)?))),
            Comparison::Gt(value) => Ok($query.filter($column.gt(parse_f64($field, value)?))),
            Comparison::Gte(value) => Ok($query.filter($column.ge(parse_f64($field, value)?))),
            Comparison::Lt(value) => Ok($query.filter($column.lt(parse_f64($field, value)?))),
            Comparison::Lte(value) => Ok($query.filter($column.le(parse_f64($field, value)?))),
            Comparison::In(values) => {
                let parsed = values
                    .iter()
                    .map(|value| parse_f64($field, value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok($query.filter($column.eq_any(parsed)))
            }
        }
    };
}

fn apply_filter(query: BoxedBootcamps, filter: &Filter) -> Result<BoxedBootcamps, StoreError> {
    let field = filter.field.as_str();
    match field {
        "name" => text_filter!(query, bootcamps::name, field, &filter.comparison),
        "slug" => text_filter!(query, bootcamps::slug, field, &filter.comparison),
        "housing" => bool_filter!(query, bootcamps::housing, field, &filter.comparison),
        "jobAssistance" => {
            bool_filter!(query, bootcamps::job_assistance, field, &filter.comparison)
        }
        "jobGuarantee" => bool_filter!(query, bootcamps::job_guarantee, field, &filter.comparison),
        "acceptGi" => bool_filter!(query, bootcamps::accept_gi, field, &filter.comparison),
        "averageCost" => {
            numeric_filter!(query, bootcamps::average_cost, field, &filter.comparison)
        }
        "averageRating" => {
            numeric_filter!(query, bootcamps::average_rating, field, &filter.comparison)
        }
        // Array membership: equality means "teaches this career", `in` means
        // "teaches any of these".
        "careers" => match &filter.comparison {
            Comparison::Eq(value) => {
                Ok(query.filter(bootcamps::careers.contains(vec![value.clone()])))
            }
            Comparison::In(values) => {
                Ok(query.filter(bootcamps::careers.overlaps_with(values.clone())))
            }
            _ => Err(unsupported_operator(field)),
        },
        _ => Err(unknown_field(field)),
    }
}

fn order_expr(key: &SortKey) -> Result<OrderExpr, StoreError> {
    let expr: OrderExpr = match (key.field.as_str(), key.descending) {
        ("createdAt", false) => Box::new(bootcamps::created_at.asc()),
        ("createdAt", true) => Box::new(bootcamps::created_at.desc()),
        ("name", false) => Box::new(bootcamps::name.asc()),
        ("name", true) => Box::new(bootcamps::name.desc()),
        ("averageCost", false) => Box::new(bootcamps::average_cost.asc()),
        ("averageCost", true) => Box::new(bootcamps::average_cost.desc()),
        ("averageRating", false) => Box::new(bootcamps::average_rating.asc()),
        ("averageRating", true) => Box::new(bootcamps::average_rating.desc()),
        _ => return Err(unknown_sort_field(&key.field)),
    };
    Ok(expr)
}

fn filtered(query: &ListQuery) -> Result<BoxedBootcamps, StoreError> {
    let mut boxed = bootcamps::table.into_boxed();
    for filter in &query.filters {
        boxed = apply_filter(boxed, filter)?;
    }
    Ok(boxed)
}

fn ordered(query: &ListQuery) -> Result<BoxedBootcamps, StoreError> {
    let mut boxed = filtered(query)?;
    if query.sort.is_empty() {
        return Ok(boxed.order(bootcamps::created_at.desc()));
    }
    let mut keys = query.sort.iter();
    if let Some(first) = keys.next() {
        boxed = boxed.order_by(order_expr(first)?);
    }
    for key in keys {
        boxed = boxed.then_order_by(order_expr(key)?);
    }
    Ok(boxed)
}

#[async_trait]
impl BootcampRepository for DieselBootcampRepository {
    async fn insert(&self, bootcamp: &Bootcamp) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(bootcamps::table)
            .values(BootcampRow::from_domain(bootcamp))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = bootcamps::table
            .find(id)
            .select(BootcampRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(BootcampRow::into_domain).transpose()
    }

    async fn find_by_owner(&self, user_id: Uuid) -> Result<Option<Bootcamp>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = bootcamps::table
            .filter(bootcamps::user_id.eq(user_id))
            .select(BootcampRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(BootcampRow::into_domain).transpose()
    }

    async fn update(&self, bootcamp: &Bootcamp) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::update(bootcamps::table.find(bootcamp.id))
            .set(BootcampRow::from_domain(bootcamp))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete_cascading(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(reviews::table.filter(reviews::bootcamp_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(courses::table.filter(courses::bootcamp_id.eq(id)))
                    .execute(conn)
                    .await?;
                let rows = diesel::delete(bootcamps::table.find(id)).execute(conn).await?;
                Ok(rows > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list(&self, query: &ListQuery) -> Result<(Vec<Bootcamp>, u64), StoreError> {
        let mut conn = self.pool.get().await?;
        let total: i64 = filtered(query)?
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (offset, limit) = page_bounds(query);
        let rows: Vec<BootcampRow> = ordered(query)?
            .offset(offset)
            .limit(limit)
            .select(BootcampRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let bootcamps = rows
            .into_iter()
            .map(BootcampRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((bootcamps, total.unsigned_abs()))
    }

    async fn find_within_box(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Result<Vec<Bootcamp>, StoreError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<BootcampRow> = bootcamps::table
            .filter(bootcamps::latitude.ge(min_lat))
            .filter(bootcamps::latitude.le(max_lat))
            .filter(bootcamps::longitude.ge(min_lng))
            .filter(bootcamps::longitude.le(max_lng))
            .select(BootcampRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(BootcampRow::into_domain).collect()
    }
}
