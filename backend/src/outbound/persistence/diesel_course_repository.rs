//! PostgreSQL-backed course repository.
//!
//! Also owns the `average_cost` aggregate on the bootcamps table: every
//! course mutation is followed by a recompute call from the service layer,
//! and the recompute runs read-then-write in one transaction.

use async_trait::async_trait;
use diesel::expression::expression_types::NotSelectable;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use listing::{Comparison, Filter, ListQuery, SortKey};
use uuid::Uuid;

use super::error::map_diesel_error;
use super::filters::{
    page_bounds, parse_bool, parse_f64, parse_i32, unknown_field, unknown_sort_field,
    unsupported_operator,
};
use super::models::CourseRow;
use super::pool::DbPool;
use super::schema::{bootcamps, courses};
use super::summary::{load_summaries, summary_for};
use crate::domain::ports::{CourseListItem, CourseRepository, StoreError};
use crate::domain::Course;

/// Course persistence over the shared connection pool.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type BoxedCourses = courses::BoxedQuery<'static, Pg>;
type OrderExpr = Box<dyn BoxableExpression<courses::table, Pg, SqlType = NotSelectable>>;

macro_rules! numeric_filter {
    ($query:expr, $column:expr, $field:expr, $comparison:expr, $parse:ident) => {
        match $comparison {
            Comparison::Eq(value) => Ok($query.filter($column.eq($parse($field, value)?))),
            Comparison::Gt(value) => Ok($query.filter($column.gt($parse($field, value)?))),
            Comparison::Gte(value) => Ok($query.filter($column.ge($parse($field, value)?))),
            Comparison::Lt(value) => Ok($query.filter($column.lt($parse($field, value)?))),
            Comparison::Lte(value) => Ok($query.filter($column.le($parse($field, value)?))),
            Comparison::In(values) => {
                let parsed = values
                    .iter()
                    .map(|value| $parse($field, value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok($query.filter($column.eq_any(parsed)))
            }
        }
    };
}

fn apply_filter(query: BoxedCourses, filter: &Filter) -> Result<BoxedCourses, StoreError> {
    let field = filter.field.as_str();
    match field {
        "title" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(courses::title.eq(value.clone()))),
            Comparison::In(values) => Ok(query.filter(courses::title.eq_any(values.clone()))),
            _ => Err(unsupported_operator(field)),
        },
        "minimumSkill" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(courses::minimum_skill.eq(value.clone()))),
            Comparison::In(values) => {
                Ok(query.filter(courses::minimum_skill.eq_any(values.clone())))
            }
            _ => Err(unsupported_operator(field)),
        },
        "scholarshipAvailable" => match &filter.comparison {
            Comparison::Eq(value) => {
                Ok(query.filter(courses::scholarship_available.eq(parse_bool(field, value)?)))
            }
            _ => Err(unsupported_operator(field)),
        },
        "weeks" => numeric_filter!(query, courses::weeks, field, &filter.comparison, parse_i32),
        "tuition" => numeric_filter!(query, courses::tuition, field, &filter.comparison, parse_f64),
        _ => Err(unknown_field(field)),
    }
}

fn order_expr(key: &SortKey) -> Result<OrderExpr, StoreError> {
    let expr: OrderExpr = match (key.field.as_str(), key.descending) {
        ("createdAt", false) => Box::new(courses::created_at.asc()),
        ("createdAt", true) => Box::new(courses::created_at.desc()),
        ("title", false) => Box::new(courses::title.asc()),
        ("title", true) => Box::new(courses::title.desc()),
        ("weeks", false) => Box::new(courses::weeks.asc()),
        ("weeks", true) => Box::new(courses::weeks.desc()),
        ("tuition", false) => Box::new(courses::tuition.asc()),
        ("tuition", true) => Box::new(courses::tuition.desc()),
        _ => return Err(unknown_sort_field(&key.field)),
    };
    Ok(expr)
}

fn filtered(query: &ListQuery, bootcamp_id: Option<Uuid>) -> Result<BoxedCourses, StoreError> {
    let mut boxed = courses::table.into_boxed();
    if let Some(id) = bootcamp_id {
        boxed = boxed.filter(courses::bootcamp_id.eq(id));
    }
    for filter in &query.filters {
        boxed = apply_filter(boxed, filter)?;
    }
    Ok(boxed)
}

fn ordered(query: &ListQuery, bootcamp_id: Option<Uuid>) -> Result<BoxedCourses, StoreError> {
    let mut boxed = filtered(query, bootcamp_id)?;
    if query.sort.is_empty() {
        return Ok(boxed.order(courses::created_at.desc()));
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

/// Rounded up to the next multiple of ten, matching what clients see.
fn ceil_to_ten(value: f64) -> f64 {
    (value / 10.0).ceil() * 10.0
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn insert(&self, course: &Course) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(courses::table)
            .values(CourseRow::from_domain(course))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = courses::table
            .find(id)
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(CourseRow::into_domain).transpose()
    }

    async fn update(&self, course: &Course) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::update(courses::table.find(course.id))
            .set(CourseRow::from_domain(course))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;
        let rows = diesel::delete(courses::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows > 0)
    }

    async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<CourseListItem>, u64), StoreError> {
        let mut conn = self.pool.get().await?;
        let total: i64 = filtered(query, bootcamp_id)?
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (offset, limit) = page_bounds(query);
        let rows: Vec<CourseRow> = ordered(query, bootcamp_id)?
            .offset(offset)
            .limit(limit)
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids = rows.iter().map(|row| row.bootcamp_id).collect();
        let summaries = load_summaries(&mut conn, ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let bootcamp = summary_for(&summaries, row.bootcamp_id, row.id)?;
                Ok(CourseListItem {
                    course: row.into_domain()?,
                    bootcamp,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok((items, total.unsigned_abs()))
    }

    async fn recompute_average_cost(
        &self,
        bootcamp_id: Uuid,
    ) -> Result<Option<f64>, StoreError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let mean: Option<f64> = courses::table
                    .filter(courses::bootcamp_id.eq(bootcamp_id))
                    .select(diesel::dsl::avg(courses::tuition))
                    .first(conn)
                    .await?;
                let stored = mean.map(ceil_to_ten);
                diesel::update(bootcamps::table.find(bootcamp_id))
                    .set(bootcamps::average_cost.eq(stored))
                    .execute(conn)
                    .await?;
                Ok(stored)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
