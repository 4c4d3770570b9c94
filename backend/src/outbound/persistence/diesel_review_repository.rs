//! PostgreSQL-backed review repository.
//!
//! Owns the `average_rating` aggregate on the bootcamps table. The mean is
//! computed from an integer sum and count so no numeric-to-float cast is
//! left to the driver.

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
    page_bounds, parse_i32, unknown_field, unknown_sort_field, unsupported_operator,
};
use super::models::ReviewRow;
use super::pool::DbPool;
use super::schema::{bootcamps, reviews};
use super::summary::{load_summaries, summary_for};
use crate::domain::ports::{ReviewListItem, ReviewRepository, StoreError};
use crate::domain::Review;

/// Review persistence over the shared connection pool.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type BoxedReviews = reviews::BoxedQuery<'static, Pg>;
type OrderExpr = Box<dyn BoxableExpression<reviews::table, Pg, SqlType = NotSelectable>>;

fn apply_filter(query: BoxedReviews, filter: &Filter) -> Result<BoxedReviews, StoreError> {
    let field = filter.field.as_str();
    match field {
        "title" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(reviews::title.eq(value.clone()))),
            Comparison::In(values) => Ok(query.filter(reviews::title.eq_any(values.clone()))),
            _ => Err(unsupported_operator(field)),
        },
        "rating" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(reviews::rating.eq(parse_i32(field, value)?))),
            Comparison::Gt(value) => Ok(query.filter(reviews::rating.gt(parse_i32(field, value)?))),
            Comparison::Gte(value) => {
                Ok(query.filter(reviews::rating.ge(parse_i32(field, value)?)))
            }
            Comparison::Lt(value) => Ok(query.filter(reviews::rating.lt(parse_i32(field, value)?))),
            Comparison::Lte(value) => {
                Ok(query.filter(reviews::rating.le(parse_i32(field, value)?)))
            }
            Comparison::In(values) => {
                let parsed = values
                    .iter()
                    .map(|value| parse_i32(field, value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(query.filter(reviews::rating.eq_any(parsed)))
            }
        },
        _ => Err(unknown_field(field)),
    }
}

fn order_expr(key: &SortKey) -> Result<OrderExpr, StoreError> {
    let expr: OrderExpr = match (key.field.as_str(), key.descending) {
        ("createdAt", false) => Box::new(reviews::created_at.asc()),
        ("createdAt", true) => Box::new(reviews::created_at.desc()),
        ("rating", false) => Box::new(reviews::rating.asc()),
        ("rating", true) => Box::new(reviews::rating.desc()),
        ("title", false) => Box::new(reviews::title.asc()),
        ("title", true) => Box::new(reviews::title.desc()),
        _ => return Err(unknown_sort_field(&key.field)),
    };
    Ok(expr)
}

fn filtered(query: &ListQuery, bootcamp_id: Option<Uuid>) -> Result<BoxedReviews, StoreError> {
    let mut boxed = reviews::table.into_boxed();
    if let Some(id) = bootcamp_id {
        boxed = boxed.filter(reviews::bootcamp_id.eq(id));
    }
    for filter in &query.filters {
        boxed = apply_filter(boxed, filter)?;
    }
    Ok(boxed)
}

fn ordered(query: &ListQuery, bootcamp_id: Option<Uuid>) -> Result<BoxedReviews, StoreError> {
    let mut boxed = filtered(query, bootcamp_id)?;
    if query.sort.is_empty() {
        return Ok(boxed.order(reviews::created_at.desc()));
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
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(reviews::table)
            .values(ReviewRow::from_domain(review))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = reviews::table
            .find(id)
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(ReviewRow::into_domain))
    }

    async fn find_by_author(
        &self,
        bootcamp_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Review>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = reviews::table
            .filter(reviews::bootcamp_id.eq(bootcamp_id))
            .filter(reviews::user_id.eq(user_id))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(ReviewRow::into_domain))
    }

    async fn update(&self, review: &Review) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::update(reviews::table.find(review.id))
            .set(ReviewRow::from_domain(review))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;
        let rows = diesel::delete(reviews::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows > 0)
    }

    async fn list(
        &self,
        query: &ListQuery,
        bootcamp_id: Option<Uuid>,
    ) -> Result<(Vec<ReviewListItem>, u64), StoreError> {
        let mut conn = self.pool.get().await?;
        let total: i64 = filtered(query, bootcamp_id)?
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (offset, limit) = page_bounds(query);
        let rows: Vec<ReviewRow> = ordered(query, bootcamp_id)?
            .offset(offset)
            .limit(limit)
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids = rows.iter().map(|row| row.bootcamp_id).collect();
        let summaries = load_summaries(&mut conn, ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let bootcamp = summary_for(&summaries, row.bootcamp_id, row.id)?;
                Ok(ReviewListItem {
                    review: row.into_domain(),
                    bootcamp,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok((items, total.unsigned_abs()))
    }

    async fn recompute_average_rating(
        &self,
        bootcamp_id: Uuid,
    ) -> Result<Option<f64>, StoreError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let (sum, count): (Option<i64>, i64) = reviews::table
                    .filter(reviews::bootcamp_id.eq(bootcamp_id))
                    .select((diesel::dsl::sum(reviews::rating), diesel::dsl::count_star()))
                    .first(conn)
                    .await?;
                let stored = match (sum, count) {
                    (Some(total), count) if count > 0 => Some(total as f64 / count as f64),
                    _ => None,
                };
                diesel::update(bootcamps::table.find(bootcamp_id))
                    .set(bootcamps::average_rating.eq(stored))
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rating[gte]=8")]
    #[case("title=Great&sort=-rating,createdAt")]
    fn whitelisted_queries_build(#[case] raw: &str) {
        let query = ListQuery::from_query_str(raw).unwrap();
        assert!(ordered(&query, None).is_ok());
    }

    #[test]
    fn non_integer_rating_is_rejected() {
        let query = ListQuery::from_query_str("rating[gte]=high").unwrap();
        assert!(matches!(
            filtered(&query, None),
            Err(StoreError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let query = ListQuery::from_query_str("text=spam").unwrap();
        let err = filtered(&query, None).err().expect("rejected filter");
        assert!(err.to_string().contains("text"));
    }

    #[test]
    fn range_operator_on_title_is_rejected() {
        let query = ListQuery::from_query_str("title[lt]=M").unwrap();
        assert!(matches!(
            filtered(&query, None),
            Err(StoreError::InvalidQuery { .. })
        ));
    }
}
