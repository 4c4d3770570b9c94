//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use diesel::expression::expression_types::NotSelectable;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use listing::{Comparison, Filter, ListQuery, SortKey};
use uuid::Uuid;

use super::error::map_diesel_error;
use super::filters::{page_bounds, unknown_field, unknown_sort_field, unsupported_operator};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;
use crate::domain::ports::{StoreError, UserRepository};
use crate::domain::User;

/// User persistence over the shared connection pool.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type BoxedUsers = users::BoxedQuery<'static, Pg>;
type OrderExpr = Box<dyn BoxableExpression<users::table, Pg, SqlType = NotSelectable>>;

fn apply_filter(query: BoxedUsers, filter: &Filter) -> Result<BoxedUsers, StoreError> {
    let field = filter.field.as_str();
    match field {
        "email" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(users::email.eq(value.clone()))),
            Comparison::In(values) => Ok(query.filter(users::email.eq_any(values.clone()))),
            _ => Err(unsupported_operator(field)),
        },
        "role" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(users::role.eq(value.clone()))),
            Comparison::In(values) => Ok(query.filter(users::role.eq_any(values.clone()))),
            _ => Err(unsupported_operator(field)),
        },
        "firstName" => match &filter.comparison {
            Comparison::Eq(value) => Ok(query.filter(users::first_name.eq(value.clone()))),
            Comparison::In(values) => Ok(query.filter(users::first_name.eq_any(values.clone()))),
            _ => Err(unsupported_operator(field)),
        },
        _ => Err(unknown_field(field)),
    }
}

fn order_expr(key: &SortKey) -> Result<OrderExpr, StoreError> {
    let expr: OrderExpr = match (key.field.as_str(), key.descending) {
        ("createdAt", false) => Box::new(users::created_at.asc()),
        ("createdAt", true) => Box::new(users::created_at.desc()),
        ("email", false) => Box::new(users::email.asc()),
        ("email", true) => Box::new(users::email.desc()),
        ("role", false) => Box::new(users::role.asc()),
        ("role", true) => Box::new(users::role.desc()),
        ("firstName", false) => Box::new(users::first_name.asc()),
        ("firstName", true) => Box::new(users::first_name.desc()),
        _ => return Err(unknown_sort_field(&key.field)),
    };
    Ok(expr)
}

fn filtered(query: &ListQuery) -> Result<BoxedUsers, StoreError> {
    let mut boxed = users::table.into_boxed();
    for filter in &query.filters {
        boxed = apply_filter(boxed, filter)?;
    }
    Ok(boxed)
}

fn ordered(query: &ListQuery) -> Result<BoxedUsers, StoreError> {
    let mut boxed = filtered(query)?;
    if query.sort.is_empty() {
        return Ok(boxed.order(users::created_at.desc()));
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
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::insert_into(users::table)
            .values(UserRow::from_domain(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn find_by_reset_hash(&self, hash: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;
        let row = users::table
            .filter(users::reset_password_token_hash.eq(hash))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        diesel::update(users::table.find(user.id))
            .set(UserRow::from_domain(user))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;
        let rows = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows > 0)
    }

    async fn list(&self, query: &ListQuery) -> Result<(Vec<User>, u64), StoreError> {
        let mut conn = self.pool.get().await?;
        let total: i64 = filtered(query)?
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let (offset, limit) = page_bounds(query);
        let rows: Vec<UserRow> = ordered(query)?
            .offset(offset)
            .limit(limit)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let users = rows
            .into_iter()
            .map(UserRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((users, total.unsigned_abs()))
    }
}
