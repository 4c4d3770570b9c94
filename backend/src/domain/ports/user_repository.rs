use async_trait::async_trait;
use listing::ListQuery;
use uuid::Uuid;

use super::StoreError;
use crate::domain::User;

/// Persistence operations for user accounts.
///
/// `update` replaces the stored record wholesale; callers load, mutate, and
/// write back, which keeps the reset-token lifecycle a plain field update.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Look up an account by (lowercased) e-mail.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Look up the account holding an outstanding reset-token digest.
    async fn find_by_reset_hash(&self, hash: &str) -> Result<Option<User>, StoreError>;

    /// Write back a modified account.
    async fn update(&self, user: &User) -> Result<(), StoreError>;

    /// Delete an account; `false` when no row matched.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// List accounts per `query`, returning the page and the filtered total.
    async fn list(&self, query: &ListQuery) -> Result<(Vec<User>, u64), StoreError>;
}
