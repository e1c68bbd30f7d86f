use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::error::StoreError;
use crate::users::repo_types::{NewUser, User};

/// Persistence seam for user registration.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact-match lookup, no case folding.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert one row and return it with its assigned id.
    /// Returns [`StoreError::Conflict`] if the username is already taken.
    async fn insert(&self, new_user: NewUser<'_>) -> Result<User, StoreError>;
}

/// PostgreSQL-backed store over the pre-provisioned `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, avatar, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser<'_>) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, avatar, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, email, avatar, role
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.password)
        .bind(new_user.email)
        .bind(new_user.avatar)
        .bind(new_user.role)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        debug!(user_id = user.id, "user row committed");
        Ok(user)
    }
}

#[cfg(test)]
pub mod memory {
    use tokio::sync::Mutex;

    use super::*;

    /// In-memory store with the same uniqueness rule as the `users` table.
    #[derive(Default)]
    pub struct MemoryUserStore {
        rows: Mutex<Vec<User>>,
    }

    impl MemoryUserStore {
        pub async fn len(&self) -> usize {
            self.rows.lock().await.len()
        }

        pub async fn get(&self, username: &str) -> Option<User> {
            self.rows
                .lock()
                .await
                .iter()
                .find(|u| u.username == username)
                .cloned()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
            Ok(self.get(username).await)
        }

        async fn insert(&self, new_user: NewUser<'_>) -> Result<User, StoreError> {
            let mut rows = self.rows.lock().await;
            if rows.iter().any(|u| u.username == new_user.username) {
                return Err(StoreError::Conflict);
            }
            let user = User {
                id: rows.len() as i32 + 1,
                username: new_user.username.to_string(),
                password_hash: new_user.password.to_string(),
                email: new_user.email.to_string(),
                avatar: new_user.avatar.to_string(),
                role: new_user.role.to_string(),
            };
            rows.push(user.clone());
            Ok(user)
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_rejects_duplicates() {
        let store = MemoryUserStore::default();
        let new_user = |name: &'static str| NewUser {
            username: name,
            password: "pw",
            email: "e",
            avatar: "AV",
            role: "user",
        };

        assert_eq!(store.insert(new_user("alice")).await.unwrap().id, 1);
        assert_eq!(store.insert(new_user("bob")).await.unwrap().id, 2);
        assert!(matches!(
            store.insert(new_user("alice")).await,
            Err(StoreError::Conflict)
        ));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = MemoryUserStore::default();
        store
            .insert(NewUser {
                username: "Alice",
                password: "pw",
                email: "Alice@fih.local",
                avatar: "AL",
                role: "user",
            })
            .await
            .unwrap();
        assert!(store.find_by_username("alice").await.unwrap().is_none());
        assert!(store.find_by_username("Alice").await.unwrap().is_some());
    }
}
