use crate::models::user::{NewUser, User, UserChanges};
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    #[error("User not found")]
    NotFound,
    #[error("User already exists")]
    AlreadyExists,
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::AlreadyExists,
            _ => RepositoryError::Database(err),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;
    /// Applies `changes` to the user and returns the stored row.
    async fn update_user(&self, id: &str, changes: &UserChanges) -> RepositoryResult<User>;
    async fn delete_user(&self, id: &str) -> RepositoryResult<()>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let id = Uuid::new_v4().to_string();

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, avatar_url)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, name, avatar_url
            "#,
        )
        .bind(&id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, avatar_url FROM users ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, avatar_url FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, id: &str, changes: &UserChanges) -> RepositoryResult<User> {
        // avatar_url needs a separate flag because NULL is a valid new value.
        let (set_avatar, avatar_url) = match &changes.avatar_url {
            Some(value) => (true, value.clone()),
            None => (false, None),
        };

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE(?, email),
                name = COALESCE(?, name),
                avatar_url = CASE WHEN ? THEN ? ELSE avatar_url END
            WHERE id = ?
            RETURNING id, email, name, avatar_url
            "#,
        )
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(set_avatar)
        .bind(avatar_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(RepositoryError::NotFound)
    }

    async fn delete_user(&self, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
