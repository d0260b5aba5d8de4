use crate::models::user::{CreateUserBody, NewUser, UpdateUserBody, User, UserChanges};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Email and name are required")]
    MissingRequiredFields,
    #[error("Field '{0}' must not be blank")]
    BlankField(&'static str),
    #[error("User id is required")]
    MissingId,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, body: CreateUserBody) -> Result<User, UserServiceError> {
        let new_user = Self::validate_new_user(body)?;

        match self.repository.create_user(&new_user).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users().await?)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, UserServiceError> {
        let id = Self::validate_id(id)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn update_user(
        &self,
        id: &str,
        body: UpdateUserBody,
    ) -> Result<User, UserServiceError> {
        let id = Self::validate_id(id)?;
        let changes = Self::validate_changes(body)?;

        match self.repository.update_user(id, &changes).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
        let id = Self::validate_id(id)?;

        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    /// Rejects a blank id. The id itself is used as given.
    fn validate_id(id: &str) -> Result<&str, UserServiceError> {
        if id.trim().is_empty() {
            return Err(UserServiceError::MissingId);
        }
        Ok(id)
    }

    fn validate_new_user(body: CreateUserBody) -> Result<NewUser, UserServiceError> {
        let email = non_blank(body.email).ok_or(UserServiceError::MissingRequiredFields)?;
        let name = non_blank(body.name).ok_or(UserServiceError::MissingRequiredFields)?;

        Ok(NewUser {
            email,
            name,
            // An empty avatar is stored as NULL
            avatar_url: body.avatar_url.filter(|url| !url.is_empty()),
        })
    }

    fn validate_changes(body: UpdateUserBody) -> Result<UserChanges, UserServiceError> {
        if matches!(body.email.as_deref(), Some(email) if email.trim().is_empty()) {
            return Err(UserServiceError::BlankField("email"));
        }
        if matches!(body.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(UserServiceError::BlankField("name"));
        }

        Ok(UserChanges {
            email: body.email,
            name: body.name,
            avatar_url: body.avatar_url,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn sample_user() -> User {
        User {
            id: "3f0c6a4e-0000-4000-8000-000000000001".to_string(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut mock_repo = MockUserRepository::new();

        let expected = NewUser {
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            avatar_url: None,
        };

        let user = sample_user();
        mock_repo
            .expect_create_user()
            .with(eq(expected))
            .times(1)
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(user) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let body = CreateUserBody {
            email: Some("test@example.com".to_string()),
            name: Some("Test".to_string()),
            avatar_url: Some(String::new()),
        };

        let user = service.create_user(body).await.expect("Expected Ok result");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn test_create_user_missing_name_skips_repository() {
        // No expectations: any repository call would panic.
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let body = CreateUserBody {
            email: Some("test@example.com".to_string()),
            name: None,
            avatar_url: None,
        };

        let result = service.create_user(body).await;
        assert!(matches!(result, Err(UserServiceError::MissingRequiredFields)));
    }

    #[tokio::test]
    async fn test_create_user_blank_email_skips_repository() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let body = CreateUserBody {
            email: Some("   ".to_string()),
            name: Some("Test".to_string()),
            avatar_url: None,
        };

        let result = service.create_user(body).await;
        assert!(matches!(result, Err(UserServiceError::MissingRequiredFields)));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_maps_to_email_taken() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create_user()
            .times(1)
            .returning(|_| Box::pin(async { Err(RepositoryError::AlreadyExists) }));

        let service = UserService::new(Arc::new(mock_repo));

        let body = CreateUserBody {
            email: Some("test@example.com".to_string()),
            name: Some("Test".to_string()),
            avatar_url: None,
        };

        let result = service.create_user(body).await;
        assert!(matches!(result, Err(UserServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq("missing"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.get_user("missing").await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_blank_id_is_rejected() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.get_user(" ").await,
            Err(UserServiceError::MissingId)
        ));
        assert!(matches!(
            service.delete_user("").await,
            Err(UserServiceError::MissingId)
        ));
        assert!(matches!(
            service.update_user("", UpdateUserBody::default()).await,
            Err(UserServiceError::MissingId)
        ));
    }

    #[tokio::test]
    async fn test_padded_id_reaches_repository_unchanged() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(eq(" abc "))
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.get_user(" abc ").await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_update_user_passes_only_supplied_fields() {
        let mut mock_repo = MockUserRepository::new();

        let expected = UserChanges {
            email: None,
            name: Some("Renamed".to_string()),
            avatar_url: Some(None),
        };

        let mut user = sample_user();
        user.name = "Renamed".to_string();
        mock_repo
            .expect_update_user()
            .with(eq("abc"), eq(expected))
            .times(1)
            .returning(move |_, _| {
                let user = user.clone();
                Box::pin(async move { Ok(user) })
            });

        let service = UserService::new(Arc::new(mock_repo));

        let body = UpdateUserBody {
            email: None,
            name: Some("Renamed".to_string()),
            avatar_url: Some(None),
        };

        let user = service.update_user("abc", body).await.unwrap();
        assert_eq!(user.name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_user_blank_name_is_rejected() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(Arc::new(mock_repo));

        let body = UpdateUserBody {
            name: Some(String::new()),
            ..Default::default()
        };

        let result = service.update_user("abc", body).await;
        assert!(matches!(result, Err(UserServiceError::BlankField("name"))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_delete_user()
            .times(1)
            .returning(|_| Box::pin(async { Err(RepositoryError::NotFound) }));

        let service = UserService::new(Arc::new(mock_repo));

        let result = service.delete_user("abc").await;
        assert!(matches!(result, Err(UserServiceError::UserNotFound)));
    }
}
