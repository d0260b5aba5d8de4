use crate::error::AppError;
use crate::models::user::{CreateUserBody, UpdateUserBody, User};
use crate::services::UserServiceError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

const INVALID_BODY: &str = "Cuerpo de la solicitud inválido.";
const EMAIL_TAKEN: &str = "El email ya existe.";

/// The five user routes. Each one owns its not-found and internal-error
/// response texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Create => "create user",
            Operation::List => "list users",
            Operation::Get => "get user",
            Operation::Update => "update user",
            Operation::Delete => "delete user",
        }
    }

    fn not_found_message(self) -> &'static str {
        match self {
            Operation::Update => "Usuario no encontrado para actualizar.",
            Operation::Delete => "Usuario no encontrado para eliminar.",
            _ => "Usuario no encontrado.",
        }
    }

    fn internal_message(self) -> &'static str {
        match self {
            Operation::Create => "Error interno del servidor.",
            Operation::List => "Error obteniendo usuarios.",
            Operation::Get => "Error interno.",
            Operation::Update => "Error actualizando usuario.",
            Operation::Delete => "Error eliminando usuario.",
        }
    }

    /// Logs the failure and converts it into the response error.
    fn fail(self, err: UserServiceError) -> AppError {
        match err {
            UserServiceError::MissingRequiredFields => {
                tracing::warn!("{} rejected: {}", self.name(), err);
                AppError::Validation("Email y Name son requeridos.")
            }
            UserServiceError::BlankField(_) => {
                tracing::warn!("{} rejected: {}", self.name(), err);
                AppError::Validation("Email y Name no pueden estar vacíos.")
            }
            UserServiceError::MissingId => {
                tracing::warn!("{} rejected: {}", self.name(), err);
                AppError::Validation("ID de usuario requerido.")
            }
            UserServiceError::UserNotFound => {
                tracing::warn!("{} failed: {}", self.name(), err);
                AppError::NotFound(self.not_found_message())
            }
            UserServiceError::EmailTaken => {
                tracing::warn!("{} failed: {}", self.name(), err);
                AppError::Conflict(EMAIL_TAKEN)
            }
            UserServiceError::RepositoryError(_) => {
                tracing::error!("{} failed: {}", self.name(), err);
                AppError::Internal(self.internal_message())
            }
        }
    }

    fn reject_body(self, rejection: JsonRejection) -> AppError {
        tracing::warn!("{} rejected malformed body: {}", self.name(), rejection.body_text());
        AppError::Validation(INVALID_BODY)
    }
}

/// POST /users - Create a user
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let op = Operation::Create;
    let Json(body) = payload.map_err(|rejection| op.reject_body(rejection))?;

    let user = state
        .user_service
        .create_user(body)
        .await
        .map_err(|e| op.fail(e))?;

    tracing::info!(user_id = %user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users - List all users
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|e| Operation::List.fail(e))?;

    Ok(Json(users))
}

/// GET /users/{id} - Fetch one user
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state
        .user_service
        .get_user(&id)
        .await
        .map_err(|e| Operation::Get.fail(e))?;

    Ok(Json(user))
}

/// PUT /users/{id} - Update the supplied fields of a user
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserBody>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let op = Operation::Update;
    let Json(body) = payload.map_err(|rejection| op.reject_body(rejection))?;

    let user = state
        .user_service
        .update_user(&id, body)
        .await
        .map_err(|e| op.fail(e))?;

    tracing::info!(user_id = %user.id, "updated user");
    Ok(Json(user))
}

/// DELETE /users/{id} - Delete a user
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .user_service
        .delete_user(&id)
        .await
        .map_err(|e| Operation::Delete.fail(e))?;

    tracing::info!(user_id = %id, "deleted user");
    Ok(StatusCode::NO_CONTENT)
}
