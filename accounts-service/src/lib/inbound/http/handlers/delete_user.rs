use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::RequireAdmin;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageData {
                    message: "User deleted successfully".to_string(),
                },
            )
        })
}
