use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use session_auth::Role;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::LoginResult;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let credentials = Credentials {
        username: body.username,
        password: body.password,
    };

    state
        .auth_service
        .login(credentials)
        .await
        .map_err(ApiError::from)
        .map(|ref result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&LoginResult> for LoginResponseData {
    fn from(result: &LoginResult) -> Self {
        Self {
            token: result.token.clone(),
            token_type: "Bearer".to_string(),
            username: result.user.username.as_str().to_string(),
            email: result.user.email.as_str().to_string(),
            role: result.user.role,
        }
    }
}
