use reqwest::{header::AUTHORIZATION, Response, StatusCode};

use super::{
    client::{read_error, ApiClient},
    types::{ApiError, LoginRequest, LoginResponse, LogoutRequest},
};

impl ApiClient {
    /// Verifies credentials against the backend. Storage is left to the
    /// caller; this only talks to the network.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        self.call(
            self.http_client()
                .post(format!("{}/auth/login/", base_url))
                .json(request),
            |response| async move {
                if response.status().is_success() {
                    response
                        .json()
                        .await
                        .map_err(|e| read_error(e, "Failed to parse response"))
                } else {
                    Err(login_error(response).await)
                }
            },
        )
        .await
    }

    pub async fn logout(
        &self,
        access_token: &str,
        refresh_token: Option<String>,
    ) -> Result<(), ApiError> {
        let base_url = self.resolved_base_url().await;
        self.call(
            self.http_client()
                .post(format!("{}/auth/logout/", base_url))
                .header(AUTHORIZATION, format!("Bearer {}", access_token))
                .json(&LogoutRequest {
                    refresh: refresh_token,
                }),
            |response| async move {
                if response.status().is_success() {
                    Ok(())
                } else {
                    let message = error_message(response)
                        .await
                        .unwrap_or_else(|| "Logout failed".into());
                    Err(ApiError::request_failed(message))
                }
            },
        )
        .await
    }
}

async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ApiError>()
        .await
        .ok()
        .map(|e| e.error)
        .filter(|msg| !msg.trim().is_empty())
}

async fn login_error(response: Response) -> ApiError {
    let status = response.status();
    let message = error_message(response).await;
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => ApiError::invalid_credentials(
            message.unwrap_or_else(|| "Invalid credentials".into()),
        ),
        StatusCode::NOT_FOUND => {
            ApiError::profile_not_found(message.unwrap_or_else(|| "Profile not found".into()))
        }
        _ => ApiError::request_failed(
            message.unwrap_or_else(|| format!("Login failed ({})", status.as_u16())),
        ),
    }
}
