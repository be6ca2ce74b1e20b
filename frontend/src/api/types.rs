use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserRecord,
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

/// User record as returned by the login endpoint and kept in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
}

impl UserRecord {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl ApiError {
    pub const INVALID_CREDENTIALS: &'static str = "INVALID_CREDENTIALS";
    pub const PROFILE_NOT_FOUND: &'static str = "PROFILE_NOT_FOUND";
    pub const TIMEOUT: &'static str = "TIMEOUT";
    pub const REQUEST_FAILED: &'static str = "REQUEST_FAILED";
    pub const UNKNOWN: &'static str = "UNKNOWN";

    fn with_code(msg: impl Into<String>, code: &str) -> Self {
        Self {
            error: msg.into(),
            code: code.to_string(),
            details: None,
        }
    }

    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::with_code(msg, Self::INVALID_CREDENTIALS)
    }

    pub fn profile_not_found(msg: impl Into<String>) -> Self {
        Self::with_code(msg, Self::PROFILE_NOT_FOUND)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::with_code(msg, Self::TIMEOUT)
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::with_code(msg, Self::REQUEST_FAILED)
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::with_code(msg, Self::UNKNOWN)
    }
}
