use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::access::Role;
use crate::{
    api::{ApiError, LoginResponse, UserRecord},
    utils::storage::KeyValueStorage,
};

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("stored session is unreadable: {0}")]
    MalformedSession(String),
    #[error("Your account exists but no profile was found. Please contact the system administrator.")]
    MissingProfile,
    #[error("unrecognised role `{0}`")]
    UnknownRole(String),
    #[error("A sign-in attempt is already in progress")]
    SignInPending,
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Request(String),
    #[error("Could not save the session: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            AuthError::MalformedSession(_) => "MALFORMED_SESSION",
            AuthError::MissingProfile => "MISSING_PROFILE",
            AuthError::UnknownRole(_) => "UNKNOWN_ROLE",
            AuthError::SignInPending => "SIGN_IN_PENDING",
            AuthError::Timeout(_) => "TIMEOUT",
            AuthError::Request(_) => "REQUEST_FAILED",
            AuthError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error.code.as_str() {
            ApiError::INVALID_CREDENTIALS => AuthError::InvalidCredentials(error.error),
            ApiError::PROFILE_NOT_FOUND => AuthError::MissingProfile,
            ApiError::TIMEOUT => AuthError::Timeout(error.error),
            _ => AuthError::Request(error.error),
        }
    }
}

/// Authorization projection of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub role: String,
    pub hospital_id: Option<String>,
    pub department_id: Option<String>,
}

impl Profile {
    pub fn role(&self) -> Result<Role, AuthError> {
        self.role.parse()
    }
}

impl From<&UserRecord> for Profile {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role.clone(),
            hospital_id: user.hospital_id.clone(),
            department_id: user.department_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserRecord,
}

fn read(storage: &dyn KeyValueStorage, key: &str) -> Result<Option<String>, AuthError> {
    storage
        .get(key)
        .map(|value| value.filter(|v| !v.trim().is_empty()))
        .map_err(AuthError::MalformedSession)
}

pub(crate) fn load_user(storage: &dyn KeyValueStorage) -> Result<Option<UserRecord>, AuthError> {
    let Some(raw) = read(storage, USER_KEY)? else {
        return Ok(None);
    };
    let user: UserRecord = serde_json::from_str(&raw)
        .map_err(|e| AuthError::MalformedSession(format!("user record: {}", e)))?;
    if user.id.trim().is_empty() {
        return Err(AuthError::MalformedSession("user record has no id".into()));
    }
    Ok(Some(user))
}

/// Reads the persisted session. Both the access token and the user record
/// must be present; anything less is no session.
pub(crate) fn load(storage: &dyn KeyValueStorage) -> Result<Option<StoredSession>, AuthError> {
    let Some(access_token) = read(storage, ACCESS_TOKEN_KEY)? else {
        return Ok(None);
    };
    let Some(user) = load_user(storage)? else {
        return Ok(None);
    };
    Ok(Some(StoredSession {
        access_token,
        refresh_token: read(storage, REFRESH_TOKEN_KEY)?,
        user,
    }))
}

/// Writes the access token last so an interrupted write never leaves a
/// token without its user record.
pub(crate) fn persist(
    storage: &dyn KeyValueStorage,
    response: &LoginResponse,
) -> Result<(), AuthError> {
    let write = || -> Result<(), String> {
        let user_json = serde_json::to_string(&response.user)
            .map_err(|_| "Failed to serialize user record".to_string())?;
        storage.set(USER_KEY, &user_json)?;
        match &response.refresh {
            Some(refresh) => storage.set(REFRESH_TOKEN_KEY, refresh)?,
            None => storage.remove(REFRESH_TOKEN_KEY)?,
        }
        storage.set(ACCESS_TOKEN_KEY, &response.access)
    };
    write().map_err(|err| {
        let _ = clear(storage);
        AuthError::Storage(err)
    })
}

pub(crate) fn clear(storage: &dyn KeyValueStorage) -> Result<(), AuthError> {
    let mut first_error = None;
    for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
        if let Err(err) = storage.remove(key) {
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(AuthError::Storage(err)),
        None => Ok(()),
    }
}

pub(crate) fn tokens(storage: &dyn KeyValueStorage) -> (Option<String>, Option<String>) {
    (
        read(storage, ACCESS_TOKEN_KEY).ok().flatten(),
        read(storage, REFRESH_TOKEN_KEY).ok().flatten(),
    )
}
