use crate::{
    api::UserRecord,
    state::{access::RouteTable, auth::Credentials, session::AuthError},
};

pub fn validate_credentials(identifier: &str, secret: &str) -> Result<Credentials, AuthError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AuthError::InvalidCredentials(
            "Please enter your email or ID".into(),
        ));
    }
    if secret.is_empty() {
        return Err(AuthError::InvalidCredentials(
            "Please enter your password".into(),
        ));
    }
    Ok(Credentials {
        identifier: identifier.to_string(),
        secret: secret.to_string(),
    })
}

/// Where a freshly signed-in user lands.
pub fn landing_path(table: &RouteTable, user: &UserRecord) -> Result<String, AuthError> {
    table
        .home_for_role_name(&user.role)
        .map(str::to_string)
        .ok_or_else(|| AuthError::UnknownRole(user.role.clone()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    Land(String),
    Rejected(AuthError),
    /// Signed in, but the account has nowhere to go; the session must be
    /// dropped before the error is shown.
    Discard(AuthError),
}

pub fn sign_in_outcome(
    table: &RouteTable,
    result: Result<UserRecord, AuthError>,
) -> SignInOutcome {
    match result {
        Ok(user) => match landing_path(table, &user) {
            Ok(path) => SignInOutcome::Land(path),
            Err(err) => SignInOutcome::Discard(err),
        },
        Err(err) => SignInOutcome::Rejected(err),
    }
}
