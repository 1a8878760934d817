//! Account operations over the user collection and the session store.

use chrono::Utc;
use tracing::{info, warn};

use crate::accounts::password::{hash_password, verify_password};
use crate::accounts::session::{Session, SessionStore};
use crate::db::UserStore;
use crate::errors::AppError;
use crate::models::user::UserRow;

/// Creates a new user with a salted password hash.
///
/// Fails with `DuplicateUser` if the username exists, including when a
/// concurrent registration wins the insert.
pub async fn register(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<UserRow, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    if users.find_user(username).await?.is_some() {
        return Err(AppError::DuplicateUser(username.to_string()));
    }

    let user = UserRow {
        username: username.to_string(),
        password_hash: hash_password(password)?,
        created_at: Utc::now(),
    };

    if !users.insert_user(&user).await? {
        return Err(AppError::DuplicateUser(user.username));
    }

    info!(username = %user.username, "user registered");
    Ok(user)
}

/// Verifies credentials and returns the stored identity.
/// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
pub async fn authenticate(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<UserRow, AppError> {
    let Some(user) = users.find_user(username.trim()).await? else {
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(username = %user.username, "failed login attempt");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

/// Authenticates and opens a new session for the user.
pub async fn login(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    username: &str,
    password: &str,
) -> Result<Session, AppError> {
    let user = authenticate(users, username, password).await?;
    let session = Session::new(&user.username);
    sessions.put(&session).await?;
    info!(username = %user.username, "session opened");
    Ok(session)
}

/// Destroys the session; its token is rejected from then on.
pub async fn logout(sessions: &dyn SessionStore, session: &Session) -> Result<(), AppError> {
    sessions.destroy(session.token).await?;
    info!(username = %session.username, "session closed");
    Ok(())
}
