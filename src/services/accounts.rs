use chrono::Duration;

use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password::{self, PasswordCost};
use crate::config::AdminBootstrap;
use crate::error::AppError;
use crate::models::{NewUser, Role, User, UserIdentity};
use crate::store::{Store, StoreError};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// A freshly issued session token and the identity it was issued to.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: UserIdentity,
}

/// Issuing parameters for session tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenSettings<'a> {
    pub secret: &'a str,
    pub ttl: Duration,
}

/// Create a USER account. Returns the public identity, never the hash.
pub async fn register(
    store: &dyn Store,
    cost: PasswordCost,
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserIdentity, AppError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    let user = create_user(store, cost, name, email, password, Role::User).await?;
    tracing::info!(user_id = %user.id, "User registered");
    Ok(UserIdentity::from(&user))
}

async fn create_user(
    store: &dyn Store,
    cost: PasswordCost,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<User, AppError> {
    if store.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }

    let password_hash = password::hash(password, cost).map_err(AppError::Internal)?;

    store
        .create_user(NewUser {
            name,
            email,
            password_hash: &password_hash,
            role,
        })
        .await
        .map_err(|e| match e {
            StoreError::UniqueViolation(_) => {
                AppError::Conflict("Email already in use".to_string())
            }
            other => other.into(),
        })
}

/// Check credentials and issue a token. Unknown email and wrong password fail identically.
pub async fn login(
    store: &dyn Store,
    cost: PasswordCost,
    tokens: TokenSettings<'_>,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let Some(user) = store.find_user_by_email(email).await? else {
        password::verify_dummy(password, cost);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let valid = password::verify(password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let claims = Claims::new(user.id, user.email.clone(), user.role, tokens.ttl)
        .map_err(AppError::Internal)?;
    let token = encode_token(&claims, tokens.secret).map_err(AppError::Internal)?;

    Ok(Session {
        token,
        user: UserIdentity::from(&user),
    })
}

pub async fn profile(store: &dyn Store, user_id: uuid::Uuid) -> Result<User, AppError> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Create the configured administrator unless that email is already registered.
/// Returns whether an account was created.
pub async fn ensure_admin(
    store: &dyn Store,
    cost: PasswordCost,
    admin: &AdminBootstrap,
) -> Result<bool, AppError> {
    if store.find_user_by_email(&admin.email).await?.is_some() {
        return Ok(false);
    }

    match create_user(store, cost, &admin.name, &admin.email, &admin.password, Role::Admin).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Administrator account created");
            Ok(true)
        }
        // Another instance won the race.
        Err(AppError::Conflict(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
