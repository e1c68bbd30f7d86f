use tracing::{info, warn};

use crate::error::ApiError;
use crate::users::dto::RegisterRequest;
use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User, DEFAULT_ROLE};

pub const EMAIL_DOMAIN: &str = "fih.local";
pub const MIN_USERNAME_CHARS: usize = 3;

/// Credentials that passed the presence and length gates.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn validate(req: RegisterRequest) -> Result<Credentials, ApiError> {
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        warn!("username or password missing");
        return Err(ApiError::MissingCredentials);
    }

    if username.chars().count() < MIN_USERNAME_CHARS {
        warn!(%username, "username too short");
        return Err(ApiError::UsernameTooShort);
    }

    Ok(Credentials { username, password })
}

/// First two characters of the username, uppercased.
pub fn derive_avatar(username: &str) -> String {
    username.chars().take(2).collect::<String>().to_uppercase()
}

pub fn derive_email(username: &str) -> String {
    format!("{}@{}", username, EMAIL_DOMAIN)
}

/// Uniqueness check followed by insert. A conflict raised by the store on
/// insert is reported the same way as a hit on the lookup.
pub async fn register_user(store: &dyn UserStore, creds: &Credentials) -> Result<User, ApiError> {
    if store.find_by_username(&creds.username).await?.is_some() {
        warn!(username = %creds.username, "username already exists");
        return Err(ApiError::UsernameTaken);
    }

    let avatar = derive_avatar(&creds.username);
    let email = derive_email(&creds.username);

    let user = store
        .insert(NewUser {
            username: &creds.username,
            password: &creds.password,
            email: &email,
            avatar: &avatar,
            role: DEFAULT_ROLE,
        })
        .await
        .map_err(|e| {
            let e = ApiError::from(e);
            if matches!(e, ApiError::UsernameTaken) {
                warn!(username = %creds.username, "username taken between lookup and insert");
            }
            e
        })?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}
