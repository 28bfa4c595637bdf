//! Authentication service.
//!
//! Password registration and login, plus the opaque bearer tokens the rest
//! of the API authenticates with.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sqlx::SqlitePool;

use plantsco_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::tokens::TokenRepository;
use crate::db::users::UserRepository;
use crate::models::user::{CurrentUser, NewUser, UserProfile};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw byte length of minted tokens, before base64.
const TOKEN_BYTES: usize = 32;

/// Avatar assigned when registration omits one.
pub const DEFAULT_AVATAR: &str = "Default-Avatar.svg";

/// Authentication service.
///
/// Handles registration, login, and token issuance/revocation.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: TokenRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: TokenRepository::new(pool),
        }
    }

    /// Register a new user and issue their first token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, new_user: &NewUser) -> Result<(UserProfile, String), AuthError> {
        let email = Email::parse(&new_user.email)?;
        validate_password(&new_user.password)?;
        let password_hash = hash_password(&new_user.password)?;

        let image_url = new_user.image_url.as_deref().unwrap_or(DEFAULT_AVATAR);

        let user = self
            .users
            .create(
                &email,
                &new_user.first_name,
                &new_user.last_name,
                image_url,
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let token = self.issue_token(user.id).await?;
        Ok((user, token))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserProfile, String), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_auth_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.issue_token(user.id).await?;
        Ok((user, token))
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for unknown or revoked tokens.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        self.tokens
            .find_user(token)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Revoke a token.
    ///
    /// # Returns
    ///
    /// Returns `true` if the token existed, `false` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn logout(&self, token: &str) -> Result<bool, AuthError> {
        let revoked = self.tokens.delete(token).await?;
        Ok(revoked)
    }

    /// Mint and store a fresh token for a user.
    async fn issue_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let token = mint_token();
        self.tokens.insert(user_id, &token).await?;
        Ok(token)
    }
}

/// Generate an opaque URL-safe token.
fn mint_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
