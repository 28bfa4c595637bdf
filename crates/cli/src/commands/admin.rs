//! Admin user management commands.

use plantsco_api::config::Config;
use plantsco_api::db::{self, UserRepository};
use plantsco_api::models::user::UserUpdate;
use plantsco_api::services::auth;
use plantsco_core::Email;

/// Create a user with the admin flag set.
///
/// # Errors
///
/// Returns an error if the email is invalid, the email is already taken,
/// or the database cannot be reached.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let email = Email::parse(email)?;
    let password_hash = auth::hash_password(password)?;

    let users = UserRepository::new(&pool);
    let user = users
        .create(
            &email,
            first_name,
            last_name,
            auth::DEFAULT_AVATAR,
            &password_hash,
        )
        .await?;

    let changes = UserUpdate {
        role: Some("admin".to_string()),
        is_admin: Some(true),
        ..UserUpdate::default()
    };
    let user = users.update(user.id, &changes, None).await?;

    tracing::info!("Created admin user {} ({})", user.email, user.id);
    Ok(())
}
