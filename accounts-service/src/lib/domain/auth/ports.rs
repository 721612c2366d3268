use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::LoginResult;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Time source for token issue and expiry decisions.
///
/// Injected everywhere a "now" is needed so tests can pin the clock.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Port for the authentication gate.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate credentials and issue a session token.
    ///
    /// # Arguments
    /// * `credentials` - Username and plaintext password
    ///
    /// # Returns
    /// Issued token together with the authenticated user
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password; callers
    ///   cannot tell the two apart
    /// * `AccountDisabled` - Password was correct but the account may not log in
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, credentials: Credentials) -> Result<LoginResult, UserError>;

    /// Register a new account with the default role, enabled.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError>;
}
