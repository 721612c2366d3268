use std::sync::Arc;

use async_trait::async_trait;
use session_auth::PasswordHasher;
use session_auth::Role;
use session_auth::TokenCodec;

use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::LoginResult;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::Clock;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Domain service implementation for the authentication gate.
///
/// Owns the login and registration flows; everything else about user
/// administration lives in the user service.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
    default_role: Role,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_codec` - Codec session tokens are issued and verified with
    /// * `clock` - Time source for token issue instants
    /// * `default_role` - Role granted to newly registered accounts
    pub fn new(
        repository: Arc<UR>,
        token_codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
        default_role: Role,
    ) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_codec,
            clock,
            default_role,
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, credentials: Credentials) -> Result<LoginResult, UserError> {
        // A name that fails validation can never match a stored account, so it
        // collapses into the same error as an unknown one
        let username =
            Username::new(credentials.username).map_err(|_| UserError::InvalidCredentials)?;

        let user = self
            .repository
            .find_by_username(&username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self
            .password_hasher
            .verify(&credentials.password, &user.password_hash)
        {
            return Err(UserError::InvalidCredentials);
        }

        // Disclosed only once the password has been proven
        if !user.enabled {
            return Err(UserError::AccountDisabled);
        }

        let token = self
            .token_codec
            .issue(user.username.as_str(), user.role, self.clock.now())?;

        Ok(LoginResult { token, user })
    }

    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self.repository.exists_by_username(&command.username).await? {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: self.default_role,
            enabled: true,
            created_at: self.clock.now(),
        };

        // The store's unique constraints still arbitrate races between the
        // checks above and this insert
        self.repository.create(user).await
    }
}
