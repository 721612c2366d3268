use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Map-backed [`UserRepository`] with the same uniqueness semantics as the
/// database schema. Backs the HTTP test harness.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;

        Ok(users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;

        Ok(users.values().find(|u| u.username == *username).cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        let users = self.users.read().await;

        Ok(users.values().any(|u| u.username == *username))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        let users = self.users.read().await;

        Ok(users.values().any(|u| u.email == *email))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let users = self.users.read().await;

        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(all)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;

        match users.remove(id) {
            Some(_) => Ok(()),
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn user(username: &str, email: &str, created_at_secs: i64) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            role: session_auth::Role::User,
            enabled: true,
            created_at: Utc.timestamp_opt(created_at_secs, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let repository = InMemoryUserRepository::new();
        let created = repository
            .create(user("alice", "alice@example.com", 1_700_000_000))
            .await
            .unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap();
        assert_eq!(by_id.unwrap().username, created.username);

        let by_username = repository
            .find_by_username(&created.username)
            .await
            .unwrap();
        assert_eq!(by_username.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_create_duplicate_username_rejected() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("alice", "alice@example.com", 1_700_000_000))
            .await
            .unwrap();

        let result = repository
            .create(user("alice", "other@example.com", 1_700_000_001))
            .await;

        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_rejected() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("alice", "alice@example.com", 1_700_000_000))
            .await
            .unwrap();

        let result = repository
            .create(user("bob", "alice@example.com", 1_700_000_001))
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_keeping_own_username_is_not_a_collision() {
        let repository = InMemoryUserRepository::new();
        let mut created = repository
            .create(user("alice", "alice@example.com", 1_700_000_000))
            .await
            .unwrap();

        created.enabled = false;
        let updated = repository.update(created).await.unwrap();

        assert!(!updated.enabled);
    }

    #[tokio::test]
    async fn test_update_onto_taken_username_rejected() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("alice", "alice@example.com", 1_700_000_000))
            .await
            .unwrap();
        let mut bob = repository
            .create(user("bob", "bob@example.com", 1_700_000_001))
            .await
            .unwrap();

        bob.username = Username::new("alice".to_string()).unwrap();
        let result = repository.update(bob).await;

        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("older", "older@example.com", 1_700_000_000))
            .await
            .unwrap();
        repository
            .create(user("newer", "newer@example.com", 1_700_000_100))
            .await
            .unwrap();

        let all = repository.list_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username.as_str(), "newer");
        assert_eq!(all[1].username.as_str(), "older");
    }

    #[tokio::test]
    async fn test_delete_missing_user_not_found() {
        let repository = InMemoryUserRepository::new();

        let result = repository.delete(&UserId::new()).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
