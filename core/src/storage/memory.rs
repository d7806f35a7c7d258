//! In-memory auth gateway.
//!
//! Stands in for the hosted authentication service: it keeps a user
//! table and the active session in process memory, and provisions the
//! account profile when a user signs up (the hosted service does this
//! server-side at user creation). Useful for tests and demos; a real
//! deployment supplies its own [`AuthGateway`] implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use shared::{AccountProfile, Identity};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::storage::traits::{AccountStore, AuthGateway};

const MIN_PASSWORD_LEN: usize = 6;

struct StoredUser {
    id: String,
    email: String,
    password: String,
    display_name: String,
}

#[derive(Default)]
struct AuthState {
    users: Vec<StoredUser>,
    session: Option<Identity>,
}

/// In-memory implementation of [`AuthGateway`].
#[derive(Clone)]
pub struct MemoryAuthGateway {
    accounts: Arc<dyn AccountStore>,
    state: Arc<RwLock<AuthState>>,
}

impl MemoryAuthGateway {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            accounts,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }
}

#[async_trait]
impl AuthGateway for MemoryAuthGateway {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(anyhow::anyhow!("invalid email address"));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(anyhow::anyhow!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        if display_name.trim().is_empty() {
            return Err(anyhow::anyhow!("display name cannot be empty"));
        }

        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == email) {
            return Err(anyhow::anyhow!("a user with this email already exists"));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            display_name: display_name.trim().to_string(),
        };

        self.accounts
            .create_profile(&AccountProfile {
                user_id: identity.id.clone(),
                display_name: identity.display_name.clone(),
                balance: 0.0,
            })
            .await?;

        state.users.push(StoredUser {
            id: identity.id.clone(),
            email,
            password: password.to_string(),
            display_name: identity.display_name.clone(),
        });
        state.session = Some(identity.clone());

        info!("Signed up user {} ({})", identity.display_name, identity.id);
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();
        let mut state = self.state.write().await;

        let user = state
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or_else(|| anyhow::anyhow!("invalid email or password"))?;

        let identity = Identity {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        };
        state.session = Some(identity.clone());

        info!("Signed in user {}", identity.id);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(identity) = state.session.take() {
            info!("Signed out user {}", identity.id);
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Identity>> {
        Ok(self.state.read().await.session.clone())
    }

    async fn refresh_session(&self) -> Result<()> {
        let state = self.state.read().await;
        match &state.session {
            Some(identity) => debug!("Refreshed session for user {}", identity.id),
            None => debug!("No active session to refresh"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::{AccountRepository, CsvVault};
    use tempfile::TempDir;

    fn setup() -> (MemoryAuthGateway, Arc<dyn AccountStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let vault = CsvVault::new(temp_dir.path()).unwrap();
        let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(vault));
        (MemoryAuthGateway::new(accounts.clone()), accounts, temp_dir)
    }

    #[tokio::test]
    async fn sign_up_provisions_a_zero_balance_profile() {
        let (auth, accounts, _dir) = setup();

        let identity = auth.sign_up("kim@example.com", "hunter22", "Kim").await.unwrap();

        let profile = accounts.get_profile(&identity.id).await.unwrap().unwrap();
        assert_eq!(profile.display_name, "Kim");
        assert_eq!(profile.balance, 0.0);

        let current = auth.current_user().await.unwrap().unwrap();
        assert_eq!(current.id, identity.id);
    }

    #[tokio::test]
    async fn sign_up_rejects_bad_input() {
        let (auth, _accounts, _dir) = setup();

        assert!(auth.sign_up("not-an-email", "hunter22", "Kim").await.is_err());
        assert!(auth.sign_up("kim@example.com", "short", "Kim").await.is_err());
        assert!(auth.sign_up("kim@example.com", "hunter22", "  ").await.is_err());

        auth.sign_up("kim@example.com", "hunter22", "Kim").await.unwrap();
        assert!(auth.sign_up("kim@example.com", "hunter23", "Kim II").await.is_err());
    }

    #[tokio::test]
    async fn sign_in_and_out_manage_the_session() {
        let (auth, _accounts, _dir) = setup();

        auth.sign_up("kim@example.com", "hunter22", "Kim").await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current_user().await.unwrap().is_none());

        assert!(auth.sign_in("kim@example.com", "wrong-pass").await.is_err());
        assert!(auth.current_user().await.unwrap().is_none());

        let identity = auth.sign_in("kim@example.com", "hunter22").await.unwrap();
        assert_eq!(identity.display_name, "Kim");
        assert!(auth.current_user().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn refresh_is_a_no_op_without_a_session() {
        let (auth, _accounts, _dir) = setup();
        auth.refresh_session().await.unwrap();
    }
}
