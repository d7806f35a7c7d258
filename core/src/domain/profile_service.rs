//! Account profile lookup and the initial overview load.

use log::error;
use shared::{AccountOverview, AccountProfile, Identity};
use std::sync::Arc;

use super::{require_identity, statement_service};
use crate::error::BankError;
use crate::storage::traits::{AccountStore, AuthGateway, DebtStore, LedgerStore};

/// Service for reading the signed-in user's account data.
#[derive(Clone)]
pub struct ProfileService {
    auth: Arc<dyn AuthGateway>,
    accounts: Arc<dyn AccountStore>,
    debts: Arc<dyn DebtStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl ProfileService {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        accounts: Arc<dyn AccountStore>,
        debts: Arc<dyn DebtStore>,
        ledger: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            auth,
            accounts,
            debts,
            ledger,
        }
    }

    /// Display name and current balance of the signed-in user.
    pub async fn fetch_profile(&self) -> Result<AccountProfile, BankError> {
        let identity = require_identity(&self.auth).await?;
        self.profile_for(&identity).await
    }

    /// Everything the account screen needs on first load.
    ///
    /// Profile, debts, and statement are independent reads, so they are
    /// fetched concurrently; the first failure aborts the load.
    pub async fn load_overview(&self) -> Result<AccountOverview, BankError> {
        let identity = require_identity(&self.auth).await?;

        let (profile, debts, statement) = tokio::try_join!(
            self.profile_for(&identity),
            async {
                self.debts.list_debts(&identity.id).await.map_err(|e| {
                    error!("Failed to load debts for overview: {}", e);
                    BankError::backend(e)
                })
            },
            statement_service::fetch_statement(&self.ledger, &identity.id),
        )?;

        Ok(AccountOverview {
            profile,
            debts,
            statement,
        })
    }

    async fn profile_for(&self, identity: &Identity) -> Result<AccountProfile, BankError> {
        self.accounts
            .get_profile(&identity.id)
            .await
            .map_err(|e| {
                error!("Failed to load account profile: {}", e);
                BankError::backend(e)
            })?
            .ok_or_else(|| BankError::Backend("account profile not found".to_string()))
    }
}
