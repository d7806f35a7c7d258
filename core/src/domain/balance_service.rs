//! Adding funds to the account.

use log::{error, info};
use shared::{AddFundsResponse, EntryKind};
use std::sync::Arc;

use super::{money, now_rfc3339, require_identity, statement_service};
use crate::error::BankError;
use crate::storage::traits::{AccountStore, AuthGateway, LedgerStore};

/// Service for balance top-ups.
#[derive(Clone)]
pub struct BalanceService {
    auth: Arc<dyn AuthGateway>,
    accounts: Arc<dyn AccountStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl BalanceService {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn LedgerStore>,
    ) -> Self {
        Self {
            auth,
            accounts,
            ledger,
        }
    }

    /// Parse a typed amount, raise the balance, and record the credit.
    ///
    /// A non-numeric or non-positive amount fails validation before
    /// anything is touched. The balance update and the history insert
    /// are two separate calls; if the insert fails after the update
    /// succeeded, balance and history diverge and the failure is
    /// surfaced without compensation.
    pub async fn add_funds(&self, raw_amount: &str) -> Result<AddFundsResponse, BankError> {
        let amount = money::parse_amount(raw_amount).map_err(BankError::Validation)?;
        if amount <= 0.0 {
            return Err(BankError::validation("amount must be greater than 0"));
        }

        let identity = require_identity(&self.auth).await?;

        let balance = self
            .accounts
            .adjust_balance(&identity.id, amount)
            .await
            .map_err(|e| {
                error!("Failed to raise balance: {}", e);
                BankError::backend(e)
            })?;

        let timestamp = now_rfc3339()?;
        if let Err(e) = self.ledger.insert_credit(&identity.id, amount, &timestamp).await {
            error!(
                "Balance was raised but the credit record failed; history now lags the balance: {}",
                e
            );
            return Err(BankError::backend(e));
        }

        info!(
            "Added {:.2} for user {}; balance is now {:.2}",
            amount, identity.id, balance
        );

        let statement = statement_service::fetch_statement(&self.ledger, &identity.id).await?;

        Ok(AddFundsResponse {
            balance,
            statement,
            success_message: format!(
                "🎉 {} added successfully!",
                money::format_signed_amount(amount, EntryKind::Credit)
            ),
        })
    }
}
