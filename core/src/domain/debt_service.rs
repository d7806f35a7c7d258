//! Debt lifecycle for the pocketbank application.
//!
//! A debt is either open or gone: paying it records a payment, lowers the
//! balance, and deletes the debt. There is no cancelled state.

use log::{error, info, warn};
use shared::{CreateDebtRequest, Debt, DebtListResponse, Notice, PayDebtResponse};
use std::sync::Arc;

use super::{dates, money, now_rfc3339, require_identity, statement_service};
use crate::error::BankError;
use crate::storage::traits::{AccountStore, AuthGateway, DebtStore, LedgerStore};

/// How long the pay-debt success notice stays on screen.
const NOTICE_DISMISS_MS: u64 = 2000;

/// Service for creating, listing, and paying debts.
#[derive(Clone)]
pub struct DebtService {
    auth: Arc<dyn AuthGateway>,
    accounts: Arc<dyn AccountStore>,
    debts: Arc<dyn DebtStore>,
    ledger: Arc<dyn LedgerStore>,
}

impl DebtService {
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

    /// The signed-in user's open debts, due date ascending.
    pub async fn list_debts(&self) -> Result<Vec<Debt>, BankError> {
        let identity = require_identity(&self.auth).await?;
        self.debts.list_debts(&identity.id).await.map_err(|e| {
            error!("Failed to load debts: {}", e);
            BankError::backend(e)
        })
    }

    /// Validate form input and create a new debt.
    ///
    /// The due date arrives in DD/MM/YYYY display form and is stored as
    /// YYYY-MM-DD. Nothing is inserted unless every field validates.
    pub async fn create_debt(
        &self,
        request: CreateDebtRequest,
    ) -> Result<DebtListResponse, BankError> {
        let identity = require_identity(&self.auth).await?;

        let description = request.description.trim();
        if description.is_empty()
            || request.amount.trim().is_empty()
            || request.due_date.trim().is_empty()
        {
            return Err(BankError::validation(
                "please fill in all required fields",
            ));
        }

        if !dates::is_valid_calendar_date(&request.due_date) {
            return Err(BankError::validation(
                "please enter a valid date in DD/MM/YYYY format",
            ));
        }

        let amount = money::parse_amount(&request.amount).map_err(BankError::Validation)?;
        if amount <= 0.0 {
            return Err(BankError::validation("amount must be greater than 0"));
        }

        let due_date = dates::to_storage_form(&request.due_date);
        let debt = self
            .debts
            .insert_debt(&identity.id, description, amount, &due_date)
            .await
            .map_err(|e| {
                error!("Failed to store debt: {}", e);
                BankError::backend(e)
            })?;

        info!("Created debt {} for user {}", debt.id, identity.id);

        let debts = self.debts.list_debts(&identity.id).await.map_err(|e| {
            error!("Failed to refresh debts after create: {}", e);
            BankError::backend(e)
        })?;

        Ok(DebtListResponse {
            debts,
            success_message: "Debt added successfully".to_string(),
        })
    }

    /// Pay a debt in full.
    ///
    /// Steps, in order: record the payment, lower the balance through the
    /// store's conditional adjustment, delete the debt. If a later step
    /// fails the earlier ones are undone best-effort, so a failed payment
    /// does not leave a stray payment record or a lowered balance behind.
    pub async fn pay_debt(&self, debt: &Debt) -> Result<PayDebtResponse, BankError> {
        let identity = require_identity(&self.auth).await?;
        if debt.user_id != identity.id {
            return Err(BankError::validation(
                "this debt belongs to a different account",
            ));
        }

        let profile = self
            .accounts
            .get_profile(&identity.id)
            .await
            .map_err(|e| {
                error!("Failed to read profile before payment: {}", e);
                BankError::backend(e)
            })?
            .ok_or_else(|| BankError::Backend("account profile not found".to_string()))?;

        if profile.balance < debt.amount {
            return Err(BankError::InsufficientFunds {
                balance: profile.balance,
                required: debt.amount,
            });
        }

        let timestamp = now_rfc3339()?;
        let payment = self
            .ledger
            .insert_payment(&identity.id, &debt.description, debt.amount, &timestamp)
            .await
            .map_err(|e| {
                error!("Failed to record payment for debt {}: {}", debt.id, e);
                BankError::backend(e)
            })?;

        let balance = match self.accounts.adjust_balance(&identity.id, -debt.amount).await {
            Ok(balance) => balance,
            Err(e) => {
                error!("Failed to lower balance for debt {}: {}", debt.id, e);
                self.undo_payment(&identity.id, &payment.id).await;
                return Err(BankError::backend(e));
            }
        };

        match self.debts.delete_debt(&identity.id, &debt.id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Debt {} was already gone; undoing payment", debt.id);
                self.undo_balance(&identity.id, debt.amount).await;
                self.undo_payment(&identity.id, &payment.id).await;
                return Err(BankError::validation("this debt has already been settled"));
            }
            Err(e) => {
                error!("Failed to delete debt {}: {}", debt.id, e);
                self.undo_balance(&identity.id, debt.amount).await;
                self.undo_payment(&identity.id, &payment.id).await;
                return Err(BankError::backend(e));
            }
        }

        info!(
            "Paid debt {} for user {}; balance is now {:.2}",
            debt.id, identity.id, balance
        );

        // Re-fetch both collections so the caller reconciles against the
        // store, not against its own cached view.
        let debts = self.debts.list_debts(&identity.id).await.map_err(|e| {
            error!("Failed to refresh debts after payment: {}", e);
            BankError::backend(e)
        })?;
        let statement = statement_service::fetch_statement(&self.ledger, &identity.id).await?;

        Ok(PayDebtResponse {
            balance,
            debts,
            statement,
            notice: Notice {
                message: "One less debt! 🎉".to_string(),
                auto_dismiss_ms: NOTICE_DISMISS_MS,
            },
        })
    }

    async fn undo_payment(&self, user_id: &str, payment_id: &str) {
        match self.ledger.delete_payment(user_id, payment_id).await {
            Ok(true) => {}
            Ok(false) => warn!("Undo found no payment record {}", payment_id),
            Err(e) => error!(
                "Undo left a stray payment record {} behind: {}",
                payment_id, e
            ),
        }
    }

    async fn undo_balance(&self, user_id: &str, amount: f64) {
        if let Err(e) = self.accounts.adjust_balance(user_id, amount).await {
            error!("Undo failed to restore balance by {:.2}: {}", amount, e);
        }
    }
}
