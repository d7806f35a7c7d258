//! # Pocketbank Core
//!
//! Contains all non-UI logic for the pocketbank demo application.
//!
//! This crate brings together:
//! - **Domain**: business logic for debts, balance, and the statement view
//! - **Storage**: the capability contract for the backing store and auth
//!   gateway, plus the bundled CSV reference implementation
//! - **Session**: the foreground/background session monitor that keeps
//!   credentials fresh while the app is active
//!
//! The crate is UI-agnostic: it could back a mobile shell, a desktop
//! frontend, or a CLI without modification. All persistent state is
//! reached through the traits in [`storage::traits`], so the bundled CSV
//! store can be swapped for any hosted backend that satisfies the same
//! contract.

pub mod domain;
pub mod error;
pub mod session;
pub mod storage;

pub use error::BankError;

use std::sync::Arc;

use domain::balance_service::BalanceService;
use domain::debt_service::DebtService;
use domain::profile_service::ProfileService;
use domain::statement_service::StatementService;
use storage::traits::{AccountStore, AuthGateway, DebtStore, LedgerStore};

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub debt_service: DebtService,
    pub balance_service: BalanceService,
    pub statement_service: StatementService,
}

impl AppState {
    /// Wire the services against a storage backend and auth gateway.
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        accounts: Arc<dyn AccountStore>,
        debts: Arc<dyn DebtStore>,
        ledger: Arc<dyn LedgerStore>,
    ) -> Self {
        let profile_service =
            ProfileService::new(auth.clone(), accounts.clone(), debts.clone(), ledger.clone());
        let debt_service =
            DebtService::new(auth.clone(), accounts.clone(), debts.clone(), ledger.clone());
        let balance_service = BalanceService::new(auth.clone(), accounts, ledger.clone());
        let statement_service = StatementService::new(auth, ledger);

        Self {
            profile_service,
            debt_service,
            balance_service,
            statement_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CreateDebtRequest;
    use storage::csv::{AccountRepository, CsvVault, DebtRepository, LedgerRepository};
    use storage::memory::MemoryAuthGateway;
    use tempfile::TempDir;

    #[tokio::test]
    async fn full_account_flow_through_the_app_state() {
        let temp_dir = TempDir::new().unwrap();
        let vault = CsvVault::new(temp_dir.path()).unwrap();
        let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(vault.clone()));
        let debts: Arc<dyn DebtStore> = Arc::new(DebtRepository::new(vault.clone()));
        let ledger: Arc<dyn LedgerStore> = Arc::new(LedgerRepository::new(vault));
        let auth: Arc<dyn AuthGateway> = Arc::new(MemoryAuthGateway::new(accounts.clone()));

        auth.sign_up("kim@example.com", "hunter22", "Kim").await.unwrap();

        let app = AppState::new(auth, accounts, debts, ledger);

        let funded = app.balance_service.add_funds("200").await.unwrap();
        assert_eq!(funded.balance, 200.0);

        app.debt_service
            .create_debt(CreateDebtRequest {
                description: "Internet bill".to_string(),
                amount: "50".to_string(),
                due_date: "15/06/2025".to_string(),
            })
            .await
            .unwrap();

        let debt = app.debt_service.list_debts().await.unwrap().remove(0);
        let paid = app.debt_service.pay_debt(&debt).await.unwrap();
        assert_eq!(paid.balance, 150.0);

        let overview = app.profile_service.load_overview().await.unwrap();
        assert_eq!(overview.profile.balance, 150.0);
        assert!(overview.debts.is_empty());
        // One credit entry and one payment entry, most recent first.
        assert_eq!(overview.statement.len(), 2);

        let cleared = app.statement_service.clear_statement().await.unwrap();
        assert_eq!(cleared.cleared_credits, 1);
        assert_eq!(cleared.cleared_payments, 1);

        // Clearing the history does not reset the balance.
        let profile = app.profile_service.fetch_profile().await.unwrap();
        assert_eq!(profile.balance, 150.0);
    }
}
