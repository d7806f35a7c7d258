//! Statement assembly for the pocketbank application.
//!
//! The statement is a merged, time-ordered view over the two history
//! collections: balance credits and debt payments. It is rebuilt from the
//! store on every refresh and never persisted.

use log::{error, info};
use shared::{ClearStatementResponse, CreditRecord, EntryKind, PaymentRecord, StatementEntry};
use std::sync::Arc;

use super::require_identity;
use crate::error::BankError;
use crate::storage::traits::{AuthGateway, LedgerStore};

/// Description shown for every balance top-up entry.
pub const CREDIT_ENTRY_LABEL: &str = "Funds added";

/// Merge the two history collections into one statement, most recent
/// entry first.
///
/// Credits carry the fixed [`CREDIT_ENTRY_LABEL`]; payments keep their
/// own description. Entries with equal timestamps keep concatenation
/// order (credits before payments), which callers must not rely on.
pub fn build_statement(
    credits: Vec<CreditRecord>,
    payments: Vec<PaymentRecord>,
) -> Vec<StatementEntry> {
    let mut entries: Vec<StatementEntry> = credits
        .into_iter()
        .map(|credit| StatementEntry {
            id: credit.id,
            description: CREDIT_ENTRY_LABEL.to_string(),
            amount: credit.amount,
            timestamp: credit.timestamp,
            kind: EntryKind::Credit,
        })
        .collect();

    entries.extend(payments.into_iter().map(|payment| StatementEntry {
        id: payment.id,
        description: payment.description,
        amount: payment.amount,
        timestamp: payment.timestamp,
        kind: EntryKind::Debit,
    }));

    // RFC 3339 timestamps, so string comparison is chronological.
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

/// Fetch both histories for a user and assemble the statement.
///
/// The two reads are independent; each source already returns its
/// records timestamp-descending, but the merge re-sorts regardless so
/// source ordering is not load-bearing.
pub(crate) async fn fetch_statement(
    ledger: &Arc<dyn LedgerStore>,
    user_id: &str,
) -> Result<Vec<StatementEntry>, BankError> {
    let credits = ledger.list_credits(user_id).await.map_err(|e| {
        error!("Failed to load credit history: {}", e);
        BankError::backend(e)
    })?;
    let payments = ledger.list_payments(user_id).await.map_err(|e| {
        error!("Failed to load payment history: {}", e);
        BankError::backend(e)
    })?;

    Ok(build_statement(credits, payments))
}

/// Service for the statement view and its bulk-clear operation.
#[derive(Clone)]
pub struct StatementService {
    auth: Arc<dyn AuthGateway>,
    ledger: Arc<dyn LedgerStore>,
}

impl StatementService {
    pub fn new(auth: Arc<dyn AuthGateway>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self { auth, ledger }
    }

    /// The signed-in user's statement, most recent entry first.
    pub async fn fetch_statement(&self) -> Result<Vec<StatementEntry>, BankError> {
        let identity = require_identity(&self.auth).await?;
        fetch_statement(&self.ledger, &identity.id).await
    }

    /// Delete the signed-in user's entire statement history.
    ///
    /// Two bulk deletes, not wrapped in a transaction: a failure after
    /// the first leaves the payment history in place. The account
    /// balance is deliberately untouched, so balance and history are
    /// inconsistent afterwards; this is a cosmetic clear of the history
    /// view, not a balance reset.
    pub async fn clear_statement(&self) -> Result<ClearStatementResponse, BankError> {
        let identity = require_identity(&self.auth).await?;

        let cleared_credits = self.ledger.clear_credits(&identity.id).await.map_err(|e| {
            error!("Failed to clear credit history: {}", e);
            BankError::backend(e)
        })?;
        let cleared_payments = self.ledger.clear_payments(&identity.id).await.map_err(|e| {
            error!("Failed to clear payment history: {}", e);
            BankError::backend(e)
        })?;

        info!(
            "Cleared statement for user {}: {} credits, {} payments",
            identity.id, cleared_credits, cleared_payments
        );

        Ok(ClearStatementResponse {
            cleared_credits,
            cleared_payments,
            success_message: "Statement cleared successfully!".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::{AccountRepository, CsvVault, LedgerRepository};
    use crate::storage::memory::MemoryAuthGateway;
    use crate::storage::traits::AccountStore;
    use tempfile::TempDir;

    fn credit(id: &str, amount: f64, timestamp: &str) -> CreditRecord {
        CreditRecord {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            amount,
            timestamp: timestamp.to_string(),
        }
    }

    fn payment(id: &str, description: &str, amount: f64, timestamp: &str) -> PaymentRecord {
        PaymentRecord {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            description: description.to_string(),
            amount,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn statement_contains_every_record_sorted_descending() {
        let credits = vec![
            credit("c1", 50.0, "2025-06-01T10:00:00Z"),
            credit("c2", 25.0, "2025-06-03T10:00:00Z"),
        ];
        let payments = vec![
            payment("p1", "Internet bill", 30.0, "2025-06-02T10:00:00Z"),
        ];

        let statement = build_statement(credits, payments);

        assert_eq!(statement.len(), 3);
        for pair in statement.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        assert_eq!(statement[0].id, "c2");
        assert_eq!(statement[1].id, "p1");
        assert_eq!(statement[2].id, "c1");
    }

    #[test]
    fn credits_use_the_fixed_label_and_payments_keep_theirs() {
        let statement = build_statement(
            vec![credit("c1", 50.0, "2025-06-01T10:00:00Z")],
            vec![payment("p1", "Internet bill", 30.0, "2025-06-02T10:00:00Z")],
        );

        let by_kind = |kind: EntryKind| {
            statement
                .iter()
                .find(|e| e.kind == kind)
                .map(|e| e.description.clone())
                .unwrap()
        };
        assert_eq!(by_kind(EntryKind::Credit), CREDIT_ENTRY_LABEL);
        assert_eq!(by_kind(EntryKind::Debit), "Internet bill");
    }

    #[test]
    fn empty_histories_build_an_empty_statement() {
        assert!(build_statement(Vec::new(), Vec::new()).is_empty());
    }

    async fn setup_service() -> (StatementService, Arc<dyn LedgerStore>, String, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let vault = CsvVault::new(temp_dir.path()).unwrap();
        let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(vault.clone()));
        let ledger: Arc<dyn LedgerStore> = Arc::new(LedgerRepository::new(vault));
        let auth = Arc::new(MemoryAuthGateway::new(accounts));

        let identity = auth.sign_up("kim@example.com", "hunter22", "Kim").await.unwrap();

        let service = StatementService::new(auth, ledger.clone());
        (service, ledger, identity.id, temp_dir)
    }

    #[tokio::test]
    async fn fetch_merges_both_histories_from_the_store() {
        let (service, ledger, user_id, _dir) = setup_service().await;

        ledger.insert_credit(&user_id, 50.0, "2025-06-01T10:00:00Z").await.unwrap();
        ledger
            .insert_payment(&user_id, "Internet bill", 30.0, "2025-06-02T10:00:00Z")
            .await
            .unwrap();

        let statement = service.fetch_statement().await.unwrap();
        assert_eq!(statement.len(), 2);
        assert_eq!(statement[0].kind, EntryKind::Debit);
        assert_eq!(statement[1].kind, EntryKind::Credit);
    }

    #[tokio::test]
    async fn clear_empties_both_histories() {
        let (service, ledger, user_id, _dir) = setup_service().await;

        ledger.insert_credit(&user_id, 50.0, "2025-06-01T10:00:00Z").await.unwrap();
        ledger.insert_credit(&user_id, 25.0, "2025-06-02T10:00:00Z").await.unwrap();
        ledger
            .insert_payment(&user_id, "Internet bill", 30.0, "2025-06-03T10:00:00Z")
            .await
            .unwrap();

        let response = service.clear_statement().await.unwrap();
        assert_eq!(response.cleared_credits, 2);
        assert_eq!(response.cleared_payments, 1);

        assert!(service.fetch_statement().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn operations_require_a_session() {
        let temp_dir = TempDir::new().unwrap();
        let vault = CsvVault::new(temp_dir.path()).unwrap();
        let accounts: Arc<dyn AccountStore> = Arc::new(AccountRepository::new(vault.clone()));
        let ledger: Arc<dyn LedgerStore> = Arc::new(LedgerRepository::new(vault));
        let service = StatementService::new(Arc::new(MemoryAuthGateway::new(accounts)), ledger);

        assert!(matches!(
            service.fetch_statement().await,
            Err(BankError::AuthRequired)
        ));
        assert!(matches!(
            service.clear_statement().await,
            Err(BankError::AuthRequired)
        ));
    }
}
