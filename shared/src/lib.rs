use serde::{Deserialize, Serialize};

/// Authenticated user reference handed out by the auth gateway.
///
/// The `id` is opaque to the domain layer; it is only ever used as the
/// owner key for stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

/// Account profile: who the user is plus their current balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub user_id: String,
    pub display_name: String,
    /// Current balance. Intended to stay >= 0, enforced by the store's
    /// conditional balance adjustment.
    pub balance: f64,
}

/// An amount owed, due on some date. A debt is deleted when it is paid;
/// there is no other update operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub user_id: String,
    pub description: String,
    /// Always > 0 at creation.
    pub amount: f64,
    /// Due date in storage form (YYYY-MM-DD).
    pub due_date: String,
}

/// Append-only record of a balance top-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRecord {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    /// Creation instant (RFC 3339).
    pub timestamp: String,
}

/// Append-only record of a debt payment. Written exactly once per paid
/// debt, with description and amount copied from the debt at payment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub amount: f64,
    /// Payment instant (RFC 3339).
    pub timestamp: String,
}

/// Direction of a statement entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money added to the account.
    Credit,
    /// Money paid out of the account.
    Debit,
}

/// One row of the merged statement view. Built fresh on every statement
/// refresh; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementEntry {
    pub id: String,
    pub description: String,
    pub amount: f64,
    /// Event instant (RFC 3339).
    pub timestamp: String,
    pub kind: EntryKind,
}

/// Request to create a debt from form input.
///
/// `amount` and `due_date` arrive as the raw text the user typed; the
/// debt service validates and converts both before inserting anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDebtRequest {
    pub description: String,
    pub amount: String,
    /// Due date in display form (DD/MM/YYYY).
    pub due_date: String,
}

/// Response carrying the refreshed open-debt list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtListResponse {
    /// Open debts ordered by due date ascending.
    pub debts: Vec<Debt>,
    pub success_message: String,
}

/// Response after a successful debt payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayDebtResponse {
    /// Balance after the payment, as reported by the store.
    pub balance: f64,
    /// Remaining open debts, re-fetched from the store.
    pub debts: Vec<Debt>,
    /// Refreshed statement, re-fetched from the store.
    pub statement: Vec<StatementEntry>,
    pub notice: Notice,
}

/// Response after funds were added to the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFundsResponse {
    /// Balance after the top-up, as reported by the store.
    pub balance: f64,
    /// Refreshed statement including the new credit entry.
    pub statement: Vec<StatementEntry>,
    pub success_message: String,
}

/// Response after the statement history was cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearStatementResponse {
    pub cleared_credits: u32,
    pub cleared_payments: u32,
    pub success_message: String,
}

/// Everything the account screen needs on first load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountOverview {
    pub profile: AccountProfile,
    pub debts: Vec<Debt>,
    pub statement: Vec<StatementEntry>,
}

/// Transient UI notification with an auto-dismiss window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
    /// How long the UI should keep the notice on screen.
    pub auto_dismiss_ms: u64,
}

/// Sign of a formatted amount, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AmountSign {
    Positive,
    Negative,
}

/// A statement entry formatted for table rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedStatementEntry {
    pub id: String,
    /// Date in display form (DD/MM/YYYY).
    pub formatted_date: String,
    pub description: String,
    /// Signed currency string, e.g. "+$50.00" or "-$12.34".
    pub formatted_amount: String,
    /// Human label for the entry kind, e.g. "Deposit" or "Payment".
    pub kind_label: String,
    pub sign: AmountSign,
}
