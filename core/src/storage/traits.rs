//! # Storage Traits
//!
//! Capability contract for the backing store and auth gateway.
//!
//! These traits abstract away the specific backend, allowing the domain
//! layer to work with any hosted store or local implementation without
//! modification. All stored ids are opaque strings assigned by the store
//! on insert.

use anyhow::Result;
use async_trait::async_trait;
use shared::{AccountProfile, CreditRecord, Debt, Identity, PaymentRecord};

/// Interface for account profile storage operations.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Store a freshly provisioned profile.
    async fn create_profile(&self, profile: &AccountProfile) -> Result<()>;

    /// Retrieve a profile by owner id.
    async fn get_profile(&self, user_id: &str) -> Result<Option<AccountProfile>>;

    /// Atomically apply `delta` to the stored balance.
    ///
    /// Fails without mutating anything if the profile is missing or the
    /// resulting balance would be negative. Returns the new balance,
    /// which callers treat as authoritative.
    async fn adjust_balance(&self, user_id: &str, delta: f64) -> Result<f64>;
}

/// Interface for debt storage operations.
#[async_trait]
pub trait DebtStore: Send + Sync {
    /// Insert a new debt; the store assigns the id.
    async fn insert_debt(
        &self,
        user_id: &str,
        description: &str,
        amount: f64,
        due_date: &str,
    ) -> Result<Debt>;

    /// List a user's open debts ordered by due date ascending.
    async fn list_debts(&self, user_id: &str) -> Result<Vec<Debt>>;

    /// Delete a debt by id.
    /// Returns true if the debt was found and deleted, false otherwise.
    async fn delete_debt(&self, user_id: &str, debt_id: &str) -> Result<bool>;
}

/// Interface for the two append-only history collections.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Record a balance top-up; the store assigns the id.
    async fn insert_credit(
        &self,
        user_id: &str,
        amount: f64,
        timestamp: &str,
    ) -> Result<CreditRecord>;

    /// List a user's credit records ordered by timestamp descending.
    async fn list_credits(&self, user_id: &str) -> Result<Vec<CreditRecord>>;

    /// Delete all of a user's credit records.
    /// Returns the number of records removed.
    async fn clear_credits(&self, user_id: &str) -> Result<u32>;

    /// Record a debt payment; the store assigns the id.
    async fn insert_payment(
        &self,
        user_id: &str,
        description: &str,
        amount: f64,
        timestamp: &str,
    ) -> Result<PaymentRecord>;

    /// List a user's payment records ordered by timestamp descending.
    async fn list_payments(&self, user_id: &str) -> Result<Vec<PaymentRecord>>;

    /// Delete a single payment record (used to undo a half-finished
    /// payment). Returns true if the record was found and deleted.
    async fn delete_payment(&self, user_id: &str, payment_id: &str) -> Result<bool>;

    /// Delete all of a user's payment records.
    /// Returns the number of records removed.
    async fn clear_payments(&self, user_id: &str) -> Result<u32>;
}

/// Interface to the authentication service.
///
/// The core never stores credentials itself; it only asks the gateway
/// who is currently signed in and keeps the session fresh through
/// [`AuthGateway::refresh_session`].
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Register a new user and provision their account profile.
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<Identity>;

    /// Authenticate with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    /// End the current session.
    async fn sign_out(&self) -> Result<()>;

    /// The identity of the active session, if any.
    async fn current_user(&self) -> Result<Option<Identity>>;

    /// Renew the session's credentials. A no-op when nobody is signed in.
    async fn refresh_session(&self) -> Result<()>;
}
