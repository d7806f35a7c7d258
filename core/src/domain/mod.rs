//! # Domain Module
//!
//! Contains all business logic for the pocketbank application.
//!
//! This module encapsulates the core business rules and services that
//! define how accounts, debts, and the statement view behave. It operates
//! independently of any UI framework and reaches persistent state only
//! through the storage traits.
//!
//! ## Module Organization
//!
//! - **dates**: due-date entry formatting, calendar validation, and
//!   storage/display conversion
//! - **money**: amount parsing and currency formatting
//! - **statement_service**: the merged credit/payment statement view and
//!   the statement-clear operation
//! - **statement_table**: statement rows formatted for table rendering
//! - **debt_service**: debt creation and payment lifecycle
//! - **balance_service**: adding funds to the account
//! - **profile_service**: account profile and the initial overview load
//!
//! ## Business Rules
//!
//! - Debts require a description, a positive amount, and a real calendar
//!   due date before anything is inserted
//! - A debt is paid only when the freshly read balance covers it, and is
//!   deleted once the payment is recorded
//! - Credit and payment histories are append-only; the statement view is
//!   rebuilt from them on every refresh
//! - Every operation requires an authenticated identity and surfaces a
//!   single typed failure, never a raw backend error

pub mod balance_service;
pub mod dates;
pub mod debt_service;
pub mod money;
pub mod profile_service;
pub mod statement_service;
pub mod statement_table;

pub use balance_service::BalanceService;
pub use debt_service::DebtService;
pub use profile_service::ProfileService;
pub use statement_service::StatementService;

use log::error;
use shared::Identity;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;

use crate::error::BankError;
use crate::storage::traits::AuthGateway;

/// Resolve the active identity or fail with [`BankError::AuthRequired`].
pub(crate) async fn require_identity(
    auth: &Arc<dyn AuthGateway>,
) -> Result<Identity, BankError> {
    match auth.current_user().await {
        Ok(Some(identity)) => Ok(identity),
        Ok(None) => Err(BankError::AuthRequired),
        Err(e) => {
            error!("Failed to resolve the current user: {}", e);
            Err(BankError::backend(e))
        }
    }
}

/// Current instant as an RFC 3339 string, the storage form for all
/// event timestamps.
///
/// Whole-second precision: a variable number of fractional digits would
/// break the lexicographic-equals-chronological ordering the statement
/// sort relies on.
pub(crate) fn now_rfc3339() -> Result<String, BankError> {
    time::OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .map_err(|e| BankError::Backend(format!("failed to build timestamp: {}", e)))?
        .format(&Rfc3339)
        .map_err(|e| BankError::Backend(format!("failed to format timestamp: {}", e)))
}
