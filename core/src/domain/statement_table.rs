//! Statement rows formatted for table rendering.

use shared::{AmountSign, EntryKind, FormattedStatementEntry, StatementEntry};

use super::{dates, money};

/// Human label for an entry kind.
fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Credit => "Deposit",
        EntryKind::Debit => "Payment",
    }
}

/// Format a single statement entry for display.
pub fn format_entry(entry: &StatementEntry) -> FormattedStatementEntry {
    FormattedStatementEntry {
        id: entry.id.clone(),
        formatted_date: dates::to_display_form(&entry.timestamp),
        description: entry.description.clone(),
        formatted_amount: money::format_signed_amount(entry.amount, entry.kind),
        kind_label: kind_label(entry.kind).to_string(),
        sign: match entry.kind {
            EntryKind::Credit => AmountSign::Positive,
            EntryKind::Debit => AmountSign::Negative,
        },
    }
}

/// Format a whole statement, preserving its order.
pub fn format_statement(entries: &[StatementEntry]) -> Vec<FormattedStatementEntry> {
    entries.iter().map(format_entry).collect()
}
