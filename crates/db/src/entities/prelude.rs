//! Entity re-exports.

pub use super::accounting_periods::Entity as AccountingPeriods;
pub use super::accounts::Entity as Accounts;
pub use super::depreciation_charges::Entity as DepreciationCharges;
pub use super::disclosure_note_lines::Entity as DisclosureNoteLines;
pub use super::disclosure_notes::Entity as DisclosureNotes;
pub use super::fixed_assets::Entity as FixedAssets;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_lines::Entity as JournalLines;
pub use super::open_items::Entity as OpenItems;
pub use super::tenants::Entity as Tenants;
