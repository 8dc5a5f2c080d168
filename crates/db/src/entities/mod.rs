//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounting_periods;
pub mod accounts;
pub mod depreciation_charges;
pub mod disclosure_note_lines;
pub mod disclosure_notes;
pub mod fixed_assets;
pub mod journal_entries;
pub mod journal_lines;
pub mod open_items;
pub mod sea_orm_active_enums;
pub mod tenants;
