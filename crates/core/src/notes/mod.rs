//! Disclosure notes.
//!
//! IFRS notes C (PPE), D (income tax), E (receivables) and F (payables) are
//! computed from sub-ledgers and tied out to the primary statements before
//! they are returned. Period-close notes are persisted working papers.

pub mod ageing;
pub mod income_tax;
pub mod period_close;
pub mod ppe;
pub mod service;
pub mod tieout;
pub mod types;

pub use ageing::{AgeingBand, AgeingSchedule};
pub use income_tax::IncomeTaxMovement;
pub use period_close::{DisclosureNote, NoteLine, PeriodCloseNoteType};
pub use ppe::PpeSchedule;
pub use service::{NoteContext, NoteService};
pub use tieout::{ReconciliationFailure, TieOutChecker};
pub use types::{IfrsNote, NoteCode, NoteRow, NoteTable, StatementReference, TieOutResult};
