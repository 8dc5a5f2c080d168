//! `SeaORM` active enums mirroring the `PostgreSQL` enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "soft_closed")]
    SoftClosed,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "void")]
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "open_item_kind")]
pub enum OpenItemKind {
    #[sea_orm(string_value = "receivable")]
    Receivable,
    #[sea_orm(string_value = "payable")]
    Payable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "note_type")]
pub enum NoteType {
    #[sea_orm(string_value = "ppe_movement")]
    PpeMovement,
    #[sea_orm(string_value = "depreciation")]
    Depreciation,
    #[sea_orm(string_value = "tax_reconciliation")]
    TaxReconciliation,
}

impl From<AccountType> for tieout_core::ledger::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<tieout_core::ledger::AccountType> for AccountType {
    fn from(value: tieout_core::ledger::AccountType) -> Self {
        use tieout_core::ledger::AccountType as Core;
        match value {
            Core::Asset => Self::Asset,
            Core::Liability => Self::Liability,
            Core::Equity => Self::Equity,
            Core::Income => Self::Income,
            Core::Expense => Self::Expense,
        }
    }
}

impl From<PeriodStatus> for tieout_core::fiscal::PeriodStatus {
    fn from(value: PeriodStatus) -> Self {
        match value {
            PeriodStatus::Open => Self::Open,
            PeriodStatus::SoftClosed => Self::SoftClosed,
            PeriodStatus::Closed => Self::Closed,
        }
    }
}

impl From<tieout_core::fiscal::PeriodStatus> for PeriodStatus {
    fn from(value: tieout_core::fiscal::PeriodStatus) -> Self {
        use tieout_core::fiscal::PeriodStatus as Core;
        match value {
            Core::Open => Self::Open,
            Core::SoftClosed => Self::SoftClosed,
            Core::Closed => Self::Closed,
        }
    }
}

impl From<tieout_core::ledger::EntryStatus> for EntryStatus {
    fn from(value: tieout_core::ledger::EntryStatus) -> Self {
        use tieout_core::ledger::EntryStatus as Core;
        match value {
            Core::Draft => Self::Draft,
            Core::Posted => Self::Posted,
            Core::Void => Self::Void,
        }
    }
}

impl From<OpenItemKind> for tieout_core::subledger::OpenItemKind {
    fn from(value: OpenItemKind) -> Self {
        match value {
            OpenItemKind::Receivable => Self::Receivable,
            OpenItemKind::Payable => Self::Payable,
        }
    }
}

impl From<tieout_core::subledger::OpenItemKind> for OpenItemKind {
    fn from(value: tieout_core::subledger::OpenItemKind) -> Self {
        use tieout_core::subledger::OpenItemKind as Core;
        match value {
            Core::Receivable => Self::Receivable,
            Core::Payable => Self::Payable,
        }
    }
}

impl From<NoteType> for tieout_core::notes::PeriodCloseNoteType {
    fn from(value: NoteType) -> Self {
        match value {
            NoteType::PpeMovement => Self::PpeMovement,
            NoteType::Depreciation => Self::Depreciation,
            NoteType::TaxReconciliation => Self::TaxReconciliation,
        }
    }
}

impl From<tieout_core::notes::PeriodCloseNoteType> for NoteType {
    fn from(value: tieout_core::notes::PeriodCloseNoteType) -> Self {
        use tieout_core::notes::PeriodCloseNoteType as Core;
        match value {
            Core::PpeMovement => Self::PpeMovement,
            Core::Depreciation => Self::Depreciation,
            Core::TaxReconciliation => Self::TaxReconciliation,
        }
    }
}
