//! Disclosure note data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{CurrencyCode, DateRange};

use crate::reports::StatementKind;

/// The IFRS notes the engine produces, by their letter in the accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteCode {
    /// Note C: property, plant and equipment.
    PropertyPlantEquipment,
    /// Note D: income tax.
    IncomeTax,
    /// Note E: trade receivables ageing.
    TradeReceivables,
    /// Note F: trade payables ageing.
    TradePayables,
}

impl NoteCode {
    /// Every note in order.
    pub const ALL: [Self; 4] = [
        Self::PropertyPlantEquipment,
        Self::IncomeTax,
        Self::TradeReceivables,
        Self::TradePayables,
    ];

    /// Letter of the note.
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::PropertyPlantEquipment => "C",
            Self::IncomeTax => "D",
            Self::TradeReceivables => "E",
            Self::TradePayables => "F",
        }
    }

    /// Heading of the note.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PropertyPlantEquipment => "Property, plant and equipment",
            Self::IncomeTax => "Income tax",
            Self::TradeReceivables => "Trade receivables",
            Self::TradePayables => "Trade payables",
        }
    }
}

impl std::fmt::Display for NoteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letter())
    }
}

impl std::str::FromStr for NoteCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "PPE" => Ok(Self::PropertyPlantEquipment),
            "D" | "TAX" => Ok(Self::IncomeTax),
            "E" | "AR" => Ok(Self::TradeReceivables),
            "F" | "AP" => Ok(Self::TradePayables),
            _ => Err(format!("Unknown note: {s}")),
        }
    }
}

/// A row of a note table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRow {
    /// Row label.
    pub label: String,
    /// One value per table column.
    pub values: Vec<Decimal>,
}

/// A table inside a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTable {
    /// Table heading.
    pub title: String,
    /// Column headings (excluding the label column).
    pub columns: Vec<String>,
    /// Rows.
    pub rows: Vec<NoteRow>,
}

impl NoteTable {
    /// A single-column table of labelled amounts.
    #[must_use]
    pub fn single_column(title: &str, column: &str, rows: &[(&str, Decimal)]) -> Self {
        Self {
            title: title.to_string(),
            columns: vec![column.to_string()],
            rows: rows
                .iter()
                .map(|(label, amount)| NoteRow {
                    label: (*label).to_string(),
                    values: vec![*amount],
                })
                .collect(),
        }
    }
}

/// A statement line a note refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementReference {
    /// Statement.
    pub statement: StatementKind,
    /// Line on the statement.
    pub line: String,
    /// Amount on the statement.
    pub amount: Decimal,
}

/// A passed tie-out between a note figure and a statement figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieOutResult {
    /// What is compared.
    pub description: String,
    /// Statement compared against.
    pub statement: StatementKind,
    /// Figure in the note.
    pub note_amount: Decimal,
    /// Figure on the statement.
    pub statement_amount: Decimal,
    /// `note_amount - statement_amount`, within tolerance.
    pub difference: Decimal,
}

/// A disclosure note, produced only when every tie-out passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfrsNote {
    /// Which note.
    pub code: NoteCode,
    /// Heading.
    pub title: String,
    /// Legal name of the reporting entity.
    pub entity_name: String,
    /// Presentation currency.
    pub currency: CurrencyCode,
    /// Period covered.
    pub range: DateRange,
    /// Accounting policy text.
    pub narrative: String,
    /// Tables.
    pub tables: Vec<NoteTable>,
    /// Statement lines referenced by the note.
    pub references: Vec<StatementReference>,
    /// Tie-outs performed.
    pub tie_outs: Vec<TieOutResult>,
}
