//! Note-to-statement tie-out checks.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tieout_shared::types::{round_money, within_tolerance};

use super::types::{NoteCode, StatementReference, TieOutResult};
use crate::reports::StatementKind;

/// A note figure that does not agree with its statement figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error(
    "Note {note} does not tie to {statement} ({tie_out}): note {note_amount}, statement {statement_amount}, difference {difference}"
)]
pub struct ReconciliationFailure {
    /// Note that failed.
    pub note: NoteCode,
    /// Statement it was compared with.
    pub statement: StatementKind,
    /// What was compared.
    pub tie_out: String,
    /// Figure in the note.
    pub note_amount: Decimal,
    /// Figure on the statement.
    pub statement_amount: Decimal,
    /// `note_amount - statement_amount`.
    pub difference: Decimal,
}

impl ReconciliationFailure {
    /// Creates a failure record.
    #[must_use]
    pub fn new(
        note: NoteCode,
        statement: StatementKind,
        tie_out: &str,
        note_amount: Decimal,
        statement_amount: Decimal,
    ) -> Self {
        Self {
            note,
            statement,
            tie_out: tie_out.to_string(),
            note_amount,
            statement_amount,
            difference: round_money(note_amount - statement_amount),
        }
    }
}

/// Compares note figures with statement figures for one note.
#[derive(Debug, Clone)]
pub struct TieOutChecker {
    note: NoteCode,
    tolerance: Decimal,
    passed: Vec<TieOutResult>,
    references: Vec<StatementReference>,
}

impl TieOutChecker {
    /// Creates a checker accepting differences up to `tolerance`.
    #[must_use]
    pub const fn new(note: NoteCode, tolerance: Decimal) -> Self {
        Self {
            note,
            tolerance,
            passed: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Checks one figure, recording the statement line it refers to.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationFailure` if the difference exceeds the tolerance.
    pub fn check(
        &mut self,
        statement: StatementKind,
        description: &str,
        note_amount: Decimal,
        statement_amount: Decimal,
    ) -> Result<(), ReconciliationFailure> {
        if !within_tolerance(note_amount, statement_amount, self.tolerance) {
            return Err(ReconciliationFailure::new(
                self.note,
                statement,
                description,
                note_amount,
                statement_amount,
            ));
        }

        self.references.push(StatementReference {
            statement,
            line: description.to_string(),
            amount: statement_amount,
        });
        self.passed.push(TieOutResult {
            description: description.to_string(),
            statement,
            note_amount,
            statement_amount,
            difference: round_money(note_amount - statement_amount),
        });
        Ok(())
    }

    /// Consumes the checker, returning references and passed tie-outs.
    #[must_use]
    pub fn finish(self) -> (Vec<StatementReference>, Vec<TieOutResult>) {
        (self.references, self.passed)
    }
}
