//! Period-close note repository.
//!
//! A note is unique per tenant, period and type. Regenerating it keeps the
//! ID, bumps the version and replaces every line. The notes of one period
//! are written together in a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tieout_core::notes::{DisclosureNote, NoteLine};
use tieout_core::source::{NoteStore, SourceError, note_batch_scope};
use tieout_shared::types::{AccountingPeriodId, DisclosureNoteId, TenantId};
use uuid::Uuid;

use super::RepositoryError;
use crate::entities::{
    disclosure_note_lines, disclosure_notes, sea_orm_active_enums::NoteType,
};
use crate::rls::RlsExt;

/// Stores period-close notes.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    db: DatabaseConnection,
}

impl NoteRepository {
    /// Creates a new note repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the note or replaces the stored note of the same type for the
    /// same period, returning it with its stored ID and version.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(&self, note: DisclosureNote) -> Result<DisclosureNote, RepositoryError> {
        let rls = self.db.with_rls(note.tenant_id).await?;
        let note = Self::upsert_in(rls.transaction(), note).await?;
        rls.commit().await?;
        Ok(note)
    }

    /// Stores every note of one period in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the notes span more than one period or any write
    /// fails; nothing is committed in either case.
    pub async fn replace_for_period(
        &self,
        notes: Vec<DisclosureNote>,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        let Some((tenant_id, _)) = note_batch_scope(&notes)? else {
            return Ok(notes);
        };
        let rls = self.db.with_rls(tenant_id).await.map_err(RepositoryError::from)?;

        let mut stored = Vec::with_capacity(notes.len());
        for note in notes {
            stored.push(Self::upsert_in(rls.transaction(), note).await?);
        }
        rls.commit().await.map_err(RepositoryError::from)?;
        Ok(stored)
    }

    /// Writes one note inside `txn`.
    ///
    /// The existing row is locked for the duration of the write, so two
    /// concurrent regenerations produce consecutive versions.
    async fn upsert_in(
        txn: &DatabaseTransaction,
        mut note: DisclosureNote,
    ) -> Result<DisclosureNote, RepositoryError> {
        let note_type = NoteType::from(note.note_type);

        let existing = disclosure_notes::Entity::find()
            .filter(disclosure_notes::Column::TenantId.eq(note.tenant_id.into_inner()))
            .filter(disclosure_notes::Column::PeriodId.eq(note.period_id.into_inner()))
            .filter(disclosure_notes::Column::NoteType.eq(note_type))
            .lock_exclusive()
            .one(txn)
            .await?;

        if let Some(row) = existing {
            note.id = DisclosureNoteId::from_uuid(row.id);
            note.version = row.version + 1;

            let mut active: disclosure_notes::ActiveModel = row.into();
            active.version = Set(note.version);
            active.generated_at = Set(note.generated_at.into());
            active.update(txn).await?;

            disclosure_note_lines::Entity::delete_many()
                .filter(disclosure_note_lines::Column::NoteId.eq(note.id.into_inner()))
                .exec(txn)
                .await?;
        } else {
            note.version = 1;
            disclosure_notes::ActiveModel {
                id: Set(note.id.into_inner()),
                tenant_id: Set(note.tenant_id.into_inner()),
                period_id: Set(note.period_id.into_inner()),
                note_type: Set(note_type),
                version: Set(note.version),
                generated_at: Set(note.generated_at.into()),
            }
            .insert(txn)
            .await?;
        }

        if !note.lines.is_empty() {
            let lines = note.lines.iter().map(|line| disclosure_note_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(note.tenant_id.into_inner()),
                note_id: Set(note.id.into_inner()),
                line_no: Set(line.line_no),
                label: Set(line.label.clone()),
                amount: Set(line.amount),
            });
            disclosure_note_lines::Entity::insert_many(lines)
                .exec(txn)
                .await?;
        }

        tracing::debug!(
            tenant_id = %note.tenant_id,
            period_id = %note.period_id,
            note_type = note.note_type.as_str(),
            version = note.version,
            "Stored period-close note"
        );
        Ok(note)
    }

    /// Notes stored for a period, each with its lines in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_period(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Vec<DisclosureNote>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;
        let txn = rls.transaction();

        let notes = disclosure_notes::Entity::find()
            .filter(disclosure_notes::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(disclosure_notes::Column::PeriodId.eq(period_id.into_inner()))
            .all(txn)
            .await?;

        let mut lines_by_note: HashMap<Uuid, Vec<NoteLine>> = HashMap::new();
        if !notes.is_empty() {
            let lines = disclosure_note_lines::Entity::find()
                .filter(
                    disclosure_note_lines::Column::NoteId
                        .is_in(notes.iter().map(|n| n.id).collect::<Vec<_>>()),
                )
                .order_by_asc(disclosure_note_lines::Column::NoteId)
                .order_by_asc(disclosure_note_lines::Column::LineNo)
                .all(txn)
                .await?;
            for line in lines {
                lines_by_note.entry(line.note_id).or_default().push(NoteLine {
                    line_no: line.line_no,
                    label: line.label,
                    amount: line.amount,
                });
            }
        }
        rls.commit().await?;

        let mut result: Vec<DisclosureNote> = notes
            .into_iter()
            .map(|row| DisclosureNote {
                id: DisclosureNoteId::from_uuid(row.id),
                tenant_id: TenantId::from_uuid(row.tenant_id),
                period_id: AccountingPeriodId::from_uuid(row.period_id),
                note_type: row.note_type.into(),
                version: row.version,
                generated_at: row.generated_at.with_timezone(&Utc),
                lines: lines_by_note.remove(&row.id).unwrap_or_default(),
            })
            .collect();
        result.sort_by_key(|n| n.note_type.as_str());

        Ok(result)
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn upsert_note(&self, note: DisclosureNote) -> Result<DisclosureNote, SourceError> {
        Ok(self.upsert(note).await?)
    }

    async fn replace_period_notes(
        &self,
        notes: Vec<DisclosureNote>,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        self.replace_for_period(notes).await
    }

    async fn list_notes(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        Ok(self.list_for_period(tenant_id, period_id).await?)
    }
}
