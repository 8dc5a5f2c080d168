//! `SeaORM` Entity for disclosure_note_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "disclosure_note_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub note_id: Uuid,
    pub line_no: i32,
    pub label: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::disclosure_notes::Entity",
        from = "Column::NoteId",
        to = "super::disclosure_notes::Column::Id",
        on_delete = "Cascade"
    )]
    DisclosureNotes,
}

impl Related<super::disclosure_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DisclosureNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
