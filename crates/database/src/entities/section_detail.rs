use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One meeting pattern of a section, keyed by its position in the catalog's
/// meeting arrays
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub term: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub idx: i32,
    pub day: Option<i16>, // weekday bitmask, 1..=127
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub location: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "(Column::Term, Column::SectionId)",
        to = "(super::section::Column::Term, super::section::Column::SectionId)",
        on_delete = "Cascade"
    )]
    Section,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
