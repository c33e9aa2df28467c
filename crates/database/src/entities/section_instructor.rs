use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction table for many-to-many relationship between sections and instructors
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "section_instructors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub term: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub instructor_name: String,
    pub instructor_id: String,
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
    #[sea_orm(
        belongs_to = "super::instructor::Entity",
        from = "Column::InstructorName",
        to = "super::instructor::Column::Name",
        on_update = "Cascade"
    )]
    Instructor,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::instructor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
