use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instructors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    #[sea_orm(unique)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_instructor::Entity")]
    SectionInstructors,
}

impl Related<super::section_instructor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionInstructors.def()
    }
}

// Many-to-many relationship with sections
impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_instructor::Relation::Section.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_instructor::Relation::Instructor.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
