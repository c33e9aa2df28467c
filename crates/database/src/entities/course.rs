use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub term: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: String,
    pub dept: String,
    pub prefix: String,
    pub number: String,
    pub sequence: Option<String>,
    pub suffix: Option<String>,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub units_low: Option<f32>,
    pub units_high: Option<f32>,
    pub units_max: Option<f32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub restr_major: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub restr_class: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub restr_school: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub prereq: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub coreq: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::Dept",
        to = "super::department::Column::Code"
    )]
    Department,
    #[sea_orm(has_many = "super::section::Entity")]
    Sections,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
