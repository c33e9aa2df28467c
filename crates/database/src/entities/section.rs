use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub term: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: String,
    pub course_id: String,
    pub session: String,
    pub dclass: String, // r, d
    #[sea_orm(column_name = "type")]
    pub kind: String, // lec, dis, lab, quiz, lec_dis, lec_lab
    pub cancelled: bool,
    pub tot_seats: i32,
    pub taken_seats: i32,
    pub title: String,
    pub sec_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub units_low: Option<f32>,
    pub units_high: Option<f32>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "(Column::Term, Column::CourseId)",
        to = "(super::course::Column::Term, super::course::Column::CourseId)"
    )]
    Course,
    #[sea_orm(has_many = "super::section_detail::Entity")]
    Details,
    #[sea_orm(has_many = "super::section_instructor::Entity")]
    SectionInstructors,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::section_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl Related<super::section_instructor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionInstructors.def()
    }
}

// Many-to-many relationship with instructors
impl Related<super::instructor::Entity> for Entity {
    fn to() -> RelationDef {
        super::section_instructor::Relation::Instructor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::section_instructor::Relation::Section.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
