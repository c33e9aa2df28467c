use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, columns)
type IndexSpec = (&'static str, CatalogTable, &'static [CatalogColumn]);

const INDEXES: &[IndexSpec] = &[
    // Courses by department, within and across terms
    ("idx_courses_dept", CatalogTable::Courses, &[CatalogColumn::Dept]),
    (
        "idx_courses_term_dept",
        CatalogTable::Courses,
        &[CatalogColumn::Term, CatalogColumn::Dept],
    ),
    // Sections by parent course and by listing filters
    ("idx_sections_course_id", CatalogTable::Sections, &[CatalogColumn::CourseId]),
    ("idx_sections_dclass", CatalogTable::Sections, &[CatalogColumn::Dclass]),
    ("idx_sections_session", CatalogTable::Sections, &[CatalogColumn::Session]),
    (
        "idx_sections_term_course_id",
        CatalogTable::Sections,
        &[CatalogColumn::Term, CatalogColumn::CourseId],
    ),
    // Meeting patterns by schedule slot
    ("idx_section_details_term", CatalogTable::SectionDetails, &[CatalogColumn::Term]),
    ("idx_section_details_day", CatalogTable::SectionDetails, &[CatalogColumn::Day]),
    (
        "idx_section_details_start_time",
        CatalogTable::SectionDetails,
        &[CatalogColumn::StartTime],
    ),
    (
        "idx_section_details_end_time",
        CatalogTable::SectionDetails,
        &[CatalogColumn::EndTime],
    ),
    // Junction lookups in both directions
    (
        "idx_section_instructors_section_id",
        CatalogTable::SectionInstructors,
        &[CatalogColumn::SectionId],
    ),
    (
        "idx_section_instructors_instructor_id",
        CatalogTable::SectionInstructors,
        &[CatalogColumn::InstructorId],
    ),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for &(name, table, columns) in INDEXES {
            let mut index = Index::create();
            index.name(name).table(table).if_not_exists();
            for &column in columns {
                index.col(column);
            }

            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for &(name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden, Clone, Copy)]
enum CatalogTable {
    Courses,
    Sections,
    SectionDetails,
    SectionInstructors,
}

#[derive(Iden, Clone, Copy)]
enum CatalogColumn {
    Term,
    Dept,
    CourseId,
    Dclass,
    Session,
    SectionId,
    Day,
    StartTime,
    EndTime,
    InstructorId,
}
