use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Code)
                            .string_len(4)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).text().not_null())
                    .col(ColumnDef::new(Departments::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create courses table, one row per course per term
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Term).string_len(4).not_null())
                    .col(ColumnDef::new(Courses::CourseId).string_len(9).not_null())
                    .col(ColumnDef::new(Courses::Dept).string_len(4).not_null())
                    .col(ColumnDef::new(Courses::Prefix).string_len(4).not_null())
                    .col(ColumnDef::new(Courses::Number).string_len(3).not_null())
                    .col(ColumnDef::new(Courses::Sequence).string_len(1))
                    .col(ColumnDef::new(Courses::Suffix).string_len(6))
                    .col(ColumnDef::new(Courses::Title).text().not_null())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::UnitsLow).float())
                    .col(ColumnDef::new(Courses::UnitsHigh).float())
                    .col(ColumnDef::new(Courses::UnitsMax).float())
                    .col(ColumnDef::new(Courses::RestrMajor).text())
                    .col(ColumnDef::new(Courses::RestrClass).text())
                    .col(ColumnDef::new(Courses::RestrSchool).text())
                    .col(ColumnDef::new(Courses::Prereq).text())
                    .col(ColumnDef::new(Courses::Coreq).text())
                    .col(ColumnDef::new(Courses::UpdatedAt).date_time().not_null())
                    .primary_key(Index::create().col(Courses::Term).col(Courses::CourseId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-dept")
                            .from(Courses::Table, Courses::Dept)
                            .to(Departments::Table, Departments::Code)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sections table
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sections::Term).string_len(4).not_null())
                    .col(ColumnDef::new(Sections::SectionId).string_len(5).not_null())
                    .col(ColumnDef::new(Sections::CourseId).string_len(9).not_null())
                    .col(ColumnDef::new(Sections::Session).string_len(3).not_null())
                    .col(ColumnDef::new(Sections::Dclass).string_len(1).not_null())
                    .col(ColumnDef::new(Sections::Type).string_len(7).not_null())
                    .col(ColumnDef::new(Sections::Cancelled).boolean().not_null())
                    .col(ColumnDef::new(Sections::TotSeats).integer().not_null())
                    .col(ColumnDef::new(Sections::TakenSeats).integer().not_null())
                    .col(ColumnDef::new(Sections::Title).text().not_null())
                    .col(ColumnDef::new(Sections::SecTitle).text())
                    .col(ColumnDef::new(Sections::Description).text())
                    .col(ColumnDef::new(Sections::Notes).text())
                    .col(ColumnDef::new(Sections::UnitsLow).float())
                    .col(ColumnDef::new(Sections::UnitsHigh).float())
                    .col(ColumnDef::new(Sections::UpdatedAt).date_time().not_null())
                    .primary_key(Index::create().col(Sections::Term).col(Sections::SectionId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sections-course")
                            .from(Sections::Table, (Sections::Term, Sections::CourseId))
                            .to(Courses::Table, (Courses::Term, Courses::CourseId))
                            .on_update(ForeignKeyAction::Restrict)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Create section_details table, one row per meeting pattern
        manager
            .create_table(
                Table::create()
                    .table(SectionDetails::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SectionDetails::Term).string_len(4).not_null())
                    .col(ColumnDef::new(SectionDetails::SectionId).string_len(5).not_null())
                    .col(ColumnDef::new(SectionDetails::Idx).integer().not_null())
                    .col(ColumnDef::new(SectionDetails::Day).small_integer())
                    .col(ColumnDef::new(SectionDetails::StartTime).time())
                    .col(ColumnDef::new(SectionDetails::EndTime).time())
                    .col(ColumnDef::new(SectionDetails::Location).text())
                    .col(ColumnDef::new(SectionDetails::UpdatedAt).date_time().not_null())
                    .primary_key(
                        Index::create()
                            .col(SectionDetails::Term)
                            .col(SectionDetails::SectionId)
                            .col(SectionDetails::Idx),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_details-section")
                            .from(
                                SectionDetails::Table,
                                (SectionDetails::Term, SectionDetails::SectionId),
                            )
                            .to(Sections::Table, (Sections::Term, Sections::SectionId))
                            .on_update(ForeignKeyAction::Restrict)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create instructors table, keyed by full name
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::Name)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Instructors::Id)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Instructors::Email).text().unique_key())
                    .to_owned(),
            )
            .await?;

        // Create section_instructors junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(SectionInstructors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SectionInstructors::Term).string_len(4).not_null())
                    .col(
                        ColumnDef::new(SectionInstructors::SectionId)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SectionInstructors::InstructorName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SectionInstructors::InstructorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SectionInstructors::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SectionInstructors::Term)
                            .col(SectionInstructors::SectionId)
                            .col(SectionInstructors::InstructorName),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_instructors-section")
                            .from(
                                SectionInstructors::Table,
                                (SectionInstructors::Term, SectionInstructors::SectionId),
                            )
                            .to(Sections::Table, (Sections::Term, Sections::SectionId))
                            .on_update(ForeignKeyAction::Restrict)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-section_instructors-instructor")
                            .from(SectionInstructors::Table, SectionInstructors::InstructorName)
                            .to(Instructors::Table, Instructors::Name)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(SectionInstructors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SectionDetails::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Departments {
    Table,
    Code,
    Name,
    UpdatedAt,
}

#[derive(Iden)]
enum Courses {
    Table,
    Term,
    CourseId,
    Dept,
    Prefix,
    Number,
    Sequence,
    Suffix,
    Title,
    Description,
    UnitsLow,
    UnitsHigh,
    UnitsMax,
    RestrMajor,
    RestrClass,
    RestrSchool,
    Prereq,
    Coreq,
    UpdatedAt,
}

#[derive(Iden)]
enum Sections {
    Table,
    Term,
    SectionId,
    CourseId,
    Session,
    Dclass,
    Type,
    Cancelled,
    TotSeats,
    TakenSeats,
    Title,
    SecTitle,
    Description,
    Notes,
    UnitsLow,
    UnitsHigh,
    UpdatedAt,
}

#[derive(Iden)]
enum SectionDetails {
    Table,
    Term,
    SectionId,
    Idx,
    Day,
    StartTime,
    EndTime,
    Location,
    UpdatedAt,
}

#[derive(Iden)]
enum Instructors {
    Table,
    Name,
    Id,
    Email,
}

#[derive(Iden)]
enum SectionInstructors {
    Table,
    Term,
    SectionId,
    InstructorName,
    InstructorId,
    UpdatedAt,
}
