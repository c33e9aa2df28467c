use crate::entities::{
    courses, departments, instructors, section_details, section_instructors, sections,
};
use chrono::NaiveDateTime;
use log::{error, info, warn};
use models::{
    catalog_data::{CatalogRows, CourseRow, DepartmentRow, DetailRow, InstructorLink, SectionRow},
    instructor::InstructorCache,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbBackend, DbErr, EntityTrait, IdenStatic, IntoActiveModel, Iterable,
    PrimaryKeyToColumn, QueryFilter, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use std::{
    collections::{HashMap, hash_map::Entry},
    fmt::{Display, Formatter, Result as FmtResult},
    hash::Hash,
};
use thiserror::Error;

/// A batch was rejected by the store
#[derive(Debug, Error)]
#[error("failed to upsert {entity} batch {batch}: {source}")]
pub struct UpsertError {
    pub entity: &'static str,
    /// 1-based position of the batch within its entity type
    pub batch: usize,
    #[source]
    pub source: DbErr,
}

/// Outcome of writing one entity type
#[derive(Debug)]
pub struct PhaseReport {
    pub entity: &'static str,
    pub rows: usize,
    pub batches: usize,
    pub committed: usize,
    /// The batch that stopped this entity type, if any
    pub error: Option<UpsertError>,
}

impl PhaseReport {
    fn new(entity: &'static str, rows: usize, batch_size: usize) -> Self {
        Self {
            entity,
            rows,
            batches: rows.div_ceil(batch_size),
            committed: 0,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl Display for PhaseReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}: {}/{} batches committed ({} rows)",
            self.entity, self.committed, self.batches, self.rows
        )
    }
}

/// Outcome of a whole save, one entry per entity type in write order
#[derive(Debug, Default)]
pub struct UpsertReport {
    pub phases: Vec<PhaseReport>,
}

impl UpsertReport {
    pub fn is_success(&self) -> bool {
        self.phases.iter().all(PhaseReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &UpsertError> {
        self.phases.iter().filter_map(|phase| phase.error.as_ref())
    }
}

pub struct SaveCatalogService {
    batch_size: usize,
}

impl Default for SaveCatalogService {
    fn default() -> Self {
        Self::with_batch_size(Self::BATCH_SIZE)
    }
}

impl SaveCatalogService {
    /// The number of rows to save in a single batch
    pub const BATCH_SIZE: usize = 4000;

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Writes every row of a run, entity type by entity type.
    ///
    /// A failed batch stops the remaining batches of its entity type only;
    /// committed batches stay committed. `now` stamps new and changed rows,
    /// and `cache` ends up holding the stored id of every instructor seen.
    pub async fn save_catalog(
        &self,
        db: &DatabaseConnection,
        rows: &CatalogRows,
        cache: &mut InstructorCache,
        now: NaiveDateTime,
    ) -> UpsertReport {
        let department_models = last_per_key(&rows.departments, |d| d.code.clone())
            .into_iter()
            .map(|row| department_model(row, now))
            .collect::<Vec<_>>();
        let course_models = last_per_key(&rows.courses, |c| (c.term.clone(), c.course_id.clone()))
            .into_iter()
            .map(|row| course_model(row, now))
            .collect::<Vec<_>>();
        let section_models =
            last_per_key(&rows.sections, |s| (s.term.clone(), s.section_id.clone()))
                .into_iter()
                .map(|row| section_model(row, now))
                .collect::<Vec<_>>();
        let detail_models = last_per_key(&rows.details, |d| {
            (d.term.clone(), d.section_id.clone(), d.index)
        })
        .into_iter()
        .map(|row| detail_model(row, now))
        .collect::<Vec<_>>();
        let links = last_per_key(&rows.instructor_links, |l| {
            (l.term.clone(), l.section_id.clone(), l.instructor_name.clone())
        });

        let mut report = UpsertReport::default();

        report.phases.push(
            self.upsert_phase(
                db,
                "departments",
                department_models,
                change_aware_upsert::<departments::Entity>(departments::Column::UpdatedAt),
            )
            .await,
        );
        report.phases.push(
            self.upsert_phase(
                db,
                "courses",
                course_models,
                change_aware_upsert::<courses::Entity>(courses::Column::UpdatedAt),
            )
            .await,
        );
        report.phases.push(
            self.upsert_phase(
                db,
                "sections",
                section_models,
                change_aware_upsert::<sections::Entity>(sections::Column::UpdatedAt),
            )
            .await,
        );
        report.phases.push(
            self.upsert_phase(
                db,
                "section details",
                detail_models,
                overwrite_upsert::<section_details::Entity>(),
            )
            .await,
        );
        report
            .phases
            .push(self.save_instructors(db, &links, cache, now).await);

        for phase in &report.phases {
            info!("{phase}");
        }

        report
    }

    /// Upserts one entity type batch by batch, stopping at the first failure
    async fn upsert_phase<A>(
        &self,
        db: &DatabaseConnection,
        entity: &'static str,
        models: Vec<A>,
        on_conflict: OnConflict,
    ) -> PhaseReport
    where
        A: ActiveModelTrait,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let mut report = PhaseReport::new(entity, models.len(), self.batch_size);
        info!(
            "Upserting {} {entity} in {} batches of up to {}",
            report.rows, report.batches, self.batch_size
        );

        for (batch_idx, batch) in models.chunks(self.batch_size).enumerate() {
            match Self::upsert_batch(db, batch, &on_conflict).await {
                Ok(()) => {
                    report.committed += 1;
                    info!(
                        "Committed {entity} batch {}/{}",
                        batch_idx + 1,
                        report.batches
                    );
                }
                Err(source) => {
                    report.error = Some(Self::fail(&report, batch_idx, source));
                    break;
                }
            }
        }

        report
    }

    async fn upsert_batch<A>(
        db: &DatabaseConnection,
        batch: &[A],
        on_conflict: &OnConflict,
    ) -> Result<(), DbErr>
    where
        A: ActiveModelTrait,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        let txn = db.begin().await?;
        let per_statement = rows_per_statement::<A::Entity>(db.get_database_backend());

        for rows in batch.chunks(per_statement) {
            A::Entity::insert_many(rows.iter().cloned())
                .on_conflict(on_conflict.clone())
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await
    }

    /// Writes instructors and their section links.
    ///
    /// Each batch runs in one transaction: instructors are inserted keeping
    /// any id already stored for the name, the authoritative name to id
    /// mapping is read back, and the links are written with those ids.
    async fn save_instructors(
        &self,
        db: &DatabaseConnection,
        links: &[&InstructorLink],
        cache: &mut InstructorCache,
        now: NaiveDateTime,
    ) -> PhaseReport {
        let mut report = PhaseReport::new("instructors", links.len(), self.batch_size);
        info!(
            "Upserting {} instructor links in {} batches of up to {}",
            report.rows, report.batches, self.batch_size
        );

        for (batch_idx, batch) in links.chunks(self.batch_size).enumerate() {
            match Self::save_instructor_batch(db, batch, cache, now).await {
                Ok(stored) => {
                    report.committed += 1;
                    info!(
                        "Committed instructor batch {}/{}: {} instructors",
                        batch_idx + 1,
                        report.batches,
                        stored
                    );
                }
                Err(source) => {
                    report.error = Some(Self::fail(&report, batch_idx, source));
                    break;
                }
            }
        }

        report
    }

    async fn save_instructor_batch(
        db: &DatabaseConnection,
        links: &[&InstructorLink],
        cache: &mut InstructorCache,
        now: NaiveDateTime,
    ) -> Result<usize, DbErr> {
        let backend = db.get_database_backend();
        let txn = db.begin().await?;

        // Candidates, preferring ids already adopted from the store
        let mut candidates: HashMap<&str, &str> = HashMap::new();
        for link in links {
            let name = link.instructor_name.as_str();
            let id = cache.get(name).unwrap_or(link.instructor_id.as_str());
            candidates.entry(name).or_insert(id);
        }

        let new_instructors = candidates
            .iter()
            .map(|(&name, &id)| instructors::ActiveModel {
                name: Set(name.to_owned()),
                id: Set(id.to_owned()),
                email: Set(None),
            })
            .collect::<Vec<_>>();

        for rows in new_instructors.chunks(rows_per_statement::<instructors::Entity>(backend)) {
            instructors::Entity::insert_many(rows.iter().cloned())
                .on_conflict(
                    OnConflict::column(instructors::Column::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        let stored: HashMap<String, String> = instructors::Entity::find()
            .filter(instructors::Column::Name.is_in(candidates.keys().copied()))
            .all(&txn)
            .await?
            .into_iter()
            .map(|instructor| (instructor.name, instructor.id))
            .collect();

        let section_links = links
            .iter()
            .map(|link| {
                let id = stored.get(&link.instructor_name).ok_or_else(|| {
                    DbErr::RecordNotFound(format!("instructor {}", link.instructor_name))
                })?;

                Ok(section_instructors::ActiveModel {
                    term: Set(link.term.clone()),
                    section_id: Set(link.section_id.clone()),
                    instructor_name: Set(link.instructor_name.clone()),
                    instructor_id: Set(id.clone()),
                    updated_at: Set(now),
                })
            })
            .collect::<Result<Vec<_>, DbErr>>()?;

        let refresh_link = OnConflict::columns(key_columns::<section_instructors::Entity>())
            .update_columns([
                section_instructors::Column::InstructorId,
                section_instructors::Column::UpdatedAt,
            ])
            .to_owned();

        for rows in section_links.chunks(rows_per_statement::<section_instructors::Entity>(backend)) {
            section_instructors::Entity::insert_many(rows.iter().cloned())
                .on_conflict(refresh_link.clone())
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;

        let count = stored.len();
        cache.adopt(stored);
        Ok(count)
    }

    fn fail(report: &PhaseReport, batch_idx: usize, source: DbErr) -> UpsertError {
        let err = UpsertError {
            entity: report.entity,
            batch: batch_idx + 1,
            source,
        };
        error!("{err}");

        let skipped = report.batches - batch_idx - 1;
        if skipped > 0 {
            warn!("Skipping {skipped} remaining {} batches", report.entity);
        }

        err
    }
}

/// Keeps one row per key: the last one, at the position of the first
fn last_per_key<T, K, F>(rows: &[T], key: F) -> Vec<&T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions = HashMap::new();
    let mut kept: Vec<&T> = Vec::with_capacity(rows.len());

    for row in rows {
        match positions.entry(key(row)) {
            Entry::Occupied(slot) => kept[*slot.get()] = row,
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(row);
            }
        }
    }

    kept
}

/// Bind parameters available to a single statement
fn max_parameters(backend: DbBackend) -> usize {
    match backend {
        DbBackend::Sqlite => 32_766,
        _ => 65_535,
    }
}

/// How many rows of `E` fit into one multi-row insert
fn rows_per_statement<E: EntityTrait>(backend: DbBackend) -> usize {
    let columns = E::Column::iter().count().max(1);
    (max_parameters(backend) / columns).max(1)
}

fn key_columns<E: EntityTrait>() -> Vec<E::Column> {
    E::PrimaryKey::iter().map(|key| key.into_column()).collect()
}

/// Non-key columns of `E`, minus any listed in `except`
fn value_columns<E: EntityTrait>(except: &[E::Column]) -> Vec<E::Column> {
    let keys = key_columns::<E>();
    E::Column::iter()
        .filter(|column| {
            !keys
                .iter()
                .chain(except)
                .any(|other| other.as_str() == column.as_str())
        })
        .collect()
}

/// Conflict clause that overwrites every non-key column
fn overwrite_upsert<E: EntityTrait>() -> OnConflict {
    OnConflict::columns(key_columns::<E>())
        .update_columns(value_columns::<E>(&[]))
        .to_owned()
}

/// Conflict clause that overwrites every tracked column but only moves
/// `stamp` forward when at least one of them differs from the stored row
fn change_aware_upsert<E: EntityTrait>(stamp: E::Column) -> OnConflict {
    let table = E::default().table_name().to_owned();
    let tracked = value_columns::<E>(&[stamp]);

    let changed = tracked
        .iter()
        .map(|column| {
            format!(
                r#""{table}"."{name}" IS DISTINCT FROM excluded."{name}""#,
                name = column.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join(" OR ");
    let stamp_name = stamp.as_str();
    let stamp_value = Expr::cust(format!(
        r#"CASE WHEN {changed} THEN excluded."{stamp_name}" ELSE "{table}"."{stamp_name}" END"#
    ));

    OnConflict::columns(key_columns::<E>())
        .update_columns(tracked)
        .value(stamp, stamp_value)
        .to_owned()
}

/// Seat counts and positions are small; saturate rather than wrap
fn small_int(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn department_model(row: &DepartmentRow, now: NaiveDateTime) -> departments::ActiveModel {
    departments::ActiveModel {
        code: Set(row.code.clone()),
        name: Set(row.name.clone()),
        updated_at: Set(now),
    }
}

fn course_model(row: &CourseRow, now: NaiveDateTime) -> courses::ActiveModel {
    courses::ActiveModel {
        term: Set(row.term.clone()),
        course_id: Set(row.course_id.clone()),
        dept: Set(row.dept.clone()),
        prefix: Set(row.prefix.clone()),
        number: Set(row.number.clone()),
        sequence: Set(row.sequence.clone()),
        suffix: Set(row.suffix.clone()),
        title: Set(row.title.clone()),
        description: Set(row.description.clone()),
        units_low: Set(row.units_low),
        units_high: Set(row.units_high),
        units_max: Set(row.units_max),
        restr_major: Set(row.restr_major.clone()),
        restr_class: Set(row.restr_class.clone()),
        restr_school: Set(row.restr_school.clone()),
        prereq: Set(row.prereq.clone()),
        coreq: Set(row.coreq.clone()),
        updated_at: Set(now),
    }
}

fn section_model(row: &SectionRow, now: NaiveDateTime) -> sections::ActiveModel {
    sections::ActiveModel {
        term: Set(row.term.clone()),
        section_id: Set(row.section_id.clone()),
        course_id: Set(row.course_id.clone()),
        session: Set(row.session.clone()),
        dclass: Set(row.dclass.as_str().to_owned()),
        kind: Set(row.kind.as_str().to_owned()),
        cancelled: Set(row.cancelled),
        tot_seats: Set(small_int(row.tot_seats)),
        taken_seats: Set(small_int(row.taken_seats)),
        title: Set(row.title.clone()),
        sec_title: Set(row.sec_title.clone()),
        description: Set(row.description.clone()),
        notes: Set(row.notes.clone()),
        units_low: Set(row.units_low),
        units_high: Set(row.units_high),
        updated_at: Set(now),
    }
}

fn detail_model(row: &DetailRow, now: NaiveDateTime) -> section_details::ActiveModel {
    section_details::ActiveModel {
        term: Set(row.term.clone()),
        section_id: Set(row.section_id.clone()),
        idx: Set(small_int(row.index)),
        day: Set(row.day.map(|day| i16::from(day.bits()))),
        start_time: Set(row.start_time),
        end_time: Set(row.end_time),
        location: Set(row.location.clone()),
        updated_at: Set(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use models::{
        days::DaySet,
        section_data::{DClass, SectionKind},
    };
    use sea_orm::{Database, PaginatorTrait, QueryTrait, Schema};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);

        let tables = [
            schema.create_table_from_entity(departments::Entity),
            schema.create_table_from_entity(courses::Entity),
            schema.create_table_from_entity(sections::Entity),
            schema.create_table_from_entity(section_details::Entity),
            schema.create_table_from_entity(instructors::Entity),
            schema.create_table_from_entity(section_instructors::Entity),
        ];
        for table in &tables {
            db.execute(backend.build(table)).await.unwrap();
        }

        db
    }

    fn course(course_id: &str, title: &str) -> CourseRow {
        CourseRow {
            term: "SP24".to_owned(),
            course_id: course_id.to_owned(),
            dept: "CSCI".to_owned(),
            prefix: "CSCI".to_owned(),
            number: course_id[5..8].to_owned(),
            sequence: None,
            suffix: None,
            title: title.to_owned(),
            description: Some("Basic programming.".to_owned()),
            units_low: Some(4.0),
            units_high: None,
            units_max: None,
            restr_major: None,
            restr_class: None,
            restr_school: None,
            prereq: None,
            coreq: Some("CSCI-102".to_owned()),
        }
    }

    fn section(section_id: &str, course_id: &str) -> SectionRow {
        SectionRow {
            term: "SP24".to_owned(),
            section_id: section_id.to_owned(),
            course_id: course_id.to_owned(),
            session: "001".to_owned(),
            dclass: DClass::Regular,
            kind: SectionKind::Lecture,
            cancelled: false,
            tot_seats: 50,
            taken_seats: 38,
            title: "Introduction to Programming".to_owned(),
            sec_title: None,
            description: None,
            notes: None,
            units_low: Some(4.0),
            units_high: None,
        }
    }

    fn detail(section_id: &str) -> DetailRow {
        DetailRow {
            term: "SP24".to_owned(),
            section_id: section_id.to_owned(),
            index: 0,
            day: Some(DaySet::MONDAY | DaySet::WEDNESDAY),
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
            end_time: NaiveTime::from_hms_opt(11, 50, 0),
            location: Some("SGM101".to_owned()),
        }
    }

    fn link(section_id: &str, name: &str, candidate: &str) -> InstructorLink {
        InstructorLink {
            term: "SP24".to_owned(),
            section_id: section_id.to_owned(),
            instructor_id: candidate.to_owned(),
            instructor_name: name.to_owned(),
        }
    }

    fn catalog(candidate: &str) -> CatalogRows {
        CatalogRows {
            departments: vec![DepartmentRow {
                code: "CSCI".to_owned(),
                name: "Computer Science".to_owned(),
            }],
            courses: vec![
                course("CSCI-103", "Introduction to Programming"),
                course("CSCI-104", "Data Structures"),
            ],
            sections: vec![section("30100", "CSCI-103"), section("30200", "CSCI-104")],
            details: vec![detail("30100"), detail("30200")],
            instructor_links: vec![
                link("30100", "Jane Doe", candidate),
                link("30200", "Jane Doe", candidate),
                link("30200", "John Roe", "candidate-roe"),
            ],
        }
    }

    async fn course_stamp(db: &DatabaseConnection, course_id: &str) -> NaiveDateTime {
        courses::Entity::find_by_id(("SP24".to_owned(), course_id.to_owned()))
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .updated_at
    }

    #[tokio::test]
    async fn test_rows_are_written() {
        let db = setup().await;
        let mut cache = InstructorCache::new();

        let report = SaveCatalogService::default()
            .save_catalog(&db, &catalog("candidate-doe"), &mut cache, at(12))
            .await;
        assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());
        assert_eq!(report.phases.len(), 5);

        assert_eq!(courses::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(instructors::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(section_instructors::Entity::find().count(&db).await.unwrap(), 3);

        let stored = sections::Entity::find_by_id(("SP24".to_owned(), "30100".to_owned()))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.kind, "lec");
        assert_eq!(stored.dclass, "r");
        assert_eq!(stored.tot_seats, 50);

        let meeting = section_details::Entity::find().one(&db).await.unwrap().unwrap();
        assert_eq!(meeting.day, Some(5));
        assert_eq!(meeting.start_time, NaiveTime::from_hms_opt(10, 0, 0));
    }

    #[tokio::test]
    async fn test_rerun_keeps_timestamps() {
        let db = setup().await;
        let service = SaveCatalogService::default();
        let rows = catalog("candidate-doe");

        let first = service
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(12))
            .await;
        assert!(first.is_success());
        let second = service
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(13))
            .await;
        assert!(second.is_success());

        for department in departments::Entity::find().all(&db).await.unwrap() {
            assert_eq!(department.updated_at, at(12));
        }
        for course in courses::Entity::find().all(&db).await.unwrap() {
            assert_eq!(course.updated_at, at(12));
        }
        for section in sections::Entity::find().all(&db).await.unwrap() {
            assert_eq!(section.updated_at, at(12));
        }

        // Meeting details and links are refreshed unconditionally
        for meeting in section_details::Entity::find().all(&db).await.unwrap() {
            assert_eq!(meeting.updated_at, at(13));
        }
        for link in section_instructors::Entity::find().all(&db).await.unwrap() {
            assert_eq!(link.updated_at, at(13));
        }
    }

    #[tokio::test]
    async fn test_changed_title_moves_only_that_course() {
        let db = setup().await;
        let service = SaveCatalogService::default();
        let mut rows = catalog("candidate-doe");

        service
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(12))
            .await;

        rows.courses[0].title = "Programming Fundamentals".to_owned();
        let report = service
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(13))
            .await;
        assert!(report.is_success());

        assert_eq!(course_stamp(&db, "CSCI-103").await, at(13));
        assert_eq!(course_stamp(&db, "CSCI-104").await, at(12));

        let renamed = courses::Entity::find_by_id(("SP24".to_owned(), "CSCI-103".to_owned()))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "Programming Fundamentals");
    }

    #[tokio::test]
    async fn test_null_to_value_counts_as_change() {
        let db = setup().await;
        let service = SaveCatalogService::default();
        let mut rows = catalog("candidate-doe");

        service
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(12))
            .await;

        rows.courses[1].prereq = Some("CSCI-103".to_owned());
        service
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(13))
            .await;

        assert_eq!(course_stamp(&db, "CSCI-103").await, at(12));
        assert_eq!(course_stamp(&db, "CSCI-104").await, at(13));
    }

    #[tokio::test]
    async fn test_stored_instructor_id_wins() {
        let db = setup().await;
        let service = SaveCatalogService::default();

        let mut first_cache = InstructorCache::new();
        service
            .save_catalog(&db, &catalog("candidate-one"), &mut first_cache, at(12))
            .await;
        assert_eq!(first_cache.get("Jane Doe"), Some("candidate-one"));

        let mut second_cache = InstructorCache::new();
        let report = service
            .save_catalog(&db, &catalog("candidate-two"), &mut second_cache, at(13))
            .await;
        assert!(report.is_success());
        assert_eq!(second_cache.get("Jane Doe"), Some("candidate-one"));

        let jane = instructors::Entity::find_by_id("Jane Doe".to_owned())
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(jane.id, "candidate-one");
        assert_eq!(jane.email, None);

        let links = section_instructors::Entity::find()
            .filter(section_instructors::Column::InstructorName.eq("Jane Doe"))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.instructor_id == "candidate-one"));
    }

    #[tokio::test]
    async fn test_failed_batch_stops_its_entity_only() {
        let db = setup().await;
        let mut rows = catalog("candidate-doe");
        rows.sections = vec![
            section("30100", "CSCI-103"),
            section("30200", "CSCI-999"),
            section("30300", "CSCI-104"),
        ];
        rows.details.clear();
        rows.instructor_links = vec![link("30100", "Jane Doe", "candidate-doe")];

        let report = SaveCatalogService::with_batch_size(1)
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(12))
            .await;
        assert!(!report.is_success());

        let sections_phase = &report.phases[2];
        assert_eq!(sections_phase.entity, "sections");
        assert_eq!(sections_phase.batches, 3);
        assert_eq!(sections_phase.committed, 1);
        assert_eq!(sections_phase.error.as_ref().map(|e| e.batch), Some(2));

        // Already committed batches stay, later ones never ran
        assert_eq!(sections::Entity::find().count(&db).await.unwrap(), 1);

        // Other entity types carry on
        assert!(report.phases[1].is_success());
        assert!(report.phases[4].is_success());
        assert_eq!(report.failures().count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_keys_collapse_to_last() {
        let db = setup().await;
        let mut rows = catalog("candidate-doe");
        rows.courses.push(course("CSCI-103", "Introduction to C++"));

        let report = SaveCatalogService::default()
            .save_catalog(&db, &rows, &mut InstructorCache::new(), at(12))
            .await;
        assert!(report.is_success());
        assert_eq!(report.phases[1].rows, 2);

        let stored = courses::Entity::find_by_id(("SP24".to_owned(), "CSCI-103".to_owned()))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Introduction to C++");
    }

    #[test]
    fn test_change_aware_clause() {
        let model = course_model(&course("CSCI-103", "Introduction to Programming"), at(12));
        let sql = courses::Entity::insert(model)
            .on_conflict(change_aware_upsert::<courses::Entity>(
                courses::Column::UpdatedAt,
            ))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""courses"."title" IS DISTINCT FROM excluded."title""#));
        assert!(sql.contains(r#"THEN excluded."updated_at" ELSE "courses"."updated_at" END"#));
        assert!(!sql.contains(r#""courses"."term" IS DISTINCT FROM"#));
        assert!(!sql.contains(r#""courses"."updated_at" IS DISTINCT FROM"#));
    }

    #[test]
    fn test_last_per_key() {
        let rows = [("a", 1), ("b", 2), ("a", 3)];
        let kept = last_per_key(&rows, |row| row.0);
        assert_eq!(kept, [&("a", 3), &("b", 2)]);
    }

    #[test]
    fn test_rows_per_statement_respects_parameter_limit() {
        let columns = courses::Column::iter().count();
        let rows = rows_per_statement::<courses::Entity>(DbBackend::Postgres);
        assert!(rows * columns <= 65_535);
        assert!(rows < SaveCatalogService::BATCH_SIZE);
    }
}
