//! Shape normalization of raw catalog payloads.
//!
//! The catalog API sends a bare value where a list has one element and `{}`
//! where an optional field has no value. Everything here resolves those two
//! ambiguities and validates leaf values with the codecs from `models`, so
//! later stages only ever see sequences and `Option`s.

use crate::error::{CatalogError, ResultExt};
use chrono::NaiveTime;
use models::{
    ShapeError,
    catalog_data::DepartmentRow,
    clock::decode_time,
    codec::{Decoded, count, one_of},
    course_id::CourseId,
    days::{DaySet, decode_days},
    error::FieldError,
    section_data::{
        DClass, SectionKind, decode_course_number, decode_dept_code, decode_flag,
        decode_location, decode_section_id, decode_sequence, decode_session, decode_suffix,
    },
    term::Term,
    units::UnitRange,
};
use serde_json::{Map, Value};
use std::{
    collections::{HashMap, hash_map::Entry},
    str::FromStr,
};

/// Codes the catalog lists but files no courses under
const DENIED_DEPARTMENTS: &[&str] = &["SWKO", "SWKC"];

/// Departments that hold the courses of denied codes but are missing from
/// the listing: (code, name)
const ADDED_DEPARTMENTS: &[(&str, &str)] = &[("SOWK", "Social Work")];

/// Wraps a lone value in a one-element list; lists pass through unchanged
pub fn coerce_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    }
}

/// Maps `null` and the empty-object sentinel to `None`
pub fn coerce_optional(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Object(fields) if fields.is_empty() => None,
        present => Some(present),
    }
}

/// A course record with every field decoded
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCourse {
    /// Department whose listing the record came from
    pub dept: String,
    pub id: CourseId,
    pub prefix: String,
    pub number: String,
    pub sequence: Option<char>,
    pub suffix: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub units: UnitRange,
    pub restr_major: Option<String>,
    pub restr_class: Option<String>,
    pub restr_school: Option<String>,
    pub prereq: Option<String>,
    pub coreq: Option<String>,
    pub sections: Vec<NormalizedSection>,
}

/// A section record with every field decoded. The meeting fields are kept
/// as the parallel lists the catalog sends; the transformer zips them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSection {
    pub id: String,
    pub session: String,
    pub dclass: DClass,
    pub kind: SectionKind,
    pub title: String,
    pub section_title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub units: Option<UnitRange>,
    pub available: u32,
    pub registered: u32,
    pub waitlisted: u32,
    pub cancelled: bool,
    pub days: Vec<Option<DaySet>>,
    pub start_times: Vec<Option<NaiveTime>>,
    pub end_times: Vec<Option<NaiveTime>>,
    pub locations: Vec<Option<String>>,
    pub instructors: Vec<NormalizedInstructor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInstructor {
    pub first_name: String,
    pub last_name: String,
}

/// A JSON object whose fields are looked up by name
#[derive(Clone, Copy)]
struct Record<'a>(&'a Map<String, Value>);

impl<'a> Record<'a> {
    fn new(value: &'a Value, what: &str) -> Result<Self, ShapeError> {
        value.as_object().map(Record).ok_or_else(|| ShapeError::WrongType {
            field: what.to_owned(),
            expected: "an object",
        })
    }

    /// The field's value, or `None` when absent, null or `{}`
    fn field(&self, key: &str) -> Option<&'a Value> {
        self.0.get(key).and_then(coerce_optional)
    }

    /// A required child object
    fn object(&self, key: &str) -> Result<Record<'a>, ShapeError> {
        let value = self
            .field(key)
            .ok_or_else(|| ShapeError::MissingField(key.to_owned()))?;
        Record::new(value, key)
    }

    /// The field as a list of objects; absent and `{}` mean no elements
    fn objects(&self, key: &str) -> Result<Vec<Record<'a>>, ShapeError> {
        self.field(key)
            .map(coerce_list)
            .unwrap_or_default()
            .into_iter()
            .map(|value| Record::new(value, key))
            .collect()
    }

    /// The field as a list whose elements may themselves be `{}`
    fn elements(&self, key: &str) -> Vec<&'a Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => coerce_list(value),
        }
    }

    /// Like [`Record::elements`], but the key itself must be present
    fn required_elements(&self, key: &str) -> Result<Vec<&'a Value>, ShapeError> {
        self.0
            .get(key)
            .map(coerce_list)
            .ok_or_else(|| ShapeError::MissingField(key.to_owned()))
    }

    fn string(&self, key: &str) -> Result<&'a str, ShapeError> {
        self.optional_string(key)?
            .ok_or_else(|| ShapeError::MissingField(key.to_owned()))
    }

    fn optional_string(&self, key: &str) -> Result<Option<&'a str>, ShapeError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ShapeError::WrongType {
                field: key.to_owned(),
                expected: "a string",
            }),
        }
    }

    fn optional_text(&self, key: &str) -> Result<Option<String>, ShapeError> {
        Ok(self.optional_string(key)?.map(str::to_owned))
    }

    fn decode<T>(&self, key: &str, codec: impl Fn(&str) -> Decoded<T>) -> Result<T, CatalogError> {
        let raw = self.string(key)?;
        codec(raw).map_err(|e| e.in_field(key.to_owned()).into())
    }

    fn decode_optional<T>(
        &self,
        key: &str,
        codec: impl Fn(&str) -> Decoded<T>,
    ) -> Result<Option<T>, CatalogError> {
        self.optional_string(key)?
            .map(|raw| codec(raw).map_err(|e| e.in_field(key.to_owned()).into()))
            .transpose()
    }

    /// Decodes each element of a parallel meeting list
    fn decode_elements<T>(
        &self,
        key: &str,
        codec: impl Fn(&str) -> Decoded<Option<T>>,
    ) -> Result<Vec<Option<T>>, CatalogError> {
        self.required_elements(key)?
            .into_iter()
            .map(|element| match coerce_optional(element) {
                None => Ok(None),
                Some(Value::String(raw)) => {
                    codec(raw).map_err(|e| e.in_field(key.to_owned()).into())
                }
                Some(_) => Err(ShapeError::WrongType {
                    field: key.to_owned(),
                    expected: "a string or an empty object",
                }
                .into()),
            })
            .collect()
    }
}

/// Decodes the term listing into the terms it names
pub fn normalize_terms(payload: &Value) -> Result<Vec<Term>, CatalogError> {
    let record = Record::new(payload, "terms")?;

    record
        .elements("term")
        .into_iter()
        .map(|value| match value {
            Value::String(code) => Term::from_str(code).map_err(CatalogError::from),
            _ => Err(ShapeError::WrongType {
                field: "term".to_owned(),
                expected: "a string",
            }
            .into()),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListingKind {
    School,
    Department,
    Combined,
}

/// Flattens the school/department listing into department rows.
///
/// Schools are replaced by their child departments and combined listings
/// under a school are dropped. Denied codes are removed and the added
/// departments appended. A code listed twice keeps its first position and
/// its last name.
pub fn normalize_departments(payload: &Value) -> Result<Vec<DepartmentRow>, CatalogError> {
    const KINDS: &[(&str, ListingKind)] = &[
        ("Y", ListingKind::School),
        ("N", ListingKind::Department),
        ("C", ListingKind::Combined),
    ];
    let kind_of = |entry: &Record| entry.decode("type", one_of("type", "Y, N or C", KINDS));

    let record = Record::new(payload, "departments")?;
    let mut listed = Vec::new();

    for entry in record.objects("department")? {
        if kind_of(&entry)? == ListingKind::School {
            for child in entry.objects("department")? {
                if kind_of(&child)? != ListingKind::Combined {
                    listed.push(department_row(child)?);
                }
            }
        } else {
            listed.push(department_row(entry)?);
        }
    }

    let added = ADDED_DEPARTMENTS.iter().map(|&(code, name)| DepartmentRow {
        code: code.to_owned(),
        name: name.to_owned(),
    });

    let mut positions = HashMap::new();
    let mut rows: Vec<DepartmentRow> = Vec::new();
    for row in listed.into_iter().chain(added) {
        if DENIED_DEPARTMENTS.contains(&row.code.as_str()) {
            continue;
        }
        match positions.entry(row.code.clone()) {
            Entry::Occupied(position) => rows[*position.get()] = row,
            Entry::Vacant(slot) => {
                slot.insert(rows.len());
                rows.push(row);
            }
        }
    }

    Ok(rows)
}

fn department_row(department: Record) -> Result<DepartmentRow, CatalogError> {
    let code = department.decode("code", decode_dept_code)?;
    let name = department.string("name")?;
    if name.chars().count() < 2 {
        return Err(FieldError::new("name", "at least two characters", name).into());
    }

    Ok(DepartmentRow {
        code,
        name: name.to_owned(),
    })
}

/// Decodes one department's course listing, dropping cross-listed records
pub fn normalize_courses(dept: &str, payload: &Value) -> Result<Vec<NormalizedCourse>, CatalogError> {
    let record = Record::new(payload, "courses")?;
    let Some(offered) = record.field("OfferedCourses") else {
        return Ok(Vec::new());
    };

    let mut courses = Vec::new();
    for course in Record::new(offered, "OfferedCourses")?.objects("course")? {
        let id = course.decode("ScheduledCourseID", CourseId::from_str)?;
        course.decode("PublishedCourseID", CourseId::from_str)?;
        if course.decode("IsCrossListed", decode_flag)? {
            continue;
        }

        let normalized = normalize_course(dept, id.clone(), course).context(|| id.to_string())?;
        courses.push(normalized);
    }

    Ok(courses)
}

fn normalize_course(
    dept: &str,
    id: CourseId,
    course: Record,
) -> Result<NormalizedCourse, CatalogError> {
    let data = course.object("CourseData")?;

    let sections = data
        .objects("SectionData")?
        .into_iter()
        .map(normalize_section)
        .collect::<Result<Vec<_>, _>>()?;
    if sections.is_empty() {
        return Err(ShapeError::MissingField("SectionData".to_owned()).into());
    }

    Ok(NormalizedCourse {
        dept: dept.to_owned(),
        id,
        prefix: data.decode("prefix", decode_dept_code)?,
        number: data.decode("number", decode_course_number)?,
        sequence: data.decode_optional("sequence", decode_sequence)?,
        suffix: data.decode_optional("suffix", decode_suffix)?,
        title: data.string("title")?.to_owned(),
        description: data.optional_text("description")?,
        units: data.decode("units", UnitRange::from_str)?,
        restr_major: data.optional_text("restriction_by_major")?,
        restr_class: data.optional_text("restriction_by_class")?,
        restr_school: data.optional_text("restriction_by_school")?,
        prereq: data.optional_text("prereq_text")?,
        coreq: data.optional_text("coreq_text")?,
        sections,
    })
}

fn normalize_section(section: Record) -> Result<NormalizedSection, CatalogError> {
    let id = section.decode("id", decode_section_id)?;
    let in_section = || format!("section {id}");

    let instructors = section
        .objects("instructor")
        .context(in_section)?
        .into_iter()
        .map(|instructor| {
            Ok(NormalizedInstructor {
                first_name: instructor.string("first_name")?.to_owned(),
                last_name: instructor.string("last_name")?.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, ShapeError>>()
        .context(in_section)?;

    let normalized = (|| {
        Ok::<_, CatalogError>(NormalizedSection {
            id: id.clone(),
            session: section.decode("session", decode_session)?,
            dclass: section.decode("dclass_code", DClass::from_str)?,
            kind: section.decode("type", SectionKind::from_str)?,
            title: section.string("title")?.to_owned(),
            section_title: section.optional_text("section_title")?,
            description: section.optional_text("description")?,
            notes: section.optional_text("notes")?,
            units: section.decode_optional("units", UnitRange::parse_range)?,
            available: section.decode("spaces_available", count("spaces_available"))?,
            registered: section.decode("number_registered", count("number_registered"))?,
            waitlisted: section.decode("wait_qty", count("wait_qty"))?,
            cancelled: section.decode("canceled", decode_flag)?,
            days: section.decode_elements("day", decode_days)?,
            start_times: section.decode_elements("start_time", decode_time)?,
            end_times: section.decode_elements("end_time", decode_time)?,
            locations: section
                .decode_elements("location", |raw| decode_location(raw).map(Some))?,
            instructors,
        })
    })();

    normalized.context(in_section)
}
