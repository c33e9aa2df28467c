use crate::{
    days::DaySet,
    section_data::{DClass, SectionKind},
};
use chrono::NaiveTime;
use serde::Serialize;

/// A department as listed by the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentRow {
    pub code: String,
    pub name: String,
}

/// One course offered in a term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRow {
    /// Display form of the term, e.g. "SP24"
    pub term: String,
    /// Canonical course id, e.g. "CSCI-103L"
    pub course_id: String,
    /// Department whose listing carries the course
    pub dept: String,
    pub prefix: String,
    pub number: String,
    pub sequence: Option<String>,
    pub suffix: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub units_low: Option<f32>,
    pub units_high: Option<f32>,
    /// Only set when a separate total exceeds the low/high range
    pub units_max: Option<f32>,
    pub restr_major: Option<String>,
    pub restr_class: Option<String>,
    pub restr_school: Option<String>,
    pub prereq: Option<String>,
    pub coreq: Option<String>,
}

/// One scheduled section of a course
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRow {
    pub term: String,
    pub section_id: String,
    pub course_id: String,
    pub session: String,
    pub dclass: DClass,
    pub kind: SectionKind,
    pub cancelled: bool,
    /// Capacity, reconstructed as available + registered
    pub tot_seats: u32,
    pub taken_seats: u32,
    pub title: String,
    pub sec_title: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub units_low: Option<f32>,
    pub units_high: Option<f32>,
}

/// One meeting pattern of a section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub term: String,
    pub section_id: String,
    /// Position of the pattern in the section's meeting arrays
    pub index: u32,
    pub day: Option<DaySet>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
}

/// An instructor teaching a section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorLink {
    pub term: String,
    pub section_id: String,
    /// Candidate id; the store's id wins if the name is already known
    pub instructor_id: String,
    pub instructor_name: String,
}

/// Everything produced from a single course record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseBundle {
    pub course: CourseRow,
    pub sections: Vec<SectionRow>,
    pub details: Vec<DetailRow>,
    pub instructor_links: Vec<InstructorLink>,
}

/// All rows produced by one ingestion run, grouped by target table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogRows {
    pub departments: Vec<DepartmentRow>,
    pub courses: Vec<CourseRow>,
    pub sections: Vec<SectionRow>,
    pub details: Vec<DetailRow>,
    pub instructor_links: Vec<InstructorLink>,
}

impl CatalogRows {
    pub fn push(&mut self, bundle: CourseBundle) {
        self.courses.push(bundle.course);
        self.sections.extend(bundle.sections);
        self.details.extend(bundle.details);
        self.instructor_links.extend(bundle.instructor_links);
    }
}

impl FromIterator<CourseBundle> for CatalogRows {
    fn from_iter<I: IntoIterator<Item = CourseBundle>>(iter: I) -> Self {
        let mut rows = Self::default();
        for bundle in iter {
            rows.push(bundle);
        }
        rows
    }
}
