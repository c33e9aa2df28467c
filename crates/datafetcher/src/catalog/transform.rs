use super::normalize::{NormalizedCourse, NormalizedSection};
use models::{
    ShapeError,
    catalog_data::{CourseBundle, CourseRow, DetailRow, InstructorLink, SectionRow},
    instructor::InstructorCache,
    term::Term,
};
use std::collections::HashSet;

/// Fans one normalized course out into its relational rows.
///
/// Instructor names that are new to this run get a candidate id from `cache`,
/// so every section naming the same instructor shares one id.
pub fn transform_course(
    term: &Term,
    course: &NormalizedCourse,
    cache: &mut InstructorCache,
) -> Result<CourseBundle, ShapeError> {
    let term = term.to_string();
    let course_row = course_row(&term, course);

    let mut sections = Vec::with_capacity(course.sections.len());
    let mut details = Vec::new();
    let mut instructor_links = Vec::new();

    for section in &course.sections {
        sections.push(section_row(&term, &course_row.course_id, section)?);
        details.extend(detail_rows(&term, section)?);
        instructor_links.extend(instructor_links_for(&term, section, cache));
    }

    Ok(CourseBundle {
        course: course_row,
        sections,
        details,
        instructor_links,
    })
}

fn course_row(term: &str, course: &NormalizedCourse) -> CourseRow {
    CourseRow {
        term: term.to_owned(),
        course_id: course.id.to_string(),
        dept: course.dept.clone(),
        prefix: course.prefix.clone(),
        number: course.number.clone(),
        sequence: course.sequence.map(String::from),
        suffix: course.suffix.clone(),
        title: course.title.clone(),
        description: course.description.clone(),
        units_low: Some(course.units.min),
        units_high: course.units.max,
        units_max: course.units.total,
        restr_major: course.restr_major.clone(),
        restr_class: course.restr_class.clone(),
        restr_school: course.restr_school.clone(),
        prereq: course.prereq.clone(),
        coreq: course.coreq.clone(),
    }
}

fn section_row(
    term: &str,
    course_id: &str,
    section: &NormalizedSection,
) -> Result<SectionRow, ShapeError> {
    // The catalog only reports remaining and taken seats
    let seat_error = || ShapeError::SeatCount {
        section: section.id.clone(),
        taken: section.registered,
        total: section.available.saturating_add(section.registered),
    };
    let tot_seats = section
        .available
        .checked_add(section.registered)
        .ok_or_else(seat_error)?;
    if section.registered > tot_seats {
        return Err(seat_error());
    }

    Ok(SectionRow {
        term: term.to_owned(),
        section_id: section.id.clone(),
        course_id: course_id.to_owned(),
        session: section.session.clone(),
        dclass: section.dclass,
        kind: section.kind,
        cancelled: section.cancelled,
        tot_seats,
        taken_seats: section.registered,
        title: section.title.clone(),
        sec_title: section.section_title.clone(),
        description: section.description.clone(),
        notes: section.notes.clone(),
        units_low: section.units.map(|u| u.min),
        units_high: section.units.and_then(|u| u.max),
    })
}

/// Zips the section's parallel meeting lists position by position.
///
/// Positions where every field is empty describe no meeting and are skipped,
/// so an unscheduled section yields no rows.
fn detail_rows(term: &str, section: &NormalizedSection) -> Result<Vec<DetailRow>, ShapeError> {
    let len = section.days.len();
    if [
        section.start_times.len(),
        section.end_times.len(),
        section.locations.len(),
    ]
    .iter()
    .any(|&other| other != len)
    {
        return Err(ShapeError::MismatchedMeetings {
            section: section.id.clone(),
            days: section.days.len(),
            starts: section.start_times.len(),
            ends: section.end_times.len(),
            locations: section.locations.len(),
        });
    }

    let rows = section
        .days
        .iter()
        .zip(&section.start_times)
        .zip(&section.end_times)
        .zip(&section.locations)
        .enumerate()
        .filter(|(_, (((day, start), end), location))| {
            day.is_some() || start.is_some() || end.is_some() || location.is_some()
        })
        .map(|(index, (((day, start), end), location))| DetailRow {
            term: term.to_owned(),
            section_id: section.id.clone(),
            index: index as u32,
            day: *day,
            start_time: *start,
            end_time: *end,
            location: location.clone(),
        })
        .collect();

    Ok(rows)
}

fn instructor_links_for(
    term: &str,
    section: &NormalizedSection,
    cache: &mut InstructorCache,
) -> Vec<InstructorLink> {
    let mut seen = HashSet::new();

    section
        .instructors
        .iter()
        .map(|i| InstructorCache::full_name(&i.first_name, &i.last_name))
        // A section lists each instructor once
        .filter(|name| seen.insert(name.clone()))
        .map(|name| InstructorLink {
            term: term.to_owned(),
            section_id: section.id.clone(),
            instructor_id: cache.candidate_id(&name),
            instructor_name: name,
        })
        .collect()
}
