pub mod normalize;
pub mod transform;

use crate::error::{CatalogError, ResultExt};
use log::info;
use models::{
    catalog_data::{CatalogRows, DepartmentRow},
    instructor::InstructorCache,
    term::Term,
};
use serde_json::Value;

/// A department together with its raw course listing
#[derive(Debug, Clone)]
pub struct DepartmentListing {
    pub department: DepartmentRow,
    pub payload: Value,
}

/// Normalizes and transforms a term's worth of fetched listings.
///
/// Any malformed or misshapen record fails the whole run.
pub fn build_rows(
    term: &Term,
    listings: &[DepartmentListing],
    cache: &mut InstructorCache,
) -> Result<CatalogRows, CatalogError> {
    let mut rows = CatalogRows {
        departments: listings.iter().map(|l| l.department.clone()).collect(),
        ..Default::default()
    };

    for listing in listings {
        let code = &listing.department.code;
        let courses = normalize::normalize_courses(code, &listing.payload)
            .context(|| format!("department {code}"))?;

        for course in &courses {
            let bundle = transform::transform_course(term, course, cache)
                .context(|| format!("department {code}, course {}", course.id))?;
            rows.push(bundle);
        }
    }

    info!(
        "Built {} courses, {} sections, {} meeting details and {} instructor links for {}",
        rows.courses.len(),
        rows.sections.len(),
        rows.details.len(),
        rows.instructor_links.len(),
        term
    );

    Ok(rows)
}
