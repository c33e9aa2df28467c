pub mod course;
pub mod department;
pub mod instructor;
pub mod section;
pub mod section_detail;
pub mod section_instructor;

pub use course as courses;
pub use department as departments;
pub use instructor as instructors;
pub use section as sections;
pub use section_detail as section_details;
pub use section_instructor as section_instructors;
