pub mod catalog_data;
pub mod clock;
pub mod codec;
pub mod course_id;
pub mod days;
pub mod error;
pub mod instructor;
pub mod section_data;
pub mod term;
pub mod units;

pub use error::{FieldError, ShapeError};
