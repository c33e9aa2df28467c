pub mod api;
pub mod catalog;
pub mod error;
pub mod util;
