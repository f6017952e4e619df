//! Static course catalogue.

pub mod model;

pub use model::{Course, CourseCard, SAMPLE_COURSES, find_course, sample_courses};
