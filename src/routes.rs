pub mod courses;
pub mod index;
pub mod sse;
pub mod students;
