pub mod cv;
pub mod filters;
pub mod job;
