pub mod attendance;
pub mod batch;
pub mod day;
pub mod enrollment;
pub mod report;
pub mod student;
