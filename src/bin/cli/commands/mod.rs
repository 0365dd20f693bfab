pub mod profile;
pub mod review;
pub mod stats;
pub mod students;
pub mod words;
pub mod wordsets;
