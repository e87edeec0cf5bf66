pub mod core;
pub mod events;
pub mod grading;
pub mod predict;
pub mod semesters;
pub mod settings;
pub mod study;
pub mod transcript;
