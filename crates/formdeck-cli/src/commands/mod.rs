pub mod fields;
pub mod forms;
pub mod misc;
pub mod preview;
pub mod saved;
