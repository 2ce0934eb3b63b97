pub mod launcher;
pub mod timer;
