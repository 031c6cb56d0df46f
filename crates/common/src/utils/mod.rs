pub mod launcher;
pub mod logging;
