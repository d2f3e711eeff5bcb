pub mod check;
pub mod collectors;
pub mod config;
pub mod domain;
pub mod error;
pub mod ui;

pub use check::{run, ControllerReport, Outcome};
pub use config::{Config, Thresholds};
pub use error::CheckError;
