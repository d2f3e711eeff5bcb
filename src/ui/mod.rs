pub mod debug;
pub mod report;

pub use report::ReportRenderer;
