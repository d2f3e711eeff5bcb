pub mod response;
pub mod runner;
pub mod storcli;

pub use response::CommandResponse;
pub use runner::{CommandRunner, StorcliRunner};
pub use storcli::StorcliCollector;
