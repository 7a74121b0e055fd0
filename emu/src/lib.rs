pub mod computer;
pub mod error;
pub mod hooks;
pub mod model;

pub use computer::{execute, step, Computer, Config, Execution, Failure, StepState};
pub use error::Error;
