mod detect;
mod orchestrator;
mod set;

pub use detect::*;
pub use orchestrator::*;
pub use set::*;
