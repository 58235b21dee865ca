pub mod aggregate;
pub mod compliance;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod generate;
pub mod io;
pub mod model;
pub mod normalize;
pub mod paths;
pub mod period;
pub mod priority;
pub mod scan;
pub mod status;
pub mod store;
pub mod types;

pub use error::{QcError, Result};
pub use engine::{Clock, ComplianceEngine, FixedClock, SystemClock};
pub use model::{Assignment, Completion};
pub use period::Period;
pub use types::{Frequency, Priority};
