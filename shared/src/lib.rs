pub mod clock;
pub mod config;
pub mod instance;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use instance::SingleInstance;
pub use models::*;
