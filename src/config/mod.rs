// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod app;
pub mod config;
pub mod logging;
pub mod spotify;

pub use app::*;
pub use config::*;
pub use logging::*;
pub use spotify::*;
