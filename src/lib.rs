pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod ui;

pub use error::{AppError, Result};
pub use store::{AttendanceStore, RosterRow};
