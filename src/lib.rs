pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TrackerConfig;
pub use core::{
    calendar::MonthCursor,
    clinic_feed::{ClinicFeed, ClinicLoader, FeedOutcome},
    clinic_filter::filter_clinics,
    cycle_log::CycleLog,
    session::AppSession,
};
pub use utils::error::{FetchError, Result, TrackerError};
