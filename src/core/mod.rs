pub mod calendar;
pub mod clinic_feed;
pub mod clinic_filter;
pub mod cycle_log;
pub mod lifetime;
pub mod navigation;
pub mod qa;
pub mod session;
pub mod settings;

pub use crate::domain::model::{ClinicRecord, LatLon, MoodTag, PlacesResponse};
pub use crate::domain::ports::{ChatProvider, PlacesProvider, PlacesQuery};
pub use crate::utils::error::Result;
