//! Core data types shared by the planner modules

pub mod plan;

pub use plan::{parse_calendar_day, MediaFile, Myelin, Photo, Place, PlaceName, Plan, User};
