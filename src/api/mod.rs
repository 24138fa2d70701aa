//! # Module: Backend API
//!
//! ## Responsibility
//! Typed access to the dashboard backend: timetable, weekly schedule, weather,
//! AI chat, language packs and the ISY message board.
//!
//! ## NOT Responsible For
//! - Deciding when to fetch (that belongs to `coordinator`)
//! - Rendering results (that belongs to `tui`)

pub mod client;
pub mod types;

pub use client::{ApiClient, TimetableSource};
