//! # Module: TUI Dashboard
//!
//! ## Responsibility
//! Terminal rendition of the school dashboard using Ratatui: clock, weather,
//! next and current lesson with live countdowns, today's lessons, exams,
//! ISY messages, the AI chat and an event log, plus the weekly overlay.
//!
//! ## Guarantees
//! - No panics in any rendering or update path
//! - Clean terminal restore on exit, including on panic
//! - Graceful resize handling down to the minimum size
//! - 10fps input polling with a 1hz clock tick
//!
//! ## NOT Responsible For
//! - Deciding when to fetch (see `coordinator`)
//! - HTTP transport (see `api`)

pub mod app;
pub mod events;
pub mod ui;
pub mod widgets;
