//! # Doorway
//!
//! Inventory of access-control hardware (buildings, floors, rooms, doors,
//! devices and their links to external systems) kept in one SQLite file.
//! Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! doorway = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use doorway::config::AppConfig;
//! use doorway::door_form::DoorForm;
//! use doorway::store::bootstrap;
//!
//! let (store, _report) = bootstrap(&AppConfig::default()).unwrap();
//! let mut form = DoorForm::load(&store, 1).unwrap();
//! form.select_room(&store, Some(1)).unwrap();
//! form.save(&store).unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the CLI and terminal UI. Disable with
//!   `default-features = false`.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod door_form;
pub mod error;
pub mod hierarchy;
pub mod store;
#[cfg(feature = "cli")]
pub mod tui;
pub mod types;
