//! # Nightfall Library
//!
//! Internal library for the nightfall binary application.
//!
//! This library exists to enable testing of the color engine and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Nightfall` builder sets up logging, config and devices
//! - **Core Logic**: `core` holds the schedule resolver, channel interpolator and
//!   festive animation driver, plus `Core` which runs one invocation
//! - **Backends**: `backend` defines the `LightSink` device trait and the BlinkStick
//!   USB implementation
//! - **Configuration**: `config` for the optional TOML file with validation
//! - **Infrastructure**: time sources, signal handling, logging and utilities

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod backend;
pub mod config;
pub mod core;
pub mod io;
pub mod time;

mod nightfall;

pub use nightfall::Nightfall;
