//! Headerwatch Library
//!
//! Keeps a generated comment header at the top of operator-listed source
//! files and a rendered project tree inside a designated tree file, both
//! refreshed as the project changes on disk.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod config;
pub mod error;
pub mod header;
pub mod observability;
pub mod patterns;
pub mod sync;
pub mod tree;
pub mod watcher;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
