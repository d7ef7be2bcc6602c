// Library surface for the binary, headless runs and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod form;
pub mod media;
pub mod notice;
pub mod query;
pub mod record;
pub mod runtime;
pub mod store;
pub mod theme;
pub mod transfer;
pub mod ui;
pub mod validate;

pub use app::App;
pub use error::{Error, Result};
pub use record::{AppRecord, Pricing};
