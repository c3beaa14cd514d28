//! pocket-ledger - personal finance tracking from the terminal
//!
//! A transaction ledger with derived budgets, savings goals and alerts, plus
//! standalone loan, mortgage and savings calculators.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, goals, notifications, bills)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer; the ledger and the observers that follow it
//! - `calc`: Pure loan, mortgage and savings calculators
//! - `export`: JSON, CSV and YAML export, JSON import
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `pocket` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_ledger::config::{paths::PocketPaths, settings::Settings};
//! use pocket_ledger::services::Ledger;
//! use pocket_ledger::storage::Storage;
//!
//! let paths = PocketPaths::new()?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let summary = Ledger::new(&storage).summary(chrono::Local::now().date_naive())?;
//! ```

pub mod calc;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{PocketError, PocketResult};
