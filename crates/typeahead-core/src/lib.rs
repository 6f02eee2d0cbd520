//! Typeahead core — debounced autocomplete queries against a remote suggestion service.

pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;

pub use client::{AutocompleteResponse, SuggestionClient, SuggestionSource};
pub use config::AppConfig;
pub use controller::{ControllerOptions, FetchOutcome, SuggestionController};
pub use debounce::Debouncer;
pub use error::{Result, TypeaheadError};
