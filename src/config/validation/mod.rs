//! Configuration validation
//!
//! - `trait_def`: core Validate trait definition
//! - `base_url`: base URL checks
//! - `config_validators`: endpoint and upload settings validators
//! - `tests`: test suite for all validators

mod base_url;
mod config_validators;
mod trait_def;

pub use base_url::validate_base_url;
pub use trait_def::Validate;
