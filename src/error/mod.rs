//! Error types.
//!
//! Two classes of error exist. Data that does not conform is reported as
//! [`Problems`], returned as a value from every conform call. Mistakes in the
//! schema definition itself are reported as [`ConfigError`] (and the
//! registry and discriminator errors) when the schema is built.

mod config;
mod problems;

pub use config::{ConfigError, ValidationError};
pub use problems::{Problem, Problems};
