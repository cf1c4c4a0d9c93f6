//! Input validation functions
//!
//! Reusable validators for peer-supplied input. The bot uses them for
//! enforcement at the command boundary; receiving clients can use them
//! for pre-validation.

mod request_name;

pub use request_name::{RequestNameError, validate_request_name};
