//! YAML detection schema types with serde deserialization.
//!
//! Two layers:
//! - `DetectionSpec` and friends: the authored document as written, every
//!   section optional, deserialized straight from YAML
//! - `Detection`: the validated, typed form produced by
//!   [`crate::validation::validate_detection`]; the normalizer only ever
//!   sees this one

mod detection;
mod domain;
mod fragment;
mod scalar;

pub use detection::*;
pub use domain::*;
pub use fragment::*;
pub use scalar::{opt_scalar, TextLines};

#[cfg(test)]
mod tests;
