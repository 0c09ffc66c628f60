//! tj-core: shared foundation for trajflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - model (opaque model identity carried by every run)
//! - error (shared error types)

pub mod error;
pub mod model;
pub mod numeric;

pub use error::{CoreError, CoreResult};
pub use model::ModelRef;
pub use numeric::*;
