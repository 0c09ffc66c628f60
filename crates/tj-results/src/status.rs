//! Run status derived from a solver return code.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Human-readable outcome of a run.
///
/// Only two return codes carry a defined meaning; every other code maps to
/// [`Status::Unknown`] so that deriving a status never fails. Callers that
/// want unmapped codes to be an error use [`Status::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Success,
    TimedOut,
    Unknown(i32),
}

impl Status {
    pub const SUCCESS_CODE: i32 = 0;
    pub const TIMED_OUT_CODE: i32 = 33;

    pub fn from_return_code(code: i32) -> Self {
        Self::lookup(code).unwrap_or(Status::Unknown(code))
    }

    /// Strict table lookup.
    pub fn lookup(code: i32) -> Option<Self> {
        match code {
            Self::SUCCESS_CODE => Some(Status::Success),
            Self::TIMED_OUT_CODE => Some(Status::TimedOut),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::TimedOut => "Timed Out",
            Status::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
