//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::IntelligenceError;

/// `[CODE] message`, so scripts can match on the code.
pub fn map_error(e: &IntelligenceError) -> String {
    format!("[{}] {}", e.code(), e)
}
