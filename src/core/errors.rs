/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::memory::element::ElementKind;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Arena operation errors with serialization support
///
/// Every variant is recoverable by the caller. `HostAllocationFailure` is the
/// only one caused by the environment rather than by the request itself.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum AllocationError {
    #[error("Zero-size allocation request")]
    #[diagnostic(
        code(arena::zero_size_request),
        help("Request at least one element of non-zero size. Use free() to release a slot.")
    )]
    ZeroSizeRequest,

    #[error("Arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes, limit {limit} bytes")]
    #[diagnostic(
        code(arena::capacity_exceeded),
        help("Raise max_capacity in the arena configuration or free unused allocations.")
    )]
    CapacityExceeded {
        requested: usize,
        capacity: usize,
        limit: usize,
    },

    #[error("Invalid handle: slot {index}, generation {generation}")]
    #[diagnostic(
        code(arena::invalid_handle),
        help("The slot was freed, reused, or belongs to another arena. Do not keep handles past free().")
    )]
    InvalidHandle { index: u32, generation: u32 },

    #[error("Arena is closed")]
    #[diagnostic(
        code(arena::closed),
        help("The arena was torn down. All handles it issued are permanently invalid.")
    )]
    ArenaClosed,

    #[error("Out of bounds: offset {offset} + length {len} exceeds slot size {size}")]
    #[diagnostic(
        code(arena::out_of_bounds),
        help("Accesses must stay within the slot's recorded size. Resize the slot first.")
    )]
    OutOfBounds { offset: usize, len: usize, size: usize },

    #[error("Host allocation failure: could not reserve {requested} bytes")]
    #[diagnostic(
        code(arena::host_allocation_failure),
        help("The host allocator refused to grow the backing buffer.")
    )]
    HostAllocationFailure { requested: usize },

    #[error("Element type mismatch: slot holds {found}, view expects {expected}")]
    #[diagnostic(
        code(arena::type_mismatch),
        help("Read the slot with the element type it was allocated with.")
    )]
    TypeMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
}

impl AllocationError {
    /// Whether this error is a stale or foreign handle
    #[inline]
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Self::InvalidHandle { .. })
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid), help("Check arena capacity and threshold settings."))]
    Invalid(String),

    #[error("Invalid value for {var}: {value:?}")]
    #[diagnostic(code(config::env), help("Arena environment overrides must be unsigned integers."))]
    Env { var: &'static str, value: String },

    #[error("Failed to read config file {}: {source}", .path.display())]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    #[diagnostic(code(config::parse), help("The config file must be a JSON object."))]
    Parse(#[from] serde_json::Error),
}
