//! # BASALT Error Handling
//!
//! Error types shared by every layer of the context bring-up stack.
//!
//! Error handling in BASALT follows these principles:
//! - Errors are typed and categorized
//! - No panics in production code paths
//! - Fatal bring-up errors abort the init sequence, they are never retried
//! - Errors are `no_std` compatible

use core::fmt;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// BASALT Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// BASALT unified error type
///
/// This enum covers all error conditions across the bring-up stack.
/// Errors are categorized by subsystem for easier debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Operation not yet implemented
    NotImplemented,
    /// Invalid parameter provided
    InvalidParameter,
    /// Operation not supported on this hardware
    NotSupported,
    /// Object is in the wrong state for the operation
    InvalidState,

    // =========================================================================
    // Device Context Errors
    // =========================================================================
    /// Caller supplied a bad device descriptor
    InvalidHandle,
    /// Device not present or not accessible
    DeviceNotFound,

    // =========================================================================
    // Allocation Errors
    // =========================================================================
    /// A resource-backed acquisition (buffer manager, layout context) failed
    AllocationFailed,
    /// Out of system memory
    OutOfMemory,

    // =========================================================================
    // Capability Discovery Errors
    // =========================================================================
    /// Hardware capability probe failed
    ProbeFailed,

    // =========================================================================
    // Subsystem Manager Errors
    // =========================================================================
    /// A shared subsystem manager could not be obtained
    DependencyUnavailable,
    /// A subsystem manager was obtained but failed its own initialization
    InitializationFailed,

    // =========================================================================
    // Memory-Layout Authority Errors
    // =========================================================================
    /// Layout authority error
    Layout(LayoutError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Generic
            Self::NotImplemented => write!(f, "operation not implemented"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NotSupported => write!(f, "operation not supported"),
            Self::InvalidState => write!(f, "invalid object state"),

            // Device context
            Self::InvalidHandle => write!(f, "invalid device handle"),
            Self::DeviceNotFound => write!(f, "device not found"),

            // Allocation
            Self::AllocationFailed => write!(f, "resource acquisition failed"),
            Self::OutOfMemory => write!(f, "out of memory"),

            // Capability discovery
            Self::ProbeFailed => write!(f, "capability probe failed"),

            // Subsystem managers
            Self::DependencyUnavailable => write!(f, "subsystem manager unavailable"),
            Self::InitializationFailed => write!(f, "subsystem initialization failed"),

            // Layout authority
            Self::Layout(e) => write!(f, "layout authority error: {:?}", e),
        }
    }
}

// =============================================================================
// SUB-ERROR TYPES
// =============================================================================

/// Memory-layout authority error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// The dynamic interface could not be opened
    InterfaceUnavailable,
    /// The dynamic interface version does not match
    VersionMismatch,
    /// An operation required the singleton context but none exists
    NoSingletonContext,
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<LayoutError> for Error {
    fn from(e: LayoutError) -> Self {
        Error::Layout(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_converts() {
        let e: Error = LayoutError::InterfaceUnavailable.into();
        assert_eq!(e, Error::Layout(LayoutError::InterfaceUnavailable));
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_display_is_lowercase_prose() {
        use std::string::ToString;

        assert_eq!(Error::InvalidHandle.to_string(), "invalid device handle");
        assert_eq!(Error::ProbeFailed.to_string(), "capability probe failed");
    }
}
