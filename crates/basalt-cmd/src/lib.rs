//! # BASALT Command Subsystems
//!
//! The shared subsystem managers a valid device context builds on: the
//! command-buffer pool and the submission-context manager.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Command Subsystems                        │
//! │                                                               │
//! │  ┌──────────────┐        ┌──────────────────────────────┐     │
//! │  │ CmdBufManager│        │  SubmissionContextManager    │     │
//! │  │ (one shared  │        │  (one per device context,    │     │
//! │  │  pool set)   │        │   registry-owned)            │     │
//! │  └──────┬───────┘        └──────────────┬───────────────┘     │
//! │         │                               │                     │
//! │         └──────────── ContextParams ────┘                     │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Managers never hold a pointer back to the orchestrator; they receive a
//! flat [`ContextParams`] record, and their lifetime is owned by the
//! process-wide registries rather than by any single context.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod bufmgr;
pub mod submit;

use basalt_core::types::{ContextId, DeviceFd};
use basalt_core::GtSystemInfo;

// Re-exports
pub use bufmgr::{CmdBufManager, CommandBufferHandle, COMMAND_BUFFER_SIZE};
pub use submit::{EngineNode, SubmissionContextHandle, SubmissionContextManager};

// =============================================================================
// CONTEXT PARAMS
// =============================================================================

/// Flat description of the device context a manager serves
///
/// Stands in for the orchestrator back-pointer: everything a subsystem
/// manager may key on, copied out once at acquisition time.
#[derive(Debug, Clone, Copy)]
pub struct ContextParams {
    /// Owning orchestrator instance
    pub context_id: ContextId,
    /// Device descriptor
    pub fd: DeviceFd,
    /// GT topology of the device
    pub gt: GtSystemInfo,
    /// Context submits with patch lists
    pub uses_patch_list: bool,
    /// Context submits with pre-resolved graphics addresses
    pub uses_gfx_address: bool,
}
