//! # BASALT HAL
//!
//! Hardware abstraction for context bring-up: the backend strategy that
//! selects the real-device or null-hardware path, the buffer allocator
//! provider, and the capability probe.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        basalt-hal                            │
//! │                                                              │
//! │  ┌────────────────┐   ┌───────────────┐   ┌───────────────┐  │
//! │  │ HardwareBackend│──▶│ BufferManager │   │ Probe Records │  │
//! │  │ (Drm / Null)   │   │  (GEM-style)  │   │ (Gfx / Layout)│  │
//! │  └────────────────┘   └───────────────┘   └───────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend is chosen when the orchestrator is constructed; nothing in
//! the bring-up sequence branches on build configuration.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod drm;
pub mod probe;

// Re-exports
pub use backend::{DeviceIdentity, DrmBackend, HardwareBackend, NullBackend};
pub use drm::{BufferManager, GemBufferManager};
pub use probe::{GfxProbe, LayoutProbe};
