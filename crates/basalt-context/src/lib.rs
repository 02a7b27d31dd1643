//! # BASALT Context
//!
//! The bring-up orchestrator and the device-context exchange surface.
//!
//! This crate turns a raw device descriptor into a fully capability-probed,
//! resource-backed shared context that command-buffer pools, submission
//! queues and memory-compression services safely build on.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                        Bring-Up Flow                               │
//! │                                                                    │
//! │  DeviceContext (fd in)                                             │
//! │        │                                                           │
//! │        ▼                                                           │
//! │  ┌───────────┐   ┌──────────┐   ┌─────────────┐   ┌────────────┐   │
//! │  │ validity  │──▶│ buffer   │──▶│ capability  │──▶│  layout    │   │
//! │  │   gate    │   │ manager  │   │   probe     │   │ singleton  │   │
//! │  └───────────┘   └──────────┘   └─────────────┘   └─────┬──────┘   │
//! │                                                         │          │
//! │  ┌────────────┐   ┌───────────────┐   ┌─────────────┐   │          │
//! │  │   media    │◀──│   subsystem   │◀──│   publish   │◀──┘          │
//! │  │  services  │   │   managers    │   │    step     │              │
//! │  └────────────┘   └───────────────┘   └─────────────┘              │
//! │                                                                    │
//! │  DeviceContext (tables, flags, handles out)                        │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Teardown reverses the sequence in last-acquired-first-released order;
//! subsystem managers are independently owned and survive it.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod context;
pub mod device;
pub mod media;

// Re-exports
#[cfg(feature = "decompress")]
pub use media::DecompressionState;
pub use media::MediaCopyState;
pub use context::OsContext;
pub use device::DeviceContext;
