//! # BASALT Memory Layout
//!
//! The process-wide memory-layout authority and the optional aux-table
//! manager.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        basalt-mem                               │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │              Memory-Layout Authority (singleton)          │  │
//! │  │   open() ─▶ LayoutInterface ─▶ create/attach/destroy      │  │
//! │  │            per-context client handles                     │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │       Aux-Table Manager (optional, per context)           │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The authority has process lifetime; contexts attach to it with
//! reference-accounted create/destroy pairs and their own client handles.
//! Tiling and placement policy itself lives behind the interface and is not
//! part of the bring-up layer.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod aux_table;
pub mod layout;

// Re-exports
pub use aux_table::AuxTableManager;
pub use layout::{ClientKind, LayoutInterface, INTERFACE_VERSION};
