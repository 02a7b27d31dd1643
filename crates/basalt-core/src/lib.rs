//! # BASALT Core
//!
//! Foundational types, error handling and shared process state for the
//! BASALT device-context bring-up layer.
//!
//! This crate carries no hardware knowledge. It provides the type-system
//! foundations every higher layer builds on.
//!
//! ## Design Principles
//!
//! 1. **Strong Typing**: descriptors, identifiers and handles never mix
//! 2. **Pure Derivation**: feature flags are functions of capability tables
//! 3. **Shared State Is Explicit**: process-wide registries live here, locked
//! 4. **No Unsafe Leakage**: unsafe code is contained and audited
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      basalt-core                            │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │    Types    │  │ Capability  │  │   Error             │  │
//! │  │ (DeviceFd,  │  │   Tables    │  │   Handling          │  │
//! │  │  Handle<T>) │  │ (Sku/Wa/GT) │  │                     │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │  ┌─────────────┐  ┌─────────────┐                           │
//! │  │  Settings   │  │    Trace    │                           │
//! │  │ (per-family)│  │ (bring-up)  │                           │
//! │  └─────────────┘  └─────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod caps;
pub mod error;
pub mod settings;
pub mod trace;
pub mod types;

// Re-exports for convenience
pub use caps::{GtSystemInfo, PlatformInfo, SkuTable, WaTable};
pub use error::{Error, LayoutError, Result};
pub use types::*;
