//! # Media Services
//!
//! Decompression-state and media-copy-state services bound to a device
//! context at the tail of bring-up. Each exposes one externally visible
//! state handle that the orchestrator publishes; the engines behind the
//! handles are out of scope here.

use core::sync::atomic::{AtomicU64, Ordering};

use basalt_core::types::MediaStateHandle;
#[cfg(feature = "decompress")]
use basalt_core::{SkuTable, WaTable};

use crate::device::DeviceContext;

static NEXT_MEDIA_STATE: AtomicU64 = AtomicU64::new(1);

fn next_state_handle() -> MediaStateHandle {
    MediaStateHandle::new(NEXT_MEDIA_STATE.fetch_add(1, Ordering::Relaxed))
}

// =============================================================================
// DECOMPRESSION STATE
// =============================================================================

/// Media memory decompression service
///
/// Only silicon with end-to-end compression (and without the compression
/// kill workaround) gets a live state; absence is tolerated by every
/// consumer.
#[cfg(feature = "decompress")]
#[derive(Debug)]
pub struct DecompressionState {
    state: Option<MediaStateHandle>,
}

#[cfg(feature = "decompress")]
impl DecompressionState {
    /// Build the service against a populated device context
    pub fn new(dev: &DeviceContext) -> Self {
        let supported =
            dev.sku.contains(SkuTable::E2E_COMPRESSION) && !dev.wa.contains(WaTable::DISABLE_MMC);
        let state = if supported {
            Some(next_state_handle())
        } else {
            log::debug!("decompression not supported on this sku");
            None
        };
        Self { state }
    }

    /// Externally visible state handle
    pub fn state_handle(&self) -> Option<MediaStateHandle> {
        self.state
    }
}

// =============================================================================
// MEDIA COPY STATE
// =============================================================================

/// Media copy (blit) service
///
/// Every device carries a copy engine; a missing state handle indicates a
/// defective bring-up, not a capability gap.
#[derive(Debug)]
pub struct MediaCopyState {
    state: Option<MediaStateHandle>,
}

impl MediaCopyState {
    /// Build the service against a populated device context
    pub fn new(dev: &DeviceContext) -> Self {
        let state = if dev.fd.is_valid() {
            Some(next_state_handle())
        } else {
            None
        };
        Self { state }
    }

    /// Externally visible state handle
    pub fn state_handle(&self) -> Option<MediaStateHandle> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_core::types::DeviceFd;

    #[cfg(feature = "decompress")]
    #[test]
    fn test_decompression_follows_capability() {
        let mut dev = DeviceContext::new(DeviceFd::new(4));
        dev.sku = SkuTable::E2E_COMPRESSION;
        assert!(DecompressionState::new(&dev).state_handle().is_some());

        dev.wa = WaTable::DISABLE_MMC;
        assert!(DecompressionState::new(&dev).state_handle().is_none());

        dev.sku = SkuTable::empty();
        dev.wa = WaTable::empty();
        assert!(DecompressionState::new(&dev).state_handle().is_none());
    }

    #[test]
    fn test_copy_state_requires_descriptor() {
        let dev = DeviceContext::new(DeviceFd::new(4));
        assert!(MediaCopyState::new(&dev).state_handle().is_some());

        let bad = DeviceContext::new(DeviceFd::new(0));
        assert!(MediaCopyState::new(&bad).state_handle().is_none());
    }

    #[test]
    fn test_state_handles_unique() {
        let dev = DeviceContext::new(DeviceFd::new(4));
        let a = MediaCopyState::new(&dev).state_handle().unwrap();
        let b = MediaCopyState::new(&dev).state_handle().unwrap();
        assert_ne!(a, b);
    }
}
