//! # Buffer Allocator Provider
//!
//! The hardware buffer manager bound to a device file descriptor.
//!
//! The orchestrator owns exactly one buffer manager per context; it is
//! created once during bring-up and released once during teardown (or when
//! the abandoned context is dropped after a failed bring-up).

use core::sync::atomic::{AtomicBool, Ordering};

use basalt_core::types::{ByteSize, DeviceFd, DeviceId};

// =============================================================================
// BUFFER MANAGER TRAIT
// =============================================================================

/// Hardware buffer allocator bound to a device descriptor
///
/// This is the allocator-provider contract: identification and reuse policy
/// only. Allocation algorithms live behind this seam and are out of scope
/// for the bring-up layer.
pub trait BufferManager: Send + Sync {
    /// Descriptor the allocator is bound to
    fn fd(&self) -> DeviceFd;

    /// Device identifier reported by the allocator
    fn device_id(&self) -> DeviceId;

    /// Enable allocator-side buffer object reuse
    fn enable_reuse(&self);

    /// Check whether reuse has been enabled
    fn reuse_enabled(&self) -> bool;
}

// =============================================================================
// GEM BUFFER MANAGER
// =============================================================================

/// GEM-style buffer manager for the real-device path
///
/// Device identity is supplied by the platform integration that opened the
/// descriptor; the kernel round-trips to create and recycle buffer objects
/// sit behind this type and are not part of the bring-up contract.
#[derive(Debug)]
pub struct GemBufferManager {
    fd: DeviceFd,
    batch_size: ByteSize,
    device_id: DeviceId,
    reuse: AtomicBool,
}

impl GemBufferManager {
    /// Open a buffer manager against a descriptor
    ///
    /// Returns `None` when the descriptor fails the validity gate or the
    /// batch size is zero, matching the provider contract of "no handle"
    /// rather than an error.
    pub fn open(fd: DeviceFd, batch_size: ByteSize, device_id: DeviceId) -> Option<Self> {
        if !fd.is_valid() || batch_size == ByteSize::ZERO {
            log::warn!("buffer manager open rejected, fd={:?}", fd);
            return None;
        }
        log::debug!(
            "buffer manager opened, fd={:?} batch={:?}",
            fd,
            batch_size
        );
        Some(Self {
            fd,
            batch_size,
            device_id,
            reuse: AtomicBool::new(false),
        })
    }

    /// Batch buffer size the manager was opened with
    pub fn batch_size(&self) -> ByteSize {
        self.batch_size
    }
}

impl BufferManager for GemBufferManager {
    fn fd(&self) -> DeviceFd {
        self.fd
    }

    fn device_id(&self) -> DeviceId {
        self.device_id
    }

    fn enable_reuse(&self) {
        self.reuse.store(true, Ordering::Release);
    }

    fn reuse_enabled(&self) -> bool {
        self.reuse.load(Ordering::Acquire)
    }
}

impl Drop for GemBufferManager {
    fn drop(&mut self) {
        log::debug!("buffer manager destroyed, fd={:?}", self.fd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_bad_parameters() {
        assert!(GemBufferManager::open(DeviceFd::new(0), ByteSize::from_kib(512), DeviceId::new(1)).is_none());
        assert!(GemBufferManager::open(DeviceFd::new(4), ByteSize::ZERO, DeviceId::new(1)).is_none());
    }

    #[test]
    fn test_reuse_toggle() {
        let mgr =
            GemBufferManager::open(DeviceFd::new(4), ByteSize::from_kib(512), DeviceId::new(0x9A49))
                .unwrap();
        assert!(!mgr.reuse_enabled());
        mgr.enable_reuse();
        assert!(mgr.reuse_enabled());
        assert_eq!(mgr.device_id(), DeviceId::new(0x9A49));
    }
}
