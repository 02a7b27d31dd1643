//! # Hardware Backend Strategy
//!
//! The backend trait selects between the real-device path and the
//! null-hardware (simulation) path at orchestrator construction time.
//!
//! The real path probes silicon through the buffer manager; the null path
//! serves tables the caller staged on the device context, and the
//! orchestrator preserves those staged values instead of publishing probe
//! results back.

use alloc::sync::Arc;

use basalt_core::error::{Error, Result};
use basalt_core::types::{ByteSize, DeviceFd, DeviceId, ProductFamily};

use crate::drm::{BufferManager, GemBufferManager};
use crate::probe::{self, GfxProbe, LayoutProbe};

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Hardware access strategy for context bring-up
///
/// One backend instance may serve multiple orchestrator instances; all
/// methods are `&self` and the implementations hold no per-context state.
pub trait HardwareBackend: Send + Sync {
    /// Open the buffer allocator for a descriptor with a fixed batch size
    fn open_buffer_manager(
        &self,
        fd: DeviceFd,
        batch_size: ByteSize,
    ) -> Option<Arc<dyn BufferManager>>;

    /// Probe platform identification and capability tables
    fn probe_gfx_info(&self, fd: DeviceFd, bufmgr: &dyn BufferManager) -> Result<GfxProbe>;

    /// Probe the independent capability triple for the layout subsystem
    fn probe_layout_info(&self, fd: DeviceFd) -> Result<LayoutProbe>;

    /// Whether this backend runs the null-hardware path
    fn is_simulation(&self) -> bool {
        false
    }
}

// =============================================================================
// REAL DEVICE BACKEND
// =============================================================================

/// Identity of the device behind a descriptor
///
/// Supplied by the platform integration that discovered the device node,
/// the same way the platform layer seeds capability state elsewhere in the
/// driver stack.
#[derive(Debug, Clone, Copy)]
pub struct DeviceIdentity {
    /// Full device identifier
    pub device_id: DeviceId,
    /// Silicon revision
    pub rev_id: u16,
}

/// Real-device backend probing through the GEM buffer manager
#[derive(Debug)]
pub struct DrmBackend {
    identity: DeviceIdentity,
}

impl DrmBackend {
    /// Create a backend for a discovered device
    pub fn new(identity: DeviceIdentity) -> Self {
        Self { identity }
    }
}

impl HardwareBackend for DrmBackend {
    fn open_buffer_manager(
        &self,
        fd: DeviceFd,
        batch_size: ByteSize,
    ) -> Option<Arc<dyn BufferManager>> {
        GemBufferManager::open(fd, batch_size, self.identity.device_id)
            .map(|m| Arc::new(m) as Arc<dyn BufferManager>)
    }

    fn probe_gfx_info(&self, _fd: DeviceFd, bufmgr: &dyn BufferManager) -> Result<GfxProbe> {
        let device_id = bufmgr.device_id();
        let platform = probe::derive_platform(device_id, self.identity.rev_id);
        if platform.product_family == ProductFamily::Unknown {
            log::error!("gfx probe failed for {:?}", device_id);
            return Err(Error::ProbeFailed);
        }
        Ok(GfxProbe {
            platform,
            sku: probe::sku_for_family(platform.product_family),
            wa: probe::wa_for_family(platform.product_family),
            gt: probe::gt_for_family(platform.product_family),
        })
    }

    fn probe_layout_info(&self, _fd: DeviceFd) -> Result<LayoutProbe> {
        let family = self.identity.device_id.product_family();
        if family == ProductFamily::Unknown {
            log::error!("layout probe failed for {:?}", self.identity.device_id);
            return Err(Error::ProbeFailed);
        }
        Ok(LayoutProbe {
            sku: probe::sku_for_family(family),
            wa: probe::wa_for_family(family),
            gt: probe::gt_for_family(family),
        })
    }
}

// =============================================================================
// NULL HARDWARE BACKEND
// =============================================================================

/// Null-hardware backend for simulation runs
///
/// Carries the simulated capability triple for the layout subsystem; the
/// graphics tables come off the device context, so `probe_gfx_info` is never
/// reached on this path.
#[derive(Debug)]
pub struct NullBackend {
    device_id: DeviceId,
    layout: LayoutProbe,
}

impl NullBackend {
    /// Create a null backend for a simulated device
    pub fn new(device_id: DeviceId, layout: LayoutProbe) -> Self {
        Self { device_id, layout }
    }
}

/// Buffer manager stand-in used by the null-hardware path
#[derive(Debug)]
struct NullBufferManager {
    fd: DeviceFd,
    device_id: DeviceId,
    reuse: core::sync::atomic::AtomicBool,
}

impl BufferManager for NullBufferManager {
    fn fd(&self) -> DeviceFd {
        self.fd
    }

    fn device_id(&self) -> DeviceId {
        self.device_id
    }

    fn enable_reuse(&self) {
        self.reuse
            .store(true, core::sync::atomic::Ordering::Release);
    }

    fn reuse_enabled(&self) -> bool {
        self.reuse.load(core::sync::atomic::Ordering::Acquire)
    }
}

impl HardwareBackend for NullBackend {
    fn open_buffer_manager(
        &self,
        fd: DeviceFd,
        _batch_size: ByteSize,
    ) -> Option<Arc<dyn BufferManager>> {
        if !fd.is_valid() {
            return None;
        }
        Some(Arc::new(NullBufferManager {
            fd,
            device_id: self.device_id,
            reuse: core::sync::atomic::AtomicBool::new(false),
        }))
    }

    fn probe_gfx_info(&self, _fd: DeviceFd, _bufmgr: &dyn BufferManager) -> Result<GfxProbe> {
        // The orchestrator copies staged tables instead of probing here.
        Err(Error::NotSupported)
    }

    fn probe_layout_info(&self, _fd: DeviceFd) -> Result<LayoutProbe> {
        Ok(self.layout)
    }

    fn is_simulation(&self) -> bool {
        true
    }
}
