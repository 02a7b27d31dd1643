//! # Aux-Table Manager
//!
//! Optional secondary address-translation-table manager backing media
//! memory compression. Only silicon with end-to-end compression carries an
//! aux table; absence is expected and tolerated everywhere.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

use basalt_core::types::DeviceFd;
use basalt_core::SkuTable;
use basalt_hal::BufferManager;

// =============================================================================
// AUX TABLE MANAGER
// =============================================================================

/// Aux translation levels: L3 -> L2 -> L1
const AUX_TABLE_LEVELS: u32 = 3;

/// Secondary translation-table manager for compressed surfaces
///
/// Owned by exactly one orchestrator; the device context receives a shared
/// reference for downstream consumers.
pub struct AuxTableManager {
    bufmgr: Arc<dyn BufferManager>,
    mapped_resources: AtomicU64,
}

impl AuxTableManager {
    /// Build the manager when the capability table calls for one
    ///
    /// Returns `None` on silicon without end-to-end compression.
    pub fn create(bufmgr: &Arc<dyn BufferManager>, sku: &SkuTable) -> Option<Arc<Self>> {
        if !sku.contains(SkuTable::E2E_COMPRESSION) {
            log::debug!("aux table not required for this sku");
            return None;
        }
        log::debug!(
            "aux table manager created, fd={:?} levels={}",
            bufmgr.fd(),
            AUX_TABLE_LEVELS
        );
        Some(Arc::new(Self {
            bufmgr: Arc::clone(bufmgr),
            mapped_resources: AtomicU64::new(0),
        }))
    }

    /// Descriptor of the device the table belongs to
    pub fn fd(&self) -> DeviceFd {
        self.bufmgr.fd()
    }

    /// Record a resource mapping into the aux table
    pub fn map_resource(&self) {
        self.mapped_resources.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a resource unmapping
    pub fn unmap_resource(&self) {
        self.mapped_resources.fetch_sub(1, Ordering::Relaxed);
    }

    /// Number of resources currently mapped
    pub fn mapped_resources(&self) -> u64 {
        self.mapped_resources.load(Ordering::Relaxed)
    }
}

impl core::fmt::Debug for AuxTableManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuxTableManager")
            .field("fd", &self.bufmgr.fd())
            .field("mapped_resources", &self.mapped_resources())
            .finish()
    }
}

impl Drop for AuxTableManager {
    fn drop(&mut self) {
        let live = self.mapped_resources.load(Ordering::Relaxed);
        if live != 0 {
            log::warn!("aux table manager released with {} mapped resources", live);
        } else {
            log::debug!("aux table manager released");
        }
    }
}
