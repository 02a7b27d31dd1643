//! # Device Context
//!
//! The caller-owned exchange structure between the driver entry points and
//! the bring-up orchestrator.
//!
//! The device context is a bidirectional integration point, never owned by
//! the orchestrator: the descriptor (and, on the null-hardware path, the
//! staged capability tables) travel in; the resolved identity, tables,
//! feature flags and subsystem handles travel out.

use alloc::sync::Arc;

use basalt_core::types::{ContextId, DeviceFd, DeviceId, LayoutClientHandle, MediaStateHandle};
use basalt_core::{GtSystemInfo, PlatformInfo, SkuTable, WaTable};
use basalt_mem::AuxTableManager;

// =============================================================================
// DEVICE CONTEXT
// =============================================================================

/// Caller-owned device context
///
/// Field ownership is split by direction:
/// - **in**: `fd`; on the null-hardware path also `device_id`, `platform`,
///   `sku`, `wa` and `gt` (staged simulation tables, preserved by init).
/// - **out**: everything else, written by the orchestrator's publish step
///   and by the media services' acquisition.
#[derive(Debug, Default)]
pub struct DeviceContext {
    /// Device file descriptor (in)
    pub fd: DeviceFd,
    /// Resolved device identifier
    pub device_id: DeviceId,
    /// Platform identification record
    pub platform: PlatformInfo,
    /// Feature table
    pub sku: SkuTable,
    /// Workaround table
    pub wa: WaTable,
    /// GT topology record
    pub gt: GtSystemInfo,
    /// Simulation mode resolved from user settings (out)
    pub sim_active: bool,
    /// Per-context layout-authority client handle (out)
    pub layout_client: Option<LayoutClientHandle>,
    /// Aux-table manager reference, when the silicon carries one (out)
    pub aux_table: Option<Arc<AuxTableManager>>,
    /// Tiling must be resolved by software swizzling (out)
    pub use_sw_swizzle: bool,
    /// Y-major tiling supported (out)
    pub tile_y: bool,
    /// Device is an integrated SoC variant (out)
    pub is_integrated_soc: bool,
    /// Back-reference to the owning orchestrator instance (out)
    pub os_context: Option<ContextId>,
    /// Decompression service state handle (out)
    pub decomp_state: Option<MediaStateHandle>,
    /// Media-copy service state handle (out)
    pub copy_state: Option<MediaStateHandle>,
}

impl DeviceContext {
    /// Create a context carrying only a descriptor (real-probe path)
    pub fn new(fd: DeviceFd) -> Self {
        Self {
            fd,
            ..Self::default()
        }
    }

    /// Create a context with staged simulation tables (null-hardware path)
    pub fn with_simulated_tables(
        fd: DeviceFd,
        device_id: DeviceId,
        platform: PlatformInfo,
        sku: SkuTable,
        wa: WaTable,
        gt: GtSystemInfo,
    ) -> Self {
        Self {
            fd,
            device_id,
            platform,
            sku,
            wa,
            gt,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_only_descriptor() {
        let dev = DeviceContext::new(DeviceFd::new(7));
        assert_eq!(dev.fd, DeviceFd::new(7));
        assert!(dev.sku.is_empty());
        assert!(dev.layout_client.is_none());
        assert!(dev.os_context.is_none());
    }

    #[test]
    fn test_simulated_tables_are_staged() {
        let dev = DeviceContext::with_simulated_tables(
            DeviceFd::new(7),
            DeviceId::new(0x2212),
            PlatformInfo::default(),
            SkuTable::TILE_Y,
            WaTable::ALIGN_64K,
            GtSystemInfo::default(),
        );
        assert!(dev.sku.contains(SkuTable::TILE_Y));
        assert!(dev.wa.contains(WaTable::ALIGN_64K));
    }
}
