//! # Capability Probe Records
//!
//! Structured results of device capability discovery.
//!
//! Two independent probes run during bring-up: the graphics probe fills the
//! tables the context itself derives feature flags from, and the layout probe
//! fills the triple handed to the memory-layout authority when the process
//! singleton is created. The two are deliberately separate records; the
//! layout authority must never observe context-local workaround overrides.

use basalt_core::types::{DeviceId, ProductFamily, RenderFamily};
use basalt_core::{GtSystemInfo, PlatformInfo, SkuTable, WaTable};

// =============================================================================
// PROBE RESULTS
// =============================================================================

/// Result of the graphics capability probe
#[derive(Debug, Clone, Copy, Default)]
pub struct GfxProbe {
    /// Platform identification
    pub platform: PlatformInfo,
    /// Feature table
    pub sku: SkuTable,
    /// Workaround table
    pub wa: WaTable,
    /// GT topology
    pub gt: GtSystemInfo,
}

/// Result of the layout-subsystem capability probe
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutProbe {
    /// Feature table for the layout authority
    pub sku: SkuTable,
    /// Workaround table for the layout authority
    pub wa: WaTable,
    /// GT topology for the layout authority
    pub gt: GtSystemInfo,
}

// =============================================================================
// DEVICE INFO TABLES
// =============================================================================

/// Derive the platform identification record for a device
pub fn derive_platform(device_id: DeviceId, rev_id: u16) -> PlatformInfo {
    let product_family = device_id.product_family();
    let render_family = match product_family {
        ProductFamily::Gen9 => RenderFamily::Gen9,
        ProductFamily::Gen11 => RenderFamily::Gen11,
        ProductFamily::Gen12 => RenderFamily::Gen12,
        ProductFamily::Unknown => RenderFamily::Unknown,
    };
    PlatformInfo {
        product_family,
        render_family,
        device_id: (device_id.raw() & 0xFFFF) as u16,
        rev_id,
    }
}

/// Feature table for a product family
pub fn sku_for_family(family: ProductFamily) -> SkuTable {
    match family {
        ProductFamily::Gen9 => {
            SkuTable::MEDIA_KERNELS | SkuTable::TILE_Y | SkuTable::HUC_ENGINE
        }
        ProductFamily::Gen11 => {
            SkuTable::MEDIA_KERNELS | SkuTable::TILE_Y | SkuTable::HUC_ENGINE | SkuTable::SFC
        }
        ProductFamily::Gen12 => {
            SkuTable::MEDIA_KERNELS
                | SkuTable::E2E_COMPRESSION
                | SkuTable::HUC_ENGINE
                | SkuTable::SFC
                | SkuTable::LOCAL_MEMORY
        }
        ProductFamily::Unknown => SkuTable::empty(),
    }
}

/// Workaround table for a product family
pub fn wa_for_family(family: ProductFamily) -> WaTable {
    match family {
        ProductFamily::Gen9 => WaTable::ALIGN_64K,
        ProductFamily::Gen11 => WaTable::empty(),
        ProductFamily::Gen12 => WaTable::AUX_INVALIDATE_SYNC,
        ProductFamily::Unknown => WaTable::empty(),
    }
}

/// GT topology for a product family
///
/// Real silicon reports fused-down values; these are the full-die defaults
/// used when the kernel interface does not expose topology queries.
pub fn gt_for_family(family: ProductFamily) -> GtSystemInfo {
    match family {
        ProductFamily::Gen9 => GtSystemInfo {
            eu_count: 24,
            threads_per_eu: 7,
            slice_count: 1,
            subslice_count: 3,
            max_slices_supported: 3,
            max_eu_per_subslice: 8,
            l3_cache_size_kib: 768,
            llc_size_kib: 4096,
        },
        ProductFamily::Gen11 => GtSystemInfo {
            eu_count: 64,
            threads_per_eu: 7,
            slice_count: 1,
            subslice_count: 8,
            max_slices_supported: 1,
            max_eu_per_subslice: 8,
            l3_cache_size_kib: 3072,
            llc_size_kib: 0,
        },
        ProductFamily::Gen12 => GtSystemInfo {
            eu_count: 96,
            threads_per_eu: 7,
            slice_count: 1,
            subslice_count: 6,
            max_slices_supported: 1,
            max_eu_per_subslice: 16,
            l3_cache_size_kib: 3840,
            llc_size_kib: 8192,
        },
        ProductFamily::Unknown => GtSystemInfo::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_derivation() {
        let p = derive_platform(DeviceId::new(0x9A49), 3);
        assert_eq!(p.product_family, ProductFamily::Gen12);
        assert_eq!(p.render_family, RenderFamily::Gen12);
        assert_eq!(p.device_id, 0x9A49);
        assert_eq!(p.rev_id, 3);
    }

    #[test]
    fn test_unknown_family_has_empty_tables() {
        assert!(sku_for_family(ProductFamily::Unknown).is_empty());
        assert!(wa_for_family(ProductFamily::Unknown).is_empty());
        assert!(!gt_for_family(ProductFamily::Unknown).is_populated());
    }

    #[test]
    fn test_gen12_supports_compression() {
        let sku = sku_for_family(ProductFamily::Gen12);
        assert!(sku.contains(SkuTable::E2E_COMPRESSION));
        assert!(!sku.contains(SkuTable::TILE_Y));
    }
}
