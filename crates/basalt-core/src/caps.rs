//! # Capability And Workaround Tables
//!
//! Structured records of hardware feature bits, known-issue workaround flags
//! and silicon identification for a specific device revision.
//!
//! The tables are populated exactly once per bring-up pass, either by probing
//! the real device or by copying simulated tables off the device context, and
//! every derived feature flag is a pure function of their contents.

use bytemuck::Zeroable;

use crate::types::{ProductFamily, RenderFamily};

// =============================================================================
// SKU FEATURE TABLE
// =============================================================================

bitflags::bitflags! {
    /// Hardware feature bits for a silicon revision
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SkuTable: u64 {
        /// Media kernel execution is available
        const MEDIA_KERNELS = 1 << 0;
        /// Tiling must be resolved by software swizzling
        const SW_SWIZZLE = 1 << 1;
        /// Y-major tiling is supported
        const TILE_Y = 1 << 2;
        /// End-to-end lossless compression (requires an aux translation table)
        const E2E_COMPRESSION = 1 << 3;
        /// Device-local memory is present
        const LOCAL_MEMORY = 1 << 4;
        /// HuC microcontroller is fused in
        const HUC_ENGINE = 1 << 5;
        /// Scaler/format-converter fixed function present
        const SFC = 1 << 6;
    }
}

impl SkuTable {
    /// Reset the table to empty
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::empty();
    }
}

// =============================================================================
// WORKAROUND TABLE
// =============================================================================

bitflags::bitflags! {
    /// Known-issue workaround flags for a silicon revision
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WaTable: u64 {
        /// Restrict HuC to stream-out-only operation
        const HUC_STREAMOUT_DISABLE = 1 << 0;
        /// Force 64 KiB alignment on compressed surfaces
        const ALIGN_64K = 1 << 1;
        /// Disable media memory compression
        const DISABLE_MMC = 1 << 2;
        /// Serialize aux-table invalidations
        const AUX_INVALIDATE_SYNC = 1 << 3;
    }
}

impl WaTable {
    /// Reset the table to empty
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::empty();
    }
}

// =============================================================================
// PLATFORM IDENTIFICATION
// =============================================================================

// SAFETY: zero is the Unknown discriminant
unsafe impl Zeroable for ProductFamily {}
// SAFETY: zero is the Unknown discriminant
unsafe impl Zeroable for RenderFamily {}

/// Platform identification record
///
/// Filled from the capability probe (or the simulated tables) and published
/// to the device context on the real-probe path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Zeroable)]
pub struct PlatformInfo {
    /// Silicon product family
    pub product_family: ProductFamily,
    /// Render core family
    pub render_family: RenderFamily,
    /// PCI device id (low 16 bits of the full identifier)
    pub device_id: u16,
    /// Silicon revision id
    pub rev_id: u16,
}

// =============================================================================
// GT SYSTEM INFO
// =============================================================================

/// GT configuration record
///
/// Execution-resource topology of the device, consumed by the
/// submission-context manager when sizing logical execution contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Zeroable)]
pub struct GtSystemInfo {
    /// Total EU count
    pub eu_count: u32,
    /// Hardware threads per EU
    pub threads_per_eu: u32,
    /// Enabled slice count
    pub slice_count: u32,
    /// Enabled subslice count
    pub subslice_count: u32,
    /// Maximum slices the fuse layout supports
    pub max_slices_supported: u32,
    /// Maximum EUs per subslice
    pub max_eu_per_subslice: u32,
    /// L3 cache size in KiB
    pub l3_cache_size_kib: u32,
    /// LLC size in KiB (zero on SoC parts without LLC)
    pub llc_size_kib: u32,
}

impl GtSystemInfo {
    /// Check whether the record describes a plausible topology
    pub fn is_populated(&self) -> bool {
        self.eu_count > 0 && self.slice_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_reset_to_empty() {
        let mut sku = SkuTable::MEDIA_KERNELS | SkuTable::TILE_Y;
        let mut wa = WaTable::ALIGN_64K;
        sku.reset();
        wa.reset();
        assert!(sku.is_empty());
        assert!(wa.is_empty());
    }

    #[test]
    fn test_records_zero() {
        let platform = PlatformInfo::zeroed();
        assert_eq!(platform.product_family, ProductFamily::Unknown);
        assert_eq!(platform.device_id, 0);

        let gt = GtSystemInfo::zeroed();
        assert!(!gt.is_populated());
    }
}
