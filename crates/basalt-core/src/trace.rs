//! # Trace Bring-Up Info
//!
//! One-shot record of the driver interface version and silicon identity,
//! published right after capability resolution so trace consumers can key
//! their decoding tables off it.

use spin::RwLock;

use crate::types::{ProductFamily, RenderFamily};

/// Identification published to the trace subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceSetupInfo {
    /// Packed driver interface version (major << 16 | minor)
    pub interface_version: u32,
    /// Product family
    pub product_family: ProductFamily,
    /// Render core family
    pub render_family: RenderFamily,
    /// Packed silicon identity (revision << 16 | device id)
    pub packed_device: u32,
}

static TRACE_INFO: RwLock<Option<TraceSetupInfo>> = RwLock::new(None);

/// Publish the trace setup record
///
/// Last writer wins; each orchestrator bring-up republishes for its device.
pub fn setup_info(info: TraceSetupInfo) {
    log::debug!(
        "trace setup: if=0x{:08x} family={:?} device=0x{:08x}",
        info.interface_version,
        info.product_family,
        info.packed_device
    );
    *TRACE_INFO.write() = Some(info);
}

/// Read back the last published record
pub fn current() -> Option<TraceSetupInfo> {
    *TRACE_INFO.read()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_info_round_trip() {
        let info = TraceSetupInfo {
            interface_version: (1 << 16) | 12,
            product_family: ProductFamily::Gen12,
            render_family: RenderFamily::Gen12,
            packed_device: (3 << 16) | 0x9A49,
        };
        setup_info(info);
        assert_eq!(current(), Some(info));
    }
}
