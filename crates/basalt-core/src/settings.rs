//! # User Settings
//!
//! Process-wide user-setting state, seeded per detected product family.
//!
//! The registry is shared by every orchestrator instance in the process.
//! Seeding is advisory: a failure to resolve defaults is logged and never
//! fails the caller's bring-up sequence.

use hashbrown::HashMap;
use spin::RwLock;

use crate::types::ProductFamily;

// =============================================================================
// SETTING IDS
// =============================================================================

/// Identifiers of user-visible settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingId {
    /// Simulation/null-hardware mode toggle (debug and internal builds)
    SimEnable,
    /// Media kernel scheduling policy
    MediaKernelPolicy,
    /// Override for media memory compression (-1 = follow capability table)
    CompressionOverride,
}

// =============================================================================
// REGISTRY
// =============================================================================

struct SettingsStore {
    product_family: ProductFamily,
    values: HashMap<SettingId, i32>,
}

static SETTINGS: RwLock<Option<SettingsStore>> = RwLock::new(None);

/// Seed the process-wide settings for the detected product family
///
/// Existing values are preserved; only missing entries receive family
/// defaults. Called once per orchestrator bring-up, safe to repeat.
pub fn init(product_family: ProductFamily) {
    let mut guard = SETTINGS.write();
    let store = guard.get_or_insert_with(|| SettingsStore {
        product_family,
        values: HashMap::new(),
    });
    store.product_family = product_family;

    if product_family == ProductFamily::Unknown {
        log::warn!("user settings seeded for unknown product family");
    }

    let kernel_policy = if product_family == ProductFamily::Unknown {
        0
    } else {
        1
    };
    store.values.entry(SettingId::SimEnable).or_insert(0);
    store
        .values
        .entry(SettingId::MediaKernelPolicy)
        .or_insert(kernel_policy);
    store
        .values
        .entry(SettingId::CompressionOverride)
        .or_insert(-1);
}

/// Read a setting value
///
/// Returns `None` when the registry has not been seeded or the id has no
/// value; callers treat that as "use the built-in default".
pub fn read_value(id: SettingId) -> Option<i32> {
    let guard = SETTINGS.read();
    guard.as_ref().and_then(|s| s.values.get(&id).copied())
}

/// Write a setting value (tools and tests)
pub fn write_value(id: SettingId, value: i32) {
    let mut guard = SETTINGS.write();
    let store = guard.get_or_insert_with(|| SettingsStore {
        product_family: ProductFamily::Unknown,
        values: HashMap::new(),
    });
    store.values.insert(id, value);
}

/// Product family the registry was last seeded with
pub fn product_family() -> ProductFamily {
    let guard = SETTINGS.read();
    guard
        .as_ref()
        .map(|s| s.product_family)
        .unwrap_or(ProductFamily::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_seeds_defaults() {
        init(ProductFamily::Gen12);
        assert_eq!(read_value(SettingId::SimEnable), Some(0));
        assert_eq!(read_value(SettingId::MediaKernelPolicy), Some(1));
        assert_eq!(read_value(SettingId::CompressionOverride), Some(-1));
        assert_eq!(product_family(), ProductFamily::Gen12);
    }

    #[test]
    fn test_init_preserves_existing_values() {
        write_value(SettingId::CompressionOverride, 1);
        init(ProductFamily::Gen12);
        assert_eq!(read_value(SettingId::CompressionOverride), Some(1));
    }
}
