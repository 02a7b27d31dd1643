//! # Memory-Layout Authority
//!
//! The process-wide singleton governing GPU memory tiling and placement
//! policy, shared by every device context in the process.
//!
//! Access goes through a versioned dynamic interface obtained from
//! [`open`]. The singleton context is reference-accounted: the first
//! successful create builds it, later creates attach to it, and it is torn
//! down when the last destroy releases it. Orchestrators hold per-context
//! client handles against the singleton and never own it.

use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashSet;
use spin::Mutex;

use basalt_core::error::{Error, LayoutError, Result};
use basalt_core::types::LayoutClientHandle;
use basalt_core::{GtSystemInfo, PlatformInfo, SkuTable, WaTable};

// =============================================================================
// INTERFACE VERSION
// =============================================================================

/// Version of the dynamic interface this build links against
pub const INTERFACE_VERSION: u32 = (4 << 16) | 2;

// =============================================================================
// CLIENT KIND
// =============================================================================

/// Kind of client attaching to the layout authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// Media/video pipeline client
    Media,
    /// 3D render client
    Render,
    /// Compute client
    Compute,
}

// =============================================================================
// PROCESS STATE
// =============================================================================

struct SingletonContext {
    platform: PlatformInfo,
    sku: SkuTable,
    wa: WaTable,
    gt: GtSystemInfo,
    /// Outstanding create/destroy pairs
    refs: u32,
    clients: HashSet<u64>,
}

static AUTHORITY: Mutex<Option<SingletonContext>> = Mutex::new(None);

/// Client ids are process-unique and never recycled, even across singleton
/// rebuilds.
static NEXT_CLIENT: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// DYNAMIC INTERFACE
// =============================================================================

/// Open the layout authority's dynamic interface
///
/// The version handshake stands in for resolving the interface from its
/// shared object; a mismatch is the only failure mode.
pub fn open() -> Result<LayoutInterface> {
    open_versioned(INTERFACE_VERSION)
}

/// Open a specific interface version
pub fn open_versioned(version: u32) -> Result<LayoutInterface> {
    if version != INTERFACE_VERSION {
        log::error!(
            "layout interface version mismatch: requested 0x{:08x}, have 0x{:08x}",
            version,
            INTERFACE_VERSION
        );
        return Err(Error::Layout(LayoutError::VersionMismatch));
    }
    Ok(LayoutInterface { _priv: () })
}

/// Function table of the layout authority
///
/// A cheap, copyable view; every call locks the process state internally,
/// so no additional serialization is required of callers.
#[derive(Clone, Copy, Debug)]
pub struct LayoutInterface {
    _priv: (),
}

impl LayoutInterface {
    /// Create (or attach to) the singleton layout context
    ///
    /// The first successful call builds the singleton from the supplied
    /// capability triple; subsequent calls attach to the existing singleton
    /// and bump its reference count. A topology that cannot back placement
    /// decisions is rejected.
    pub fn create_singleton_context(
        &self,
        platform: &PlatformInfo,
        sku: &SkuTable,
        wa: &WaTable,
        gt: &GtSystemInfo,
    ) -> Result<()> {
        let mut guard = AUTHORITY.lock();
        if let Some(ctx) = guard.as_mut() {
            ctx.refs += 1;
            log::debug!("layout singleton attached, refs={}", ctx.refs);
            return Ok(());
        }

        if !gt.is_populated() {
            log::error!("layout singleton rejected: unpopulated GT info");
            return Err(Error::AllocationFailed);
        }

        *guard = Some(SingletonContext {
            platform: *platform,
            sku: *sku,
            wa: *wa,
            gt: *gt,
            refs: 1,
            clients: HashSet::new(),
        });
        log::debug!("layout singleton created for {:?}", platform.product_family);
        Ok(())
    }

    /// Create a per-context client handle against the singleton
    ///
    /// Returns `None` when no singleton exists; callers publish the handle
    /// as-is and never treat its absence as fatal.
    pub fn create_client_context(&self, kind: ClientKind) -> Option<LayoutClientHandle> {
        let mut guard = AUTHORITY.lock();
        let ctx = guard.as_mut()?;
        let id = NEXT_CLIENT.fetch_add(1, Ordering::Relaxed);
        ctx.clients.insert(id);
        log::debug!("layout client {} created ({:?})", id, kind);
        Some(LayoutClientHandle::new(id))
    }

    /// Delete a per-context client handle
    pub fn delete_client_context(&self, handle: LayoutClientHandle) {
        let mut guard = AUTHORITY.lock();
        let Some(ctx) = guard.as_mut() else {
            log::warn!("layout client delete with no singleton");
            return;
        };
        if !ctx.clients.remove(&handle.id()) {
            log::warn!("layout client delete for unknown handle {:?}", handle);
        }
    }

    /// Release one reference on the singleton, destroying it at zero
    pub fn destroy_singleton_context(&self) {
        let mut guard = AUTHORITY.lock();
        let Some(ctx) = guard.as_mut() else {
            log::warn!("layout singleton destroy with no singleton");
            return;
        };
        ctx.refs = ctx.refs.saturating_sub(1);
        if ctx.refs == 0 {
            if !ctx.clients.is_empty() {
                log::warn!(
                    "layout singleton destroyed with {} live clients",
                    ctx.clients.len()
                );
            }
            *guard = None;
            log::debug!("layout singleton destroyed");
        } else {
            log::debug!("layout singleton detached, refs={}", ctx.refs);
        }
    }

    /// Capability snapshot the singleton was created from
    pub fn singleton_snapshot(
        &self,
    ) -> Option<(PlatformInfo, SkuTable, WaTable, GtSystemInfo)> {
        AUTHORITY
            .lock()
            .as_ref()
            .map(|ctx| (ctx.platform, ctx.sku, ctx.wa, ctx.gt))
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Whether the singleton currently exists
pub fn is_singleton_active() -> bool {
    AUTHORITY.lock().is_some()
}

/// Number of live client handles
pub fn active_client_count() -> usize {
    AUTHORITY.lock().as_ref().map_or(0, |ctx| ctx.clients.len())
}
