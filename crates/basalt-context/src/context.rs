//! # Bring-Up Orchestrator
//!
//! `OsContext` owns the per-device shared state and drives the ordered
//! bring-up and teardown that every later allocation and submission path
//! depends on.
//!
//! ## Bring-Up Sequence
//!
//! 1. Validity gate (re-entry while valid is a success no-op)
//! 2. Buffer allocator acquisition + reuse enable
//! 3. Device identification, SoC classification
//! 4. Capability resolution (real probe or staged simulation tables)
//! 5. Workaround override, user settings, trace info
//! 6. Layout-authority singleton + per-context client handle
//! 7. Aux-table manager (optional)
//! 8. Feature-flag derivation and the publish step
//! 9. Subsystem managers (command buffers, submission contexts)
//! 10. Media services (decompression, copy)
//!
//! ## Failure Semantics
//!
//! The first fatal error aborts the sequence; nothing is rolled back. A
//! failure before the validity flip leaves at most the buffer manager and
//! aux-table manager acquired, and both are reclaimed when the abandoned
//! instance is dropped. The layout singleton is never left created with
//! validity false: every step between its creation and the flip is
//! infallible. A failure after the flip (subsystem managers, media
//! services) leaves the context valid, and `destroy` recovers it.

use alloc::sync::Arc;

use basalt_core::error::{Error, Result};
use basalt_core::settings;
use basalt_core::trace::{self, TraceSetupInfo};
use basalt_core::types::{
    ByteSize, ContextId, DeviceFd, DeviceId, LayoutClientHandle,
};
use basalt_core::{GtSystemInfo, PlatformInfo, SkuTable, WaTable};
use basalt_cmd::{CmdBufManager, ContextParams, SubmissionContextManager, COMMAND_BUFFER_SIZE};
use basalt_hal::{BufferManager, HardwareBackend};
use basalt_mem::layout;
use basalt_mem::{AuxTableManager, ClientKind};

#[cfg(feature = "decompress")]
use crate::media::DecompressionState;
use crate::media::MediaCopyState;
use crate::device::DeviceContext;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Fixed batch-buffer size handed to the allocator
const BATCH_BUFFER_SIZE: ByteSize = ByteSize::from_bytes(0x8_0000);

/// Driver interface version published to trace consumers
const DRIVER_API_MAJOR: u32 = 1;
const DRIVER_API_MINOR: u32 = 20;

// =============================================================================
// PUBLISHED STATE
// =============================================================================

/// Immutable result record of a bring-up pass
///
/// Computed internally, then written into the device context in one step.
/// Covers the fields the orchestrator owns; the media services publish
/// their own state handles at acquisition time.
struct PublishedState {
    /// Probe results propagate; staged simulation values are preserved
    write_probe_results: bool,
    device_id: DeviceId,
    platform: PlatformInfo,
    sku: SkuTable,
    wa: WaTable,
    gt: GtSystemInfo,
    sim_active: bool,
    layout_client: Option<LayoutClientHandle>,
    aux_table: Option<Arc<AuxTableManager>>,
    use_sw_swizzle: bool,
    tile_y: bool,
    is_integrated_soc: bool,
    context_id: ContextId,
}

impl PublishedState {
    fn write_to(&self, dev: &mut DeviceContext) {
        if self.write_probe_results {
            dev.device_id = self.device_id;
            dev.platform = self.platform;
            dev.sku = self.sku;
            dev.wa = self.wa;
            dev.gt = self.gt;
        }
        dev.sim_active = self.sim_active;
        dev.layout_client = self.layout_client;
        dev.aux_table = self.aux_table.clone();
        dev.use_sw_swizzle = self.use_sw_swizzle;
        dev.tile_y = self.tile_y;
        dev.is_integrated_soc = self.is_integrated_soc;
        dev.os_context = Some(self.context_id);
    }
}

// =============================================================================
// OS CONTEXT
// =============================================================================

/// Per-device shared context orchestrator
///
/// Constructed empty against a hardware backend, populated exactly once by
/// [`init`](Self::init) while invalid, released by
/// [`destroy`](Self::destroy). `init` and `destroy` are not locked; callers
/// serialize access to one instance.
pub struct OsContext {
    valid: bool,
    id: ContextId,
    backend: Arc<dyn HardwareBackend>,
    fd: DeviceFd,
    device_id: DeviceId,
    is_integrated_soc: bool,
    sku: SkuTable,
    wa: WaTable,
    platform: PlatformInfo,
    gt: GtSystemInfo,
    bufmgr: Option<Arc<dyn BufferManager>>,
    layout_client: Option<LayoutClientHandle>,
    aux_table: Option<Arc<AuxTableManager>>,
    use_sw_swizzle: bool,
    tile_y: bool,
    use_64bit_relocs: bool,
    uses_patch_list: bool,
    uses_gfx_address: bool,
    cmd_buf_mgr: Option<Arc<CmdBufManager>>,
    submission_mgr: Option<Arc<SubmissionContextManager>>,
    #[cfg(feature = "decompress")]
    decompression: Option<DecompressionState>,
    media_copy: Option<MediaCopyState>,
}

impl OsContext {
    /// Construct an empty, invalid context against a backend
    pub fn new(backend: Arc<dyn HardwareBackend>) -> Self {
        Self {
            valid: false,
            id: ContextId::next(),
            backend,
            fd: DeviceFd::default(),
            device_id: DeviceId::default(),
            is_integrated_soc: false,
            sku: SkuTable::empty(),
            wa: WaTable::empty(),
            platform: PlatformInfo::default(),
            gt: GtSystemInfo::default(),
            bufmgr: None,
            layout_client: None,
            aux_table: None,
            use_sw_swizzle: false,
            tile_y: false,
            use_64bit_relocs: false,
            uses_patch_list: false,
            uses_gfx_address: false,
            cmd_buf_mgr: None,
            submission_mgr: None,
            #[cfg(feature = "decompress")]
            decompression: None,
            media_copy: None,
        }
    }

    /// Bring the context up against a caller-supplied device context
    ///
    /// Idempotent: a valid context returns success immediately with no side
    /// effects. See the module docs for the sequence and the partial-init
    /// semantics on failure.
    pub fn init(&mut self, dev: &mut DeviceContext) -> Result<()> {
        if self.valid {
            return Ok(());
        }

        // Validity gate on the caller's descriptor.
        if !dev.fd.is_valid() {
            log::error!("init rejected {:?}", dev.fd);
            return Err(Error::InvalidHandle);
        }
        self.fd = dev.fd;

        // Buffer allocator, bound to the descriptor with the fixed batch
        // size, with allocator-side object reuse.
        let bufmgr = self
            .backend
            .open_buffer_manager(self.fd, BATCH_BUFFER_SIZE)
            .ok_or_else(|| {
                log::error!("buffer manager unavailable, fd={:?}", self.fd);
                Error::AllocationFailed
            })?;
        bufmgr.enable_reuse();

        let mut device_id = bufmgr.device_id();
        self.is_integrated_soc = device_id.is_integrated_soc();

        // Capability state starts from a clean slate on every pass.
        self.sku.reset();
        self.wa.reset();
        self.platform = PlatformInfo::default();
        self.gt = GtSystemInfo::default();

        if self.backend.is_simulation() {
            self.platform = dev.platform;
            self.sku = dev.sku;
            self.wa = dev.wa;
            self.gt = dev.gt;
            device_id = dev.device_id;
        } else {
            let gfx = self
                .backend
                .probe_gfx_info(self.fd, bufmgr.as_ref())
                .inspect_err(|_| {
                    log::error!("fatal: sku/wa/gt discovery failed");
                })?;
            self.platform = gfx.platform;
            self.sku = gfx.sku;
            self.wa = gfx.wa;
            self.gt = gfx.gt;
        }
        self.device_id = device_id;
        self.bufmgr = Some(Arc::clone(&bufmgr));

        // Without media kernels the HuC must stay in stream-out-only mode.
        if !self.sku.contains(SkuTable::MEDIA_KERNELS) {
            self.wa.insert(WaTable::HUC_STREAMOUT_DISABLE);
        }

        settings::init(self.platform.product_family);

        trace::setup_info(TraceSetupInfo {
            interface_version: (DRIVER_API_MAJOR << 16) | DRIVER_API_MINOR,
            product_family: self.platform.product_family,
            render_family: self.platform.render_family,
            packed_device: ((self.platform.rev_id as u32) << 16) | self.platform.device_id as u32,
        });

        // The layout authority gets its own capability triple, independent
        // of the context-local tables and their overrides.
        let layout_probe = self.backend.probe_layout_info(self.fd).inspect_err(|_| {
            log::error!("fatal: layout sku/wa/gt discovery failed");
        })?;

        let iface = layout::open().inspect_err(|_| {
            log::error!("fatal: layout interface unavailable");
        })?;
        iface
            .create_singleton_context(
                &self.platform,
                &layout_probe.sku,
                &layout_probe.wa,
                &layout_probe.gt,
            )
            .inspect_err(|_| {
                log::error!("fatal: layout singleton creation failed");
            })?;
        self.layout_client = iface.create_client_context(ClientKind::Media);

        self.aux_table = AuxTableManager::create(&bufmgr, &self.sku);

        // Simulation toggle is a debug/internal-build setting only.
        let mut sim_active = false;
        #[cfg(any(debug_assertions, feature = "internal"))]
        {
            sim_active = settings::read_value(settings::SettingId::SimEnable).unwrap_or(0) != 0;
        }

        self.use_sw_swizzle = sim_active || self.sku.contains(SkuTable::SW_SWIZZLE);
        self.tile_y = self.sku.contains(SkuTable::TILE_Y);
        self.use_64bit_relocs = true;

        PublishedState {
            write_probe_results: !self.backend.is_simulation(),
            device_id: self.device_id,
            platform: self.platform,
            sku: self.sku,
            wa: self.wa,
            gt: self.gt,
            sim_active,
            layout_client: self.layout_client,
            aux_table: self.aux_table.clone(),
            use_sw_swizzle: self.use_sw_swizzle,
            tile_y: self.tile_y,
            is_integrated_soc: self.is_integrated_soc,
            context_id: self.id,
        }
        .write_to(dev);

        self.uses_patch_list = true;
        self.uses_gfx_address = false;

        self.valid = true;

        // Subsystem managers require a valid context and outlive it.
        let params = ContextParams {
            context_id: self.id,
            fd: self.fd,
            gt: self.gt,
            uses_patch_list: self.uses_patch_list,
            uses_gfx_address: self.uses_gfx_address,
        };

        let cmd_buf_mgr = CmdBufManager::shared().ok_or_else(|| {
            log::error!("fatal: command-buffer manager unobtainable");
            Error::DependencyUnavailable
        })?;
        cmd_buf_mgr.initialize(&params, COMMAND_BUFFER_SIZE.halved())?;
        self.cmd_buf_mgr = Some(cmd_buf_mgr);

        let submission_mgr =
            SubmissionContextManager::shared(&self.gt, &params).ok_or_else(|| {
                log::error!("fatal: submission-context manager unobtainable");
                Error::DependencyUnavailable
            })?;
        self.submission_mgr = Some(submission_mgr);

        #[cfg(feature = "decompress")]
        {
            let decompression = DecompressionState::new(dev);
            dev.decomp_state = decompression.state_handle();
            if dev.decomp_state.is_none() {
                log::debug!("decompression state creation failed");
            }
            self.decompression = Some(decompression);
        }

        let media_copy = MediaCopyState::new(dev);
        dev.copy_state = media_copy.state_handle();
        if dev.copy_state.is_none() {
            log::error!("media copy state creation failed");
            debug_assert!(dev.copy_state.is_some(), "media copy state missing");
        }
        self.media_copy = Some(media_copy);

        Ok(())
    }

    /// Tear the context down in last-acquired-first-released order
    ///
    /// Idempotent: a no-op unless valid. Tolerates any partially-populated
    /// state; every release is presence-guarded. Subsystem managers and
    /// media services are not torn down here, their lifetime is
    /// independently owned.
    pub fn destroy(&mut self) {
        if !self.valid {
            return;
        }

        self.aux_table = None;

        self.sku.reset();
        self.wa.reset();

        self.bufmgr = None;

        match layout::open() {
            Ok(iface) => {
                if let Some(client) = self.layout_client.take() {
                    iface.delete_client_context(client);
                }
                iface.destroy_singleton_context();
            }
            Err(e) => {
                log::error!("layout interface reopen failed during teardown: {}", e);
            }
        }

        self.valid = false;
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Whether the context has been brought up
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Process-unique id of this instance
    pub fn context_id(&self) -> ContextId {
        self.id
    }

    /// Resolved device identifier
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Device is an integrated SoC variant
    pub fn is_integrated_soc(&self) -> bool {
        self.is_integrated_soc
    }

    /// Feature table
    pub fn sku(&self) -> &SkuTable {
        &self.sku
    }

    /// Workaround table
    pub fn wa(&self) -> &WaTable {
        &self.wa
    }

    /// Platform identification record
    pub fn platform_info(&self) -> &PlatformInfo {
        &self.platform
    }

    /// GT topology record
    pub fn gt_info(&self) -> &GtSystemInfo {
        &self.gt
    }

    /// Owned buffer manager
    pub fn buffer_manager(&self) -> Option<&Arc<dyn BufferManager>> {
        self.bufmgr.as_ref()
    }

    /// Per-context layout-authority client handle
    pub fn layout_client(&self) -> Option<LayoutClientHandle> {
        self.layout_client
    }

    /// Owned aux-table manager
    pub fn aux_table_manager(&self) -> Option<&Arc<AuxTableManager>> {
        self.aux_table.as_ref()
    }

    /// Tiling must be resolved by software swizzling
    pub fn use_sw_swizzle(&self) -> bool {
        self.use_sw_swizzle
    }

    /// Y-major tiling supported
    pub fn tile_y(&self) -> bool {
        self.tile_y
    }

    /// Relocations carry 64-bit addresses
    pub fn use_64bit_relocs(&self) -> bool {
        self.use_64bit_relocs
    }

    /// Context submits with patch lists
    pub fn uses_patch_list(&self) -> bool {
        self.uses_patch_list
    }

    /// Context submits with pre-resolved graphics addresses
    pub fn uses_gfx_address(&self) -> bool {
        self.uses_gfx_address
    }

    /// Acquired command-buffer manager
    pub fn command_buffer_manager(&self) -> Option<&Arc<CmdBufManager>> {
        self.cmd_buf_mgr.as_ref()
    }

    /// Acquired submission-context manager
    pub fn submission_manager(&self) -> Option<&Arc<SubmissionContextManager>> {
        self.submission_mgr.as_ref()
    }

    /// Constructed decompression service
    #[cfg(feature = "decompress")]
    pub fn decompression(&self) -> Option<&DecompressionState> {
        self.decompression.as_ref()
    }

    /// Constructed media-copy service
    pub fn media_copy(&self) -> Option<&MediaCopyState> {
        self.media_copy.as_ref()
    }
}

impl Drop for OsContext {
    fn drop(&mut self) {
        if self.valid {
            log::warn!("os context {:?} dropped while valid", self.id);
        }
    }
}

static_assertions::assert_impl_all!(OsContext: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_core::settings::SettingId;
    use basalt_core::types::ProductFamily;
    use basalt_hal::{DeviceIdentity, DrmBackend, GfxProbe, LayoutProbe, NullBackend};
    use basalt_mem::layout::{active_client_count, is_singleton_active};
    use spin::Mutex;

    // Bring-up touches process-wide state (layout authority, settings,
    // manager registries); tests that run the sequence are serialized.
    static TEST_GATE: Mutex<()> = Mutex::new(());

    fn populated_gt() -> GtSystemInfo {
        GtSystemInfo {
            eu_count: 96,
            threads_per_eu: 7,
            slice_count: 1,
            subslice_count: 6,
            max_slices_supported: 1,
            max_eu_per_subslice: 16,
            l3_cache_size_kib: 3840,
            llc_size_kib: 8192,
        }
    }

    fn sim_platform() -> PlatformInfo {
        PlatformInfo {
            product_family: ProductFamily::Gen12,
            render_family: basalt_core::types::RenderFamily::Gen12,
            device_id: 0x9A49,
            rev_id: 3,
        }
    }

    fn sim_device(fd: i32, sku: SkuTable, wa: WaTable) -> DeviceContext {
        DeviceContext::with_simulated_tables(
            DeviceFd::new(fd),
            DeviceId::new(0x9A49),
            sim_platform(),
            sku,
            wa,
            populated_gt(),
        )
    }

    fn null_backend() -> Arc<dyn HardwareBackend> {
        Arc::new(NullBackend::new(
            DeviceId::new(0x9A49),
            LayoutProbe {
                sku: SkuTable::empty(),
                wa: WaTable::empty(),
                gt: populated_gt(),
            },
        ))
    }

    /// Backend double recording the order of hardware calls.
    struct RecordingBackend {
        calls: Mutex<alloc::vec::Vec<&'static str>>,
        fail_open: bool,
        layout_gt: GtSystemInfo,
    }

    impl RecordingBackend {
        fn new(fail_open: bool, layout_gt: GtSystemInfo) -> Self {
            Self {
                calls: Mutex::new(alloc::vec::Vec::new()),
                fail_open,
                layout_gt,
            }
        }
    }

    impl HardwareBackend for RecordingBackend {
        fn open_buffer_manager(
            &self,
            fd: DeviceFd,
            batch_size: ByteSize,
        ) -> Option<Arc<dyn BufferManager>> {
            self.calls.lock().push("open_buffer_manager");
            if self.fail_open {
                return None;
            }
            DrmBackend::new(DeviceIdentity {
                device_id: DeviceId::new(0x9A49),
                rev_id: 1,
            })
            .open_buffer_manager(fd, batch_size)
        }

        fn probe_gfx_info(
            &self,
            fd: DeviceFd,
            bufmgr: &dyn BufferManager,
        ) -> basalt_core::Result<GfxProbe> {
            self.calls.lock().push("probe_gfx_info");
            DrmBackend::new(DeviceIdentity {
                device_id: DeviceId::new(0x9A49),
                rev_id: 1,
            })
            .probe_gfx_info(fd, bufmgr)
        }

        fn probe_layout_info(&self, _fd: DeviceFd) -> basalt_core::Result<LayoutProbe> {
            self.calls.lock().push("probe_layout_info");
            Ok(LayoutProbe {
                sku: SkuTable::empty(),
                wa: WaTable::empty(),
                gt: self.layout_gt,
            })
        }
    }

    #[test]
    fn test_invalid_descriptor_fails_before_any_hardware_call() {
        let backend = Arc::new(RecordingBackend::new(false, populated_gt()));
        let mut ctx = OsContext::new(backend.clone());

        let mut dev = DeviceContext::new(DeviceFd::new(0));
        assert_eq!(ctx.init(&mut dev).unwrap_err(), Error::InvalidHandle);
        let mut dev = DeviceContext::new(DeviceFd::new(-3));
        assert_eq!(ctx.init(&mut dev).unwrap_err(), Error::InvalidHandle);

        assert!(backend.calls.lock().is_empty());
        assert!(!ctx.is_valid());
        assert!(dev.os_context.is_none());
    }

    #[test]
    fn test_allocator_failure_precedes_capability_probe() {
        let _gate = TEST_GATE.lock();
        let backend = Arc::new(RecordingBackend::new(true, populated_gt()));
        let mut ctx = OsContext::new(backend.clone());

        let mut dev = DeviceContext::new(DeviceFd::new(4));
        assert_eq!(ctx.init(&mut dev).unwrap_err(), Error::AllocationFailed);

        let calls = backend.calls.lock();
        assert_eq!(*calls, ["open_buffer_manager"]);
        assert!(!ctx.is_valid());
    }

    #[test]
    fn test_singleton_failure_creates_no_client_and_no_managers() {
        let _gate = TEST_GATE.lock();
        // Layout probe delivers a triple the authority must reject.
        let backend = Arc::new(RecordingBackend::new(false, GtSystemInfo::default()));
        let mut ctx = OsContext::new(backend);

        let mut dev = DeviceContext::new(DeviceFd::new(4));
        assert_eq!(ctx.init(&mut dev).unwrap_err(), Error::AllocationFailed);

        assert!(!ctx.is_valid());
        assert!(ctx.layout_client().is_none());
        assert!(ctx.command_buffer_manager().is_none());
        assert!(ctx.submission_manager().is_none());
        assert!(!is_singleton_active());
        assert_eq!(active_client_count(), 0);
    }

    #[test]
    fn test_init_is_idempotent() {
        let _gate = TEST_GATE.lock();
        settings::write_value(SettingId::SimEnable, 0);
        let mut ctx = OsContext::new(null_backend());
        let mut dev = sim_device(7, SkuTable::MEDIA_KERNELS | SkuTable::TILE_Y, WaTable::empty());

        ctx.init(&mut dev).unwrap();
        let client = dev.layout_client;
        let back_ref = dev.os_context;
        let sku = dev.sku;
        let clients_before = active_client_count();

        ctx.init(&mut dev).unwrap();
        assert_eq!(dev.layout_client, client);
        assert_eq!(dev.os_context, back_ref);
        assert_eq!(dev.sku, sku);
        assert_eq!(active_client_count(), clients_before);

        ctx.destroy();
        assert!(!is_singleton_active());
    }

    #[test]
    fn test_workaround_follows_sku_bit() {
        let _gate = TEST_GATE.lock();
        settings::write_value(SettingId::SimEnable, 0);

        // SKU bit set: workaround not applied.
        let mut ctx = OsContext::new(null_backend());
        let mut dev = sim_device(7, SkuTable::MEDIA_KERNELS, WaTable::empty());
        ctx.init(&mut dev).unwrap();
        assert!(!ctx.wa().contains(WaTable::HUC_STREAMOUT_DISABLE));
        ctx.destroy();

        // SKU bit clear: workaround applied.
        let mut ctx = OsContext::new(null_backend());
        let mut dev = sim_device(7, SkuTable::empty(), WaTable::empty());
        ctx.init(&mut dev).unwrap();
        assert!(ctx.wa().contains(WaTable::HUC_STREAMOUT_DISABLE));
        ctx.destroy();
        assert!(!is_singleton_active());
    }

    #[test]
    fn test_simulated_bring_up_scenario() {
        let _gate = TEST_GATE.lock();
        // Descriptor 7, staged tables without media kernels, sim toggle on.
        settings::write_value(SettingId::SimEnable, 1);
        let mut ctx = OsContext::new(null_backend());
        let mut dev = sim_device(7, SkuTable::TILE_Y, WaTable::empty());

        ctx.init(&mut dev).unwrap();
        assert!(ctx.is_valid());
        assert!(ctx.wa().contains(WaTable::HUC_STREAMOUT_DISABLE));
        assert!(ctx.use_sw_swizzle());
        assert!(dev.use_sw_swizzle);
        assert!(ctx.tile_y());
        assert!(dev.sim_active);
        // Staged values are preserved on the simulation path.
        assert_eq!(dev.device_id, DeviceId::new(0x9A49));
        assert_eq!(dev.os_context, Some(ctx.context_id()));
        assert!(dev.copy_state.is_some());
        assert!(ctx.uses_patch_list());
        assert!(!ctx.uses_gfx_address());
        assert!(ctx.use_64bit_relocs());

        ctx.destroy();
        settings::write_value(SettingId::SimEnable, 0);
        assert!(!is_singleton_active());
    }

    #[test]
    fn test_destroy_round_trip_repopulates() {
        let _gate = TEST_GATE.lock();
        settings::write_value(SettingId::SimEnable, 0);
        let mut ctx = OsContext::new(null_backend());
        let mut dev = sim_device(
            7,
            SkuTable::MEDIA_KERNELS | SkuTable::E2E_COMPRESSION,
            WaTable::empty(),
        );

        ctx.init(&mut dev).unwrap();
        assert!(ctx.is_valid());
        assert!(ctx.aux_table_manager().is_some());
        let first_client = ctx.layout_client().unwrap();

        ctx.destroy();
        assert!(!ctx.is_valid());
        assert!(ctx.aux_table_manager().is_none());
        assert!(ctx.layout_client().is_none());
        assert!(ctx.buffer_manager().is_none());
        assert!(ctx.sku().is_empty());
        assert!(!is_singleton_active());
        // Managers stay acquired; their lifetime is independently owned.
        assert!(ctx.command_buffer_manager().is_some());

        ctx.init(&mut dev).unwrap();
        assert!(ctx.is_valid());
        assert!(ctx.aux_table_manager().is_some());
        assert_ne!(ctx.layout_client().unwrap(), first_client);
        assert!(is_singleton_active());

        ctx.destroy();
        assert!(!is_singleton_active());
    }

    #[test]
    fn test_two_contexts_share_the_singleton() {
        let _gate = TEST_GATE.lock();
        settings::write_value(SettingId::SimEnable, 0);
        let mut first = OsContext::new(null_backend());
        let mut second = OsContext::new(null_backend());
        let mut dev_a = sim_device(7, SkuTable::MEDIA_KERNELS, WaTable::empty());
        let mut dev_b = sim_device(9, SkuTable::MEDIA_KERNELS, WaTable::empty());

        first.init(&mut dev_a).unwrap();
        second.init(&mut dev_b).unwrap();
        assert_ne!(first.context_id(), second.context_id());
        assert_ne!(first.layout_client(), second.layout_client());
        assert_eq!(active_client_count(), 2);

        first.destroy();
        assert!(is_singleton_active());
        assert_eq!(active_client_count(), 1);

        second.destroy();
        assert!(!is_singleton_active());
    }

    #[test]
    fn test_destroy_tolerates_uninitialized_instance() {
        let mut ctx = OsContext::new(null_backend());
        ctx.destroy();
        ctx.destroy();
        assert!(!ctx.is_valid());
    }

    #[test]
    fn test_real_probe_publishes_discovered_tables() {
        let _gate = TEST_GATE.lock();
        settings::write_value(SettingId::SimEnable, 0);
        let backend = Arc::new(DrmBackend::new(DeviceIdentity {
            device_id: DeviceId::new(0x9A49),
            rev_id: 1,
        }));
        let mut ctx = OsContext::new(backend);
        let mut dev = DeviceContext::new(DeviceFd::new(4));

        ctx.init(&mut dev).unwrap();
        assert_eq!(dev.platform.product_family, ProductFamily::Gen12);
        assert!(dev.sku.contains(SkuTable::E2E_COMPRESSION));
        assert!(dev.aux_table.is_some());
        assert!(!dev.sim_active);
        assert!(!dev.use_sw_swizzle);
        assert!(!dev.tile_y);
        assert!(!dev.is_integrated_soc);
        assert!(dev.gt.is_populated());
        assert!(dev.decomp_state.is_some() || cfg!(not(feature = "decompress")));

        let bufmgr = ctx.buffer_manager().unwrap();
        assert!(bufmgr.reuse_enabled());

        ctx.destroy();
        assert!(!is_singleton_active());
    }
}
