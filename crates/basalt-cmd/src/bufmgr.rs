//! # Command-Buffer Manager
//!
//! Shared pool of recycled command buffers. One process-wide manager serves
//! every device context; each context registers itself with `initialize`
//! and draws buffers from its own recycle list.

use alloc::sync::Arc;

use arrayvec::ArrayVec;
use hashbrown::HashMap;
use spin::{Mutex, Once};

use basalt_core::error::{Error, Result};
use basalt_core::types::{ByteSize, ContextId, Handle};

use crate::ContextParams;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Full command-buffer size; contexts initialize the pool with half of it
pub const COMMAND_BUFFER_SIZE: ByteSize = ByteSize::from_kib(32);

/// Recycle list depth per context
const POOL_DEPTH: usize = 16;

// =============================================================================
// HANDLES
// =============================================================================

/// Marker for pooled command buffers
pub struct CommandBufferMarker;

/// Handle to a pooled command buffer
pub type CommandBufferHandle = Handle<CommandBufferMarker>;

// =============================================================================
// MANAGER
// =============================================================================

struct ContextPool {
    buf_size: ByteSize,
    next_buf: u64,
    free: ArrayVec<CommandBufferHandle, POOL_DEPTH>,
    outstanding: u32,
}

/// Process-shared command-buffer manager
pub struct CmdBufManager {
    pools: Mutex<HashMap<ContextId, ContextPool>>,
}

static SHARED: Once<Arc<CmdBufManager>> = Once::new();

impl CmdBufManager {
    /// Obtain the shared manager
    pub fn shared() -> Option<Arc<CmdBufManager>> {
        Some(Arc::clone(SHARED.call_once(|| {
            Arc::new(CmdBufManager {
                pools: Mutex::new(HashMap::new()),
            })
        })))
    }

    /// Register a context with the manager
    ///
    /// Re-registering an id resets its pool, which is what a re-initialized
    /// context wants. A zero buffer size cannot back a pool.
    pub fn initialize(&self, params: &ContextParams, buf_size: ByteSize) -> Result<()> {
        if buf_size == ByteSize::ZERO {
            log::error!("command-buffer pool rejected zero buffer size");
            return Err(Error::InitializationFailed);
        }
        if !params.fd.is_valid() {
            log::error!("command-buffer pool rejected {:?}", params.fd);
            return Err(Error::InitializationFailed);
        }

        let mut pools = self.pools.lock();
        pools.insert(
            params.context_id,
            ContextPool {
                buf_size,
                next_buf: 1,
                free: ArrayVec::new(),
                outstanding: 0,
            },
        );
        log::debug!(
            "command-buffer pool ready for {:?}, buf={:?}",
            params.context_id,
            buf_size
        );
        Ok(())
    }

    /// Acquire a command buffer, recycling before allocating
    pub fn acquire(&self, context: ContextId) -> Option<CommandBufferHandle> {
        let mut pools = self.pools.lock();
        let pool = pools.get_mut(&context)?;
        let handle = pool.free.pop().unwrap_or_else(|| {
            let h = CommandBufferHandle::new(pool.next_buf);
            pool.next_buf += 1;
            h
        });
        pool.outstanding += 1;
        Some(handle)
    }

    /// Return a command buffer to the recycle list
    ///
    /// Buffers past the recycle depth are retired instead of pooled.
    pub fn release(&self, context: ContextId, handle: CommandBufferHandle) {
        let mut pools = self.pools.lock();
        let Some(pool) = pools.get_mut(&context) else {
            log::warn!("command-buffer release for unregistered {:?}", context);
            return;
        };
        pool.outstanding = pool.outstanding.saturating_sub(1);
        if pool.free.try_push(handle).is_err() {
            log::debug!("recycle list full, retiring {:?}", handle);
        }
    }

    /// Buffer size the context registered with
    pub fn buffer_size(&self, context: ContextId) -> Option<ByteSize> {
        self.pools.lock().get(&context).map(|p| p.buf_size)
    }

    /// Buffers currently handed out for a context
    pub fn outstanding(&self, context: ContextId) -> u32 {
        self.pools.lock().get(&context).map_or(0, |p| p.outstanding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_core::types::DeviceFd;
    use basalt_core::GtSystemInfo;

    fn params() -> ContextParams {
        ContextParams {
            context_id: ContextId::next(),
            fd: DeviceFd::new(4),
            gt: GtSystemInfo::default(),
            uses_patch_list: true,
            uses_gfx_address: false,
        }
    }

    #[test]
    fn test_shared_identity() {
        let a = CmdBufManager::shared().unwrap();
        let b = CmdBufManager::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_initialize_rejects_zero_size() {
        let mgr = CmdBufManager::shared().unwrap();
        let err = mgr.initialize(&params(), ByteSize::ZERO).unwrap_err();
        assert_eq!(err, Error::InitializationFailed);
    }

    #[test]
    fn test_acquire_recycles_released_buffers() {
        let mgr = CmdBufManager::shared().unwrap();
        let p = params();
        mgr.initialize(&p, COMMAND_BUFFER_SIZE.halved()).unwrap();
        assert_eq!(
            mgr.buffer_size(p.context_id),
            Some(ByteSize::from_kib(16))
        );

        let first = mgr.acquire(p.context_id).unwrap();
        mgr.release(p.context_id, first);
        let second = mgr.acquire(p.context_id).unwrap();
        assert_eq!(first, second);
        assert_eq!(mgr.outstanding(p.context_id), 1);
    }

    #[test]
    fn test_acquire_requires_registration() {
        let mgr = CmdBufManager::shared().unwrap();
        assert!(mgr.acquire(ContextId::next()).is_none());
    }
}
