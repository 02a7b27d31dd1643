//! # Submission-Context Manager
//!
//! Manages the logical GPU execution contexts a device context submits
//! through. One manager exists per device context, obtained from a
//! process-wide registry and sized from the GT topology record.

use alloc::sync::Arc;

use hashbrown::HashMap;
use spin::Mutex;

use basalt_core::types::{ContextId, Handle};
use basalt_core::GtSystemInfo;

use crate::ContextParams;

// =============================================================================
// ENGINE NODES
// =============================================================================

/// Engine node a logical execution context binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineNode {
    /// 3D/render engine
    Render,
    /// Video decode engine
    VideoDecode,
    /// Video encode engine
    VideoEncode,
    /// Blit/copy engine
    Copy,
}

// =============================================================================
// HANDLES
// =============================================================================

/// Marker for logical execution contexts
pub struct SubmissionContextMarker;

/// Handle to a logical execution context
pub type SubmissionContextHandle = Handle<SubmissionContextMarker>;

// =============================================================================
// MANAGER
// =============================================================================

struct SubmitState {
    next_context: u64,
    contexts: HashMap<u64, EngineNode>,
}

/// Submission-context manager for one device context
pub struct SubmissionContextManager {
    gt: GtSystemInfo,
    max_contexts: u32,
    state: Mutex<SubmitState>,
}

static REGISTRY: Mutex<Option<HashMap<ContextId, Arc<SubmissionContextManager>>>> =
    Mutex::new(None);

impl SubmissionContextManager {
    /// Obtain (or reuse) the manager registered for a device context
    ///
    /// Returns `None` when the GT record cannot size execution contexts;
    /// the caller treats that as a fatal dependency failure.
    pub fn shared(
        gt: &GtSystemInfo,
        params: &ContextParams,
    ) -> Option<Arc<SubmissionContextManager>> {
        if !gt.is_populated() {
            log::error!("submission manager rejected unpopulated GT info");
            return None;
        }

        let mut registry = REGISTRY.lock();
        let map = registry.get_or_insert_with(HashMap::new);
        let mgr = map.entry(params.context_id).or_insert_with(|| {
            // One hardware thread per logical context keeps preemption cheap.
            let max_contexts = (gt.eu_count * gt.threads_per_eu).max(1);
            log::debug!(
                "submission manager created for {:?}, max={}",
                params.context_id,
                max_contexts
            );
            Arc::new(SubmissionContextManager {
                gt: *gt,
                max_contexts,
                state: Mutex::new(SubmitState {
                    next_context: 1,
                    contexts: HashMap::new(),
                }),
            })
        });
        Some(Arc::clone(mgr))
    }

    /// Create a logical execution context on an engine node
    pub fn create_context(&self, node: EngineNode) -> Option<SubmissionContextHandle> {
        let mut state = self.state.lock();
        if state.contexts.len() as u32 >= self.max_contexts {
            log::warn!("execution context limit {} reached", self.max_contexts);
            return None;
        }
        let id = state.next_context;
        state.next_context += 1;
        state.contexts.insert(id, node);
        Some(SubmissionContextHandle::new(id))
    }

    /// Destroy a logical execution context
    pub fn destroy_context(&self, handle: SubmissionContextHandle) {
        let mut state = self.state.lock();
        if state.contexts.remove(&handle.id()).is_none() {
            log::warn!("destroy for unknown execution context {:?}", handle);
        }
    }

    /// GT record the manager was sized from
    pub fn gt_info(&self) -> &GtSystemInfo {
        &self.gt
    }

    /// Number of live execution contexts
    pub fn context_count(&self) -> usize {
        self.state.lock().contexts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_core::types::DeviceFd;

    fn gt() -> GtSystemInfo {
        GtSystemInfo {
            eu_count: 8,
            threads_per_eu: 7,
            slice_count: 1,
            subslice_count: 1,
            max_slices_supported: 1,
            max_eu_per_subslice: 8,
            l3_cache_size_kib: 768,
            llc_size_kib: 0,
        }
    }

    fn params() -> ContextParams {
        ContextParams {
            context_id: ContextId::next(),
            fd: DeviceFd::new(4),
            gt: gt(),
            uses_patch_list: true,
            uses_gfx_address: false,
        }
    }

    #[test]
    fn test_shared_reuses_per_context_manager() {
        let p = params();
        let a = SubmissionContextManager::shared(&gt(), &p).unwrap();
        let b = SubmissionContextManager::shared(&gt(), &p).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.gt_info().eu_count, 8);
    }

    #[test]
    fn test_unpopulated_gt_is_unobtainable() {
        assert!(SubmissionContextManager::shared(&GtSystemInfo::default(), &params()).is_none());
    }

    #[test]
    fn test_context_lifecycle() {
        let mgr = SubmissionContextManager::shared(&gt(), &params()).unwrap();
        let render = mgr.create_context(EngineNode::Render).unwrap();
        let decode = mgr.create_context(EngineNode::VideoDecode).unwrap();
        assert_ne!(render, decode);
        assert_eq!(mgr.context_count(), 2);
        mgr.destroy_context(render);
        mgr.destroy_context(decode);
        assert_eq!(mgr.context_count(), 0);
    }
}
