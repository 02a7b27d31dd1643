//! # BASALT Core Types
//!
//! Fundamental type definitions used across the entire bring-up stack.
//!
//! These types provide:
//! - Strong typing for device descriptors and hardware identifiers
//! - Opaque, type-safe handles for published state
//! - Size guarantees for allocator parameters

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// DEVICE FILE DESCRIPTOR
// =============================================================================

/// Device file descriptor
///
/// Wraps the raw descriptor handed in by the caller's device context.
/// A descriptor is only considered usable when strictly positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct DeviceFd(i32);

impl DeviceFd {
    /// Create from a raw descriptor
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Get the raw descriptor value
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Check whether the descriptor passes the validity gate
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Debug for DeviceFd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceFd({})", self.0)
    }
}

// =============================================================================
// DEVICE IDENTIFIER
// =============================================================================

/// GPU device identifier as reported by the buffer manager
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct DeviceId(u32);

impl DeviceId {
    /// Create from a raw device id
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw device id
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Classify whether this identifier names an integrated SoC variant
    ///
    /// SoC parts share the media engine with the CPU package and use a
    /// dedicated id block per family.
    pub const fn is_integrated_soc(self) -> bool {
        let block = (self.0 >> 8) & 0xFF;
        matches!(block, 0x22 | 0x31 | 0x4E)
    }

    /// Determine the product family from the id block
    pub const fn product_family(self) -> ProductFamily {
        let block = (self.0 >> 8) & 0xFF;
        match block {
            0x19 | 0x22 => ProductFamily::Gen9,
            0x31 | 0x8A => ProductFamily::Gen11,
            0x4C | 0x4E | 0x9A => ProductFamily::Gen12,
            _ => ProductFamily::Unknown,
        }
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId(0x{:04x})", self.0)
    }
}

// =============================================================================
// PRODUCT / RENDER FAMILY
// =============================================================================

/// Silicon product family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u32)]
pub enum ProductFamily {
    /// Unknown/unsupported family
    #[default]
    Unknown = 0,
    /// Gen9 graphics
    Gen9 = 9,
    /// Gen11 graphics
    Gen11 = 11,
    /// Gen12 graphics
    Gen12 = 12,
}

/// Render core family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum RenderFamily {
    /// Unknown render core
    #[default]
    Unknown = 0,
    /// Gen9 render core
    Gen9 = 9,
    /// Gen11 render core
    Gen11 = 11,
    /// Gen12 render core
    Gen12 = 12,
}

// =============================================================================
// CONTEXT IDENTIFIER
// =============================================================================

/// Next context ID
static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of an orchestrator instance
///
/// Published into the device context as the back-reference to the owning
/// `OsContext`, in place of a raw pointer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocate the next process-unique id
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

// =============================================================================
// SIZE TYPE
// =============================================================================

/// Size in bytes (for allocator and pool parameters)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ByteSize(u64);

impl ByteSize {
    /// Zero size
    pub const ZERO: Self = Self(0);

    /// Create from bytes
    #[inline]
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Create from KiB
    #[inline]
    pub const fn from_kib(kib: u64) -> Self {
        Self(kib * 1024)
    }

    /// Get as bytes
    #[inline]
    pub const fn as_bytes(self) -> u64 {
        self.0
    }

    /// Halve the size (command-buffer managers initialize with half the
    /// configured buffer size)
    #[inline]
    pub const fn halved(self) -> Self {
        Self(self.0 / 2)
    }
}

impl fmt::Debug for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 1024 * 1024 {
            write!(f, "{} MiB", self.0 / (1024 * 1024))
        } else if self.0 >= 1024 {
            write!(f, "{} KiB", self.0 / 1024)
        } else {
            write!(f, "{} B", self.0)
        }
    }
}

// =============================================================================
// HANDLE TYPES
// =============================================================================

/// Opaque handle to published subsystem state
///
/// Handles are type-safe wrappers that prevent mixing different resource
/// types across the device-context exchange surface.
#[repr(transparent)]
pub struct Handle<T> {
    id: u64,
    _marker: core::marker::PhantomData<T>,
}

// Manual impls: the marker parameter is phantom, so none of these should
// require bounds on T.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> core::hash::Hash for Handle<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Handle<T> {
    /// Create a new handle
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _marker: core::marker::PhantomData,
        }
    }

    /// Create a null handle
    #[inline]
    pub const fn null() -> Self {
        Self::new(0)
    }

    /// Get the raw ID
    #[inline]
    pub const fn id(self) -> u64 {
        self.id
    }

    /// Check if null
    #[inline]
    pub const fn is_null(self) -> bool {
        self.id == 0
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle<{}>(0x{:x})",
            core::any::type_name::<T>(),
            self.id
        )
    }
}

// Marker types for handles
/// Marker for layout-authority client handles
pub struct LayoutClientMarker;
/// Marker for media service state handles
pub struct MediaStateMarker;

/// Handle to a per-context layout-authority client
pub type LayoutClientHandle = Handle<LayoutClientMarker>;
/// Handle to a media service's externally visible state
pub type MediaStateHandle = Handle<MediaStateMarker>;

// =============================================================================
// STATIC ASSERTIONS
// =============================================================================

// Ensure key types are Send + Sync
static_assertions::assert_impl_all!(DeviceFd: Send, Sync, Copy);
static_assertions::assert_impl_all!(DeviceId: Send, Sync, Copy);
static_assertions::assert_impl_all!(ContextId: Send, Sync, Copy);
static_assertions::assert_impl_all!(LayoutClientHandle: Send, Sync, Copy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fd_validity_gate() {
        assert!(DeviceFd::new(7).is_valid());
        assert!(!DeviceFd::new(0).is_valid());
        assert!(!DeviceFd::new(-1).is_valid());
    }

    #[test]
    fn test_soc_classification() {
        assert!(DeviceId::new(0x2212).is_integrated_soc());
        assert!(DeviceId::new(0x4E55).is_integrated_soc());
        assert!(!DeviceId::new(0x9A49).is_integrated_soc());
    }

    #[test]
    fn test_product_family_blocks() {
        assert_eq!(DeviceId::new(0x9A49).product_family(), ProductFamily::Gen12);
        assert_eq!(DeviceId::new(0x3185).product_family(), ProductFamily::Gen11);
        assert_eq!(DeviceId::new(0x0042).product_family(), ProductFamily::Unknown);
    }

    #[test]
    fn test_context_ids_unique() {
        let a = ContextId::next();
        let b = ContextId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_null() {
        let h = LayoutClientHandle::null();
        assert!(h.is_null());
        assert!(!LayoutClientHandle::new(3).is_null());
    }
}
