//! Rendering surface collaborator.
//!
//! The engine never touches render state directly: every annotation is
//! applied through the surface's serialized update primitive, and the
//! surface is re-checked for liveness immediately before each application.

use std::sync::Arc;

/// Opaque identity of a rendering surface. There can be multiple surfaces
/// (views) over one buffer; each keeps its own filtering dedup state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Display attributes carried opaquely from a filter to the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextAttributes {
    /// Packed 0xRRGGBB foreground, if set.
    pub foreground: Option<u32>,
    /// Packed 0xRRGGBB background, if set.
    pub background: Option<u32>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Rendering priority layer for highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HighlightLayer(pub i32);

impl HighlightLayer {
    pub const SYNTAX: Self = Self(1_000);
    pub const ADDITIONAL: Self = Self(2_000);
    pub const HYPERLINK: Self = Self(3_000);
}

impl Default for HighlightLayer {
    fn default() -> Self {
        Self::ADDITIONAL
    }
}

/// Target-resolution capability supplied by a filter for hyperlink results.
pub trait LinkTarget: Send + Sync {
    /// Resolve to a navigable destination (URI, file path), if still valid.
    fn resolve(&self) -> Option<String>;
}

/// A place to render highlights and clickable links.
///
/// `run_serialized` is the surface's serialized update mechanism — the sole
/// synchronization point between background work and render state. Work
/// handed to it must re-check `is_live` before touching the surface; a
/// torn-down surface makes the remaining work a silent no-op.
pub trait RenderSurface: Send + Sync {
    fn id(&self) -> SurfaceId;

    /// False once the surface has been torn down.
    fn is_live(&self) -> bool;

    fn add_highlight(
        &self,
        start: usize,
        end: usize,
        attributes: Option<TextAttributes>,
        layer: HighlightLayer,
    );

    fn add_hyperlink(
        &self,
        start: usize,
        end: usize,
        attributes: Option<TextAttributes>,
        target: Arc<dyn LinkTarget>,
    );

    fn run_serialized(&self, task: Box<dyn FnOnce() + Send + 'static>);
}
