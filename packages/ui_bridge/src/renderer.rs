//! The renderer handoff contract.
//!
//! The bridge does not issue GPU work itself. Each frame it hands the GUI
//! library's draw-data snapshot to an implementation of [`Renderer`], which
//! turns the command lists into draw calls against a target surface. Any
//! concrete renderer plugs in here without changes to the frame driver.

use crate::ui::UiContext;
use anyhow::Result;
use vek::*;


/// Opaque handle to an engine texture. Published by the font atlas manager
/// or by application code; resolved to a native resource by the renderer
/// alone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Handle to a surface draw calls land on: the primary viewport, an embedded
/// render target, or a mirror window's backing surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u64);

/// One interleaved vertex of GUI geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawVert {
    pub pos: Vec2<f32>,
    pub uv: Vec2<f32>,
    pub color: [u8; 4],
}

/// A draw call: a slice of the owning list's index buffer, a scissor
/// rectangle, and the texture to sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub index_offset: u32,
    pub index_count: u32,
    pub clip_rect: Aabr<f32>,
    pub texture: TextureId,
}

/// One command list: shared vertex/index buffers plus the ordered commands
/// that slice into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub vertices: Vec<DrawVert>,
    pub indices: Vec<u32>,
    pub commands: Vec<DrawCmd>,
}

/// The per-frame output of the GUI library, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawData {
    /// Top-left of the area the lists were laid out against.
    pub display_pos: Vec2<f32>,
    pub display_size: Extent2<f32>,
    pub lists: Vec<DrawList>,
}

impl Default for DrawData {
    fn default() -> Self {
        DrawData {
            display_pos: Vec2::zero(),
            display_size: Extent2::new(0.0, 0.0),
            lists: Vec::new(),
        }
    }
}

impl DrawData {
    pub fn new() -> Self {
        Default::default()
    }

    /// True when there is nothing to draw. Renderers must treat this as a
    /// normal frame, not an error.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|list| list.commands.is_empty())
    }

    pub fn total_vertices(&self) -> usize {
        self.lists.iter().map(|list| list.vertices.len()).sum()
    }

    pub fn total_indices(&self) -> usize {
        self.lists.iter().map(|list| list.indices.len()).sum()
    }
}

/// Contract any concrete renderer must satisfy.
///
/// Lifecycle: `init` once when the bridge initializes, `init_viewport` /
/// `close_viewport` as render targets enter and leave scope (mirror windows
/// included), `render` once per target per frame, `on_hide` when the UI layer
/// is hidden, `shutdown` when the bridge goes away.
pub trait Renderer {
    /// Display name published to the GUI library as the renderer backend
    /// name.
    fn name(&self) -> &str;

    /// One-time setup against the library's IO state. A missing native
    /// capability surfaces here as a fatal error; the bridge will not run
    /// degraded.
    fn init(&mut self, ui: &mut dyn UiContext) -> Result<()>;

    fn init_viewport(&mut self, target: RenderTargetId);
    fn close_viewport(&mut self, target: RenderTargetId);

    /// Issue the equivalent draw calls for `draw_data` against `target`.
    /// An empty command list renders nothing and is not an error.
    fn render(&mut self, target: RenderTargetId, draw_data: &DrawData) -> Result<()>;

    fn on_hide(&mut self);
    fn shutdown(&mut self);
}


#[test]
fn test_empty_draw_data() {
    let mut dd = DrawData::new();
    assert!(dd.is_empty());

    // a list with buffers but no commands still draws nothing
    dd.lists.push(DrawList {
        vertices: vec![
            DrawVert {
                pos: Vec2::new(0.0, 0.0),
                uv: Vec2::new(0.0, 0.0),
                color: [255; 4],
            },
        ],
        indices: vec![0],
        commands: Vec::new(),
    });
    assert!(dd.is_empty());
    assert_eq!(dd.total_vertices(), 1);
    assert_eq!(dd.total_indices(), 1);

    dd.lists[0].commands.push(DrawCmd {
        index_offset: 0,
        index_count: 1,
        clip_rect: Aabr {
            min: Vec2::new(0.0, 0.0),
            max: Vec2::new(1.0, 1.0),
        },
        texture: TextureId(1),
    });
    assert!(!dd.is_empty());
}
