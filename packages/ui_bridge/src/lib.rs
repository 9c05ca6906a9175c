//! Frame bridge between a game engine and an immediate-mode GUI library.
//!
//! Each frame the bridge translates engine-native input events into the
//! library's input stream, drives the library's frame lifecycle, and hands
//! the resulting draw-data snapshots to a pluggable renderer. It also
//! rebuilds the font atlas on demand and mirrors library-requested platform
//! windows in multi-window mode.
//!
//! The engine and the renderer are collaborators behind the
//! [`platform::Platform`] and [`renderer::Renderer`] traits; the GUI library
//! is consumed through [`ui::UiContext`]. Everything runs on the engine's
//! main thread.

#[macro_use]
extern crate tracing;

pub mod ui;
pub mod platform;
pub mod renderer;
pub mod font_atlas;
pub mod settings;
pub mod logging;
mod viewports;
mod input;
#[cfg(test)]
pub(crate) mod test_fakes;

use crate::{
    font_atlas::FontAtlasManager,
    platform::{
        FontResource,
        InputEvent,
        Platform,
        SubViewportId,
    },
    renderer::{
        Renderer,
        RenderTargetId,
    },
    settings::Settings,
    ui::{
        BackendFlags,
        UiContext,
        UiCursor,
    },
    viewports::ViewportMirrors,
};
use std::path;
use anyhow::Result;
use vek::*;


/// Platform backend name published to the GUI library.
const BACKEND_PLATFORM_NAME: &'static str = "ui_bridge";


/// Where the current frame's outer input events should additionally be
/// routed: an embedded render target and its origin in window space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SubViewportRoute {
    pub target: SubViewportId,
    pub origin: Vec2<f32>,
}

/// The frame driver. Owns every per-frame cache and orchestrates input
/// translation, frame lifecycle, atlas rebuilds, and viewport mirroring.
pub struct Bridge {
    renderer: Box<dyn Renderer>,
    pub(crate) settings: Settings,
    fonts: FontAtlasManager,
    pub(crate) pending_scroll: Vec2<f32>,
    current_cursor: UiCursor,
    pub(crate) sub_viewport: Option<SubViewportRoute>,
    mirrors: ViewportMirrors,
}

impl Bridge {
    pub fn new(renderer: Box<dyn Renderer>, settings: Settings) -> Self {
        Bridge {
            renderer,
            settings,
            fonts: FontAtlasManager::new(),
            pending_scroll: Vec2::zero(),
            current_cursor: UiCursor::None,
            sub_viewport: None,
            mirrors: ViewportMirrors::new(),
        }
    }

    /// One-time setup: reset the library context, declare backend
    /// capabilities and names, apply the persisted-layout path, and let the
    /// renderer initialize.
    ///
    /// A failure here means a required native capability is missing; callers
    /// must abort startup rather than run the bridge degraded.
    pub fn init(&mut self, ui: &mut dyn UiContext) -> Result<()> {
        self.fonts.clear_registered();
        ui.reset_context();
        ui.set_backend_flags(BackendFlags {
            has_gamepad: true,
            has_set_mouse_pos: true,
            has_mouse_cursors: true,
        });
        ui.set_backend_names(BACKEND_PLATFORM_NAME, self.renderer.name());
        match &self.settings.layout_file {
            Some(file) => {
                let file = path::absolute(file)?;
                ui.set_layout_file(Some(&file));
            }
            None => ui.set_layout_file(None),
        }
        self.renderer.init(ui)?;
        debug!(renderer = self.renderer.name(), "initialized ui bridge");
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// See [`FontAtlasManager::register`].
    pub fn register_font(
        &mut self,
        source: Option<FontResource>,
        size_px: u32,
        merge: bool,
    ) {
        self.fonts.register(source, size_px, merge);
    }

    /// See [`FontAtlasManager::reset`].
    pub fn reset_fonts(&mut self, ui: &mut dyn UiContext) {
        self.fonts.reset(ui);
    }

    /// Rebuild the font atlas at `scale`. See [`FontAtlasManager::rebuild`].
    pub fn rebuild_font_atlas(
        &mut self,
        ui: &mut dyn UiContext,
        platform: &mut dyn Platform,
        scale: f32,
    ) -> Result<()> {
        self.fonts.rebuild(ui, platform, scale)
    }

    pub fn font_atlas(&self) -> &FontAtlasManager {
        &self.fonts
    }

    /// Route the rest of this frame's input additionally into an embedded
    /// render target. Cleared automatically at the next frame start, so the
    /// embedding glue re-marks its target every frame it is active.
    pub fn set_sub_viewport(&mut self, target: SubViewportId, origin: Vec2<f32>) {
        self.sub_viewport = Some(SubViewportRoute { target, origin });
    }

    /// Translate one native input event. Returns whether the library
    /// consumed it.
    pub fn process_input(
        &mut self,
        ui: &mut dyn UiContext,
        platform: &mut dyn Platform,
        event: &InputEvent,
    ) -> bool {
        input::process(self, ui, platform, event)
    }

    /// Forward an application focus gained/lost notification. Delivered
    /// immediately, independent of frame timing.
    pub fn notify_focus(&self, ui: &mut dyn UiContext, focused: bool) {
        ui.add_focus_event(focused);
    }

    /// Start a frame: push display state, deliver buffered scroll, settle
    /// pointer and cursor business, and open the library's new frame.
    pub fn begin_frame(
        &mut self,
        ui: &mut dyn UiContext,
        platform: &mut dyn Platform,
        delta: f32,
        display_size: Extent2<f32>,
    ) {
        ui.set_display_size(display_size);
        ui.set_delta_time(delta);

        if ui.config_flags().multi_windows {
            // relative deltas can't be trusted across window boundaries, so
            // feed the polled desktop position every frame
            ui.add_mouse_pos_event(platform.pointer_position());
            // TODO: honor want_set_mouse_pos relative to the window that
            // currently has focus
        } else if let Some(pos) = ui.want_set_mouse_pos() {
            platform.warp_pointer(pos);
        }

        // scrolling works better if we allow no more than one event per frame
        if self.pending_scroll != Vec2::zero() {
            ui.add_mouse_wheel_event(self.pending_scroll);
            self.pending_scroll = Vec2::zero();
        }

        if ui.want_capture_mouse() && !ui.config_flags().no_cursor_change {
            let cursor = ui.mouse_cursor();
            if cursor != self.current_cursor {
                platform.set_cursor_shape(input::map_cursor(cursor));
                self.current_cursor = cursor;
            }
        } else {
            self.current_cursor = UiCursor::None;
        }

        self.sub_viewport = None;
        ui.new_frame();
    }

    /// Finish a frame: render the library's draw data to `target`, then, in
    /// multi-window mode, reconcile and render mirror windows.
    pub fn end_frame(
        &mut self,
        ui: &mut dyn UiContext,
        platform: &mut dyn Platform,
        target: RenderTargetId,
    ) -> Result<()> {
        let draw_data = ui.render();
        self.renderer.render(target, &draw_data)?;

        if ui.config_flags().multi_windows {
            let events = ui.update_platform_windows();
            self.mirrors.sync(events, platform, &mut *self.renderer);
            self.mirrors.render_all(ui, &mut *self.renderer)?;
        }
        Ok(())
    }

    /// The UI layer went invisible; let the renderer drop transient
    /// resources.
    pub fn hide(&mut self) {
        self.renderer.on_hide();
    }

    /// Tear down mirrors and the renderer. The bridge is inert afterwards
    /// until `init` runs again.
    pub fn shutdown(&mut self, platform: &mut dyn Platform) {
        self.mirrors.destroy_all(platform, &mut *self.renderer);
        self.renderer.shutdown();
    }
}


#[cfg(test)]
use crate::{
    test_fakes::{
        FakePlatform,
        FakeRenderer,
        FakeUi,
        UiEventRecord,
    },
    ui::{
        UiViewportEvent,
        UiViewportId,
    },
    platform::WindowRequest,
};

#[cfg(test)]
fn test_bridge() -> (Bridge, FakeRenderer) {
    let renderer = FakeRenderer::new();
    let bridge = Bridge::new(Box::new(renderer.clone()), Settings::default());
    (bridge, renderer)
}

#[test]
fn test_begin_frame_pushes_display_state() {
    let (mut bridge, _) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    bridge.begin_frame(&mut ui, &mut platform, 0.016, Extent2::new(800.0, 600.0));

    assert_eq!(ui.display_size, Some(Extent2::new(800.0, 600.0)));
    assert_eq!(ui.delta_time, Some(0.016));
    assert_eq!(ui.new_frame_calls, 1);
}

#[test]
fn test_pointer_warp_only_in_single_window_mode() {
    let (mut bridge, _) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    platform.pointer_position = Vec2::new(400.0, 300.0);
    ui.want_set_mouse_pos = Some(Vec2::new(50.0, 60.0));

    bridge.begin_frame(&mut ui, &mut platform, 0.016, Extent2::new(800.0, 600.0));
    assert_eq!(platform.warped, vec![Vec2::new(50.0, 60.0)]);

    ui.config_flags.multi_windows = true;
    bridge.begin_frame(&mut ui, &mut platform, 0.016, Extent2::new(800.0, 600.0));
    // no further warp; polled desktop position forwarded instead
    assert_eq!(platform.warped.len(), 1);
    assert!(ui
        .events
        .contains(&UiEventRecord::MousePos(Vec2::new(400.0, 300.0))));
}

#[test]
fn test_cursor_shape_changes_are_deduplicated() {
    let (mut bridge, _) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    ui.want_capture_mouse = true;
    ui.cursor = UiCursor::Hand;

    let size = Extent2::new(800.0, 600.0);
    bridge.begin_frame(&mut ui, &mut platform, 0.016, size);
    bridge.begin_frame(&mut ui, &mut platform, 0.016, size);
    assert_eq!(platform.cursor_shapes.len(), 1);

    // losing capture resets the cache, so regaining it re-applies the shape
    ui.want_capture_mouse = false;
    bridge.begin_frame(&mut ui, &mut platform, 0.016, size);
    ui.want_capture_mouse = true;
    bridge.begin_frame(&mut ui, &mut platform, 0.016, size);
    assert_eq!(platform.cursor_shapes.len(), 2);
}

#[test]
fn test_no_cursor_change_flag_blocks_shape_updates() {
    let (mut bridge, _) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    ui.want_capture_mouse = true;
    ui.cursor = UiCursor::Hand;
    ui.config_flags.no_cursor_change = true;

    bridge.begin_frame(&mut ui, &mut platform, 0.016, Extent2::new(800.0, 600.0));
    assert!(platform.cursor_shapes.is_empty());
}

#[test]
fn test_sub_viewport_route_cleared_each_frame() {
    let (mut bridge, _) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    bridge.set_sub_viewport(SubViewportId(1), Vec2::zero());
    assert!(bridge.sub_viewport.is_some());
    bridge.begin_frame(&mut ui, &mut platform, 0.016, Extent2::new(800.0, 600.0));
    assert!(bridge.sub_viewport.is_none());
}

#[test]
fn test_focus_forwarded_immediately() {
    let (bridge, _) = test_bridge();
    let mut ui = FakeUi::new();

    bridge.notify_focus(&mut ui, true);
    bridge.notify_focus(&mut ui, false);
    assert_eq!(
        ui.events,
        vec![UiEventRecord::Focus(true), UiEventRecord::Focus(false)],
    );
}

#[test]
fn test_end_frame_hands_draw_data_to_renderer() {
    let (mut bridge, renderer) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();

    bridge
        .end_frame(&mut ui, &mut platform, RenderTargetId(42))
        .unwrap();

    assert_eq!(ui.render_calls, 1);
    let state = renderer.state.borrow();
    assert_eq!(state.rendered.len(), 1);
    assert_eq!(state.rendered[0].0, RenderTargetId(42));
}

#[test]
fn test_end_frame_syncs_and_renders_mirrors() {
    let (mut bridge, renderer) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    ui.config_flags.multi_windows = true;
    ui.pending_viewport_events = vec![UiViewportEvent::Created {
        viewport: UiViewportId(1),
        request: WindowRequest {
            position: Vec2::new(10.0, 10.0),
            size: Extent2::new(100.0, 100.0),
            borderless: true,
            always_on_top: false,
        },
    }];

    bridge
        .end_frame(&mut ui, &mut platform, RenderTargetId(0))
        .unwrap();

    // primary target plus the freshly created mirror
    assert_eq!(renderer.state.borrow().rendered.len(), 2);
    assert_eq!(ui.viewport_draw_requests, vec![UiViewportId(1)]);
}

#[test]
fn test_init_declares_backend_and_boots_renderer() {
    let (mut bridge, renderer) = test_bridge();
    let mut ui = FakeUi::new();
    bridge.settings.layout_file = Some("layout.ini".into());

    bridge.init(&mut ui).unwrap();

    assert_eq!(ui.context_resets, 1);
    assert_eq!(
        ui.backend_flags,
        BackendFlags {
            has_gamepad: true,
            has_set_mouse_pos: true,
            has_mouse_cursors: true,
        },
    );
    assert_eq!(
        ui.backend_names,
        Some(("ui_bridge".to_owned(), "fake".to_owned())),
    );
    let layout = ui.layout_file.clone().unwrap();
    assert!(layout.is_absolute());
    assert!(renderer.state.borrow().inited);
}

#[test]
fn test_init_failure_is_fatal() {
    let renderer = FakeRenderer::new();
    renderer.state.borrow_mut().fail_init = true;
    let mut bridge = Bridge::new(Box::new(renderer), Settings::default());
    let mut ui = FakeUi::new();

    assert!(bridge.init(&mut ui).is_err());
}

#[test]
fn test_shutdown_tears_down_mirrors_then_renderer() {
    let (mut bridge, renderer) = test_bridge();
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    ui.config_flags.multi_windows = true;
    ui.pending_viewport_events = vec![UiViewportEvent::Created {
        viewport: UiViewportId(1),
        request: WindowRequest {
            position: Vec2::zero(),
            size: Extent2::new(100.0, 100.0),
            borderless: true,
            always_on_top: false,
        },
    }];
    bridge
        .end_frame(&mut ui, &mut platform, RenderTargetId(0))
        .unwrap();

    bridge.shutdown(&mut platform);

    assert_eq!(platform.destroyed_windows.len(), 1);
    let state = renderer.state.borrow();
    assert_eq!(state.closed_viewports.len(), 1);
    assert_eq!(state.shutdowns, 1);
}

#[test]
fn test_hide_reaches_renderer() {
    let (mut bridge, renderer) = test_bridge();
    bridge.hide();
    assert_eq!(renderer.state.borrow().hidden, 1);
}
