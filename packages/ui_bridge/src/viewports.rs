//! Mirror windows for library-requested platform viewports.
//!
//! Only active in multi-window mode. When the GUI library asks for a new
//! platform window (a widget dragged outside the primary window), the mirror
//! manager allocates a native window, registers its backing surface with the
//! renderer, and from then on renders that viewport's own draw data each
//! frame until the library signals closure.

use crate::{
    platform::{
        Platform,
        WindowId,
    },
    renderer::{
        Renderer,
        RenderTargetId,
    },
    ui::{
        UiContext,
        UiViewportEvent,
        UiViewportId,
    },
};
use std::collections::HashMap;
use anyhow::Result;


/// One live mirror: the native window and the render surface backing it.
/// Exclusively owned here; destroyed eagerly on the library's closure
/// callback.
#[derive(Debug)]
struct MirrorWindow {
    window: WindowId,
    target: RenderTargetId,
}

#[derive(Debug, Default)]
pub(crate) struct ViewportMirrors {
    windows: HashMap<UiViewportId, MirrorWindow>,
}

impl ViewportMirrors {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.windows.len()
    }

    /// Apply the library's create/destroy requests for this frame.
    pub(crate) fn sync(
        &mut self,
        events: Vec<UiViewportEvent>,
        platform: &mut dyn Platform,
        renderer: &mut dyn Renderer,
    ) {
        for event in events {
            match event {
                UiViewportEvent::Created { viewport, request } => {
                    let window = platform.create_window(&request);
                    renderer.init_viewport(window.render_target);
                    debug!(?viewport, ?window, "created mirror window");
                    self.windows.insert(viewport, MirrorWindow {
                        window: window.id,
                        target: window.render_target,
                    });
                }
                UiViewportEvent::Destroyed { viewport } => {
                    if let Some(mirror) = self.windows.remove(&viewport) {
                        release(mirror, platform, renderer);
                        debug!(?viewport, "destroyed mirror window");
                    }
                }
            }
        }
    }

    /// Render every live mirror's own draw-data snapshot. Runs after the
    /// primary surface has rendered.
    pub(crate) fn render_all(
        &mut self,
        ui: &mut dyn UiContext,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        for (&viewport, mirror) in &self.windows {
            let draw_data = ui.viewport_draw_data(viewport);
            renderer.render(mirror.target, &draw_data)?;
        }
        Ok(())
    }

    /// Tear down every mirror, e.g. on bridge shutdown.
    pub(crate) fn destroy_all(
        &mut self,
        platform: &mut dyn Platform,
        renderer: &mut dyn Renderer,
    ) {
        for (_, mirror) in self.windows.drain() {
            release(mirror, platform, renderer);
        }
    }
}

fn release(
    mirror: MirrorWindow,
    platform: &mut dyn Platform,
    renderer: &mut dyn Renderer,
) {
    // the surface still belongs to the window, so renderer resources must
    // go first
    renderer.close_viewport(mirror.target);
    platform.destroy_window(mirror.window);
}


#[cfg(test)]
use crate::{
    platform::WindowRequest,
    test_fakes::{
        FakePlatform,
        FakeRenderer,
        FakeUi,
    },
};
#[cfg(test)]
use vek::*;

#[cfg(test)]
fn created(id: u32) -> UiViewportEvent {
    UiViewportEvent::Created {
        viewport: UiViewportId(id),
        request: WindowRequest {
            position: Vec2::new(30.0, 40.0),
            size: Extent2::new(320.0, 240.0),
            borderless: true,
            always_on_top: false,
        },
    }
}

#[test]
fn test_mirror_created_on_viewport_event() {
    let mut mirrors = ViewportMirrors::new();
    let mut platform = FakePlatform::new();
    let mut renderer = FakeRenderer::new();

    mirrors.sync(vec![created(1)], &mut platform, &mut renderer);

    assert_eq!(mirrors.len(), 1);
    assert_eq!(platform.window_requests.len(), 1);
    assert_eq!(renderer.state.borrow().init_viewports.len(), 1);
}

#[test]
fn test_mirror_destroyed_resources_before_window() {
    let mut platform = FakePlatform::new();
    let mut renderer = FakeRenderer::with_log(platform.log.clone());
    let mut mirrors = ViewportMirrors::new();

    mirrors.sync(vec![created(1)], &mut platform, &mut renderer);
    mirrors.sync(
        vec![UiViewportEvent::Destroyed { viewport: UiViewportId(1) }],
        &mut platform,
        &mut renderer,
    );

    assert_eq!(mirrors.len(), 0);
    let log = platform.lifecycle();
    let close = log
        .iter()
        .position(|entry| entry.starts_with("close_viewport"))
        .unwrap();
    let destroy = log
        .iter()
        .position(|entry| entry.starts_with("destroy_window"))
        .unwrap();
    assert!(close < destroy);
}

#[test]
fn test_destroy_unknown_viewport_is_noop() {
    let mut mirrors = ViewportMirrors::new();
    let mut platform = FakePlatform::new();
    let mut renderer = FakeRenderer::new();

    mirrors.sync(
        vec![UiViewportEvent::Destroyed { viewport: UiViewportId(9) }],
        &mut platform,
        &mut renderer,
    );
    assert!(platform.destroyed_windows.is_empty());
}

#[test]
fn test_render_all_draws_each_mirror() {
    let mut mirrors = ViewportMirrors::new();
    let mut platform = FakePlatform::new();
    let mut renderer = FakeRenderer::new();
    let mut ui = FakeUi::new();

    mirrors.sync(vec![created(1), created(2)], &mut platform, &mut renderer);
    mirrors.render_all(&mut ui, &mut renderer).unwrap();

    assert_eq!(ui.viewport_draw_requests.len(), 2);
    assert_eq!(renderer.state.borrow().rendered.len(), 2);
}

#[test]
fn test_destroy_all_releases_everything_in_order() {
    let mut platform = FakePlatform::new();
    let mut renderer = FakeRenderer::with_log(platform.log.clone());
    let mut mirrors = ViewportMirrors::new();

    mirrors.sync(vec![created(1), created(2)], &mut platform, &mut renderer);
    mirrors.destroy_all(&mut platform, &mut renderer);

    assert_eq!(mirrors.len(), 0);
    assert_eq!(platform.destroyed_windows.len(), 2);
    assert_eq!(renderer.state.borrow().closed_viewports.len(), 2);
    // per mirror, resources released before its window
    let log = platform.lifecycle();
    let mut last_close = None;
    for entry in &log {
        if entry.starts_with("close_viewport") {
            last_close = Some(entry.clone());
        }
        if entry.starts_with("destroy_window") {
            assert!(last_close.take().is_some());
        }
    }
}
