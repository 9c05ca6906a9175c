//! Recording stand-ins for the engine, the GUI library, and the renderer.
//! Test-only.

use crate::{
    platform::{
        CursorShape,
        InputEvent,
        KeyModifiers,
        Platform,
        PlatformWindow,
        SubViewportId,
        WindowId,
        WindowRequest,
    },
    renderer::{
        DrawData,
        Renderer,
        RenderTargetId,
        TextureId,
    },
    ui::{
        BackendFlags,
        ConfigFlags,
        UiContext,
        UiCursor,
        UiFontConfig,
        UiFontId,
        UiKey,
        UiMouseButton,
        UiStyle,
        UiViewportEvent,
        UiViewportId,
    },
};
use std::{
    cell::RefCell,
    path::{
        Path,
        PathBuf,
    },
    rc::Rc,
};
use anyhow::*;
use image::RgbaImage;
use vek::*;


/// One input submission the fake GUI library received, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiEventRecord {
    MousePos(Vec2<f32>),
    MouseButton(UiMouseButton, bool),
    MouseWheel(Vec2<f32>),
    Key(UiKey, bool),
    KeyAnalog(UiKey, bool, f32),
    Character(char),
    Focus(bool),
}

pub(crate) struct FakeUi {
    pub config_flags: ConfigFlags,
    pub backend_flags: BackendFlags,
    pub backend_names: Option<(String, String)>,
    pub layout_file: Option<PathBuf>,
    pub want_capture_mouse: bool,
    pub want_capture_keyboard: bool,
    pub want_text_input: bool,
    pub want_set_mouse_pos: Option<Vec2<f32>>,
    pub cursor: UiCursor,
    pub style: UiStyle,
    pub events: Vec<UiEventRecord>,
    /// Fonts added since the last `clear_fonts`.
    pub added_fonts: Vec<UiFontConfig>,
    pub explicit_build_calls: u32,
    pub font_texture: Option<TextureId>,
    pub tex_data_cleared: bool,
    pub display_size: Option<Extent2<f32>>,
    pub delta_time: Option<f32>,
    pub new_frame_calls: u32,
    pub render_calls: u32,
    pub context_resets: u32,
    /// Scripted viewport events handed out by `update_platform_windows`.
    pub pending_viewport_events: Vec<UiViewportEvent>,
    pub viewport_draw_requests: Vec<UiViewportId>,
    font_list: Vec<UiFontId>,
    default_font_id: Option<UiFontId>,
    next_font_id: u32,
}

impl FakeUi {
    pub fn new() -> Self {
        FakeUi {
            config_flags: Default::default(),
            backend_flags: Default::default(),
            backend_names: None,
            layout_file: None,
            want_capture_mouse: false,
            want_capture_keyboard: false,
            want_text_input: false,
            want_set_mouse_pos: None,
            cursor: UiCursor::Arrow,
            style: Default::default(),
            events: Vec::new(),
            added_fonts: Vec::new(),
            explicit_build_calls: 0,
            font_texture: None,
            tex_data_cleared: false,
            display_size: None,
            delta_time: None,
            new_frame_calls: 0,
            render_calls: 0,
            context_resets: 0,
            pending_viewport_events: Vec::new(),
            viewport_draw_requests: Vec::new(),
            font_list: Vec::new(),
            default_font_id: None,
            next_font_id: 0,
        }
    }
}

impl UiContext for FakeUi {
    fn reset_context(&mut self) {
        self.context_resets += 1;
    }

    fn config_flags(&self) -> ConfigFlags {
        self.config_flags
    }

    fn set_backend_flags(&mut self, flags: BackendFlags) {
        self.backend_flags = flags;
    }

    fn set_backend_names(&mut self, platform: &str, renderer: &str) {
        self.backend_names = Some((platform.to_owned(), renderer.to_owned()));
    }

    fn set_layout_file(&mut self, path: Option<&Path>) {
        self.layout_file = path.map(|p| p.to_owned());
    }

    fn want_capture_mouse(&self) -> bool {
        self.want_capture_mouse
    }

    fn want_capture_keyboard(&self) -> bool {
        self.want_capture_keyboard
    }

    fn want_text_input(&self) -> bool {
        self.want_text_input
    }

    fn want_set_mouse_pos(&self) -> Option<Vec2<f32>> {
        self.want_set_mouse_pos
    }

    fn mouse_cursor(&self) -> UiCursor {
        self.cursor
    }

    fn set_display_size(&mut self, size: Extent2<f32>) {
        self.display_size = Some(size);
    }

    fn set_delta_time(&mut self, seconds: f32) {
        self.delta_time = Some(seconds);
    }

    fn new_frame(&mut self) {
        self.new_frame_calls += 1;
    }

    fn render(&mut self) -> DrawData {
        self.render_calls += 1;
        DrawData::new()
    }

    fn add_mouse_pos_event(&mut self, pos: Vec2<f32>) {
        self.events.push(UiEventRecord::MousePos(pos));
    }

    fn add_mouse_button_event(&mut self, button: UiMouseButton, pressed: bool) {
        self.events.push(UiEventRecord::MouseButton(button, pressed));
    }

    fn add_mouse_wheel_event(&mut self, delta: Vec2<f32>) {
        self.events.push(UiEventRecord::MouseWheel(delta));
    }

    fn add_key_event(&mut self, key: UiKey, pressed: bool) {
        self.events.push(UiEventRecord::Key(key, pressed));
    }

    fn add_key_analog_event(&mut self, key: UiKey, pressed: bool, value: f32) {
        self.events.push(UiEventRecord::KeyAnalog(key, pressed, value));
    }

    fn add_input_character(&mut self, c: char) {
        self.events.push(UiEventRecord::Character(c));
    }

    fn add_focus_event(&mut self, focused: bool) {
        self.events.push(UiEventRecord::Focus(focused));
    }

    fn clear_fonts(&mut self) {
        self.font_list.clear();
        self.added_fonts.clear();
    }

    fn add_font(&mut self, config: UiFontConfig) -> UiFontId {
        let id = UiFontId(self.next_font_id);
        self.next_font_id += 1;
        self.font_list.push(id);
        self.added_fonts.push(config);
        id
    }

    fn build_fonts(&mut self) {
        self.explicit_build_calls += 1;
    }

    fn font_atlas_rgba32(&mut self) -> RgbaImage {
        // dimensions are a pure function of the configured fonts, mimicking
        // deterministic atlas packing
        let width = 256;
        let height = self
            .added_fonts
            .iter()
            .map(|font| font.size_pixels.max(1.0).ceil() as u32 + 2)
            .sum::<u32>()
            .max(32)
            .next_power_of_two();
        RgbaImage::new(width, height)
    }

    fn clear_font_tex_data(&mut self) {
        self.tex_data_cleared = true;
    }

    fn set_font_texture(&mut self, texture: TextureId) {
        self.font_texture = Some(texture);
    }

    fn fonts(&self) -> Vec<UiFontId> {
        self.font_list.clone()
    }

    fn default_font(&self) -> Option<UiFontId> {
        self.default_font_id
    }

    fn set_default_font(&mut self, font: Option<UiFontId>) {
        self.default_font_id = font;
    }

    fn style_mut(&mut self) -> &mut UiStyle {
        &mut self.style
    }

    fn update_platform_windows(&mut self) -> Vec<UiViewportEvent> {
        std::mem::take(&mut self.pending_viewport_events)
    }

    fn viewport_draw_data(&mut self, viewport: UiViewportId) -> DrawData {
        self.viewport_draw_requests.push(viewport);
        DrawData::new()
    }
}

pub(crate) struct FakePlatform {
    /// Shared resource-lifecycle log; hand a clone to `FakeRenderer` to
    /// assert cross-object ordering.
    pub log: Rc<RefCell<Vec<String>>>,
    pub window_position: Vec2<f32>,
    pub pointer_position: Vec2<f32>,
    pub modifiers: KeyModifiers,
    pub warped: Vec<Vec2<f32>>,
    pub cursor_shapes: Vec<CursorShape>,
    /// (width, height, byte length) per successful texture upload.
    pub uploaded: Vec<(u32, u32, usize)>,
    pub fail_texture_upload: bool,
    pub freed_textures: Vec<TextureId>,
    pub window_requests: Vec<WindowRequest>,
    pub destroyed_windows: Vec<WindowId>,
    pub sub_viewport_size: Extent2<f32>,
    pub sub_viewport_handled: bool,
    pub routed: Vec<(SubViewportId, InputEvent)>,
    pub routed_unhandled: Vec<(SubViewportId, InputEvent)>,
    next_texture: u64,
    next_window: u64,
}

impl FakePlatform {
    pub fn new() -> Self {
        FakePlatform {
            log: Rc::new(RefCell::new(Vec::new())),
            window_position: Vec2::zero(),
            pointer_position: Vec2::zero(),
            modifiers: Default::default(),
            warped: Vec::new(),
            cursor_shapes: Vec::new(),
            uploaded: Vec::new(),
            fail_texture_upload: false,
            freed_textures: Vec::new(),
            window_requests: Vec::new(),
            destroyed_windows: Vec::new(),
            sub_viewport_size: Extent2::new(64.0, 64.0),
            sub_viewport_handled: false,
            routed: Vec::new(),
            routed_unhandled: Vec::new(),
            next_texture: 1,
            next_window: 1,
        }
    }

    pub fn lifecycle(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Platform for FakePlatform {
    fn window_position(&self) -> Vec2<f32> {
        self.window_position
    }

    fn pointer_position(&self) -> Vec2<f32> {
        self.pointer_position
    }

    fn warp_pointer(&mut self, pos: Vec2<f32>) {
        self.warped.push(pos);
    }

    fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.cursor_shapes.push(shape);
    }

    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureId> {
        if self.fail_texture_upload {
            bail!("texture upload refused");
        }
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.uploaded.push((
            image.width(),
            image.height(),
            image.as_raw().len(),
        ));
        self.log.borrow_mut().push(format!("create_texture {}", id.0));
        Ok(id)
    }

    fn free_texture(&mut self, texture: TextureId) {
        self.freed_textures.push(texture);
        self.log.borrow_mut().push(format!("free_texture {}", texture.0));
    }

    fn create_window(&mut self, request: &WindowRequest) -> PlatformWindow {
        let id = WindowId(self.next_window);
        let render_target = RenderTargetId(1000 + self.next_window);
        self.next_window += 1;
        self.window_requests.push(request.clone());
        self.log.borrow_mut().push(format!("create_window {}", id.0));
        PlatformWindow { id, render_target }
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.destroyed_windows.push(window);
        self.log.borrow_mut().push(format!("destroy_window {}", window.0));
    }

    fn sub_viewport_size(&self, _target: SubViewportId) -> Extent2<f32> {
        self.sub_viewport_size
    }

    fn push_sub_viewport_input(
        &mut self,
        target: SubViewportId,
        event: &InputEvent,
    ) -> bool {
        self.routed.push((target, event.clone()));
        self.sub_viewport_handled
    }

    fn push_sub_viewport_unhandled_input(
        &mut self,
        target: SubViewportId,
        event: &InputEvent,
    ) {
        self.routed_unhandled.push((target, event.clone()));
    }
}

#[derive(Debug, Default)]
pub(crate) struct RendererState {
    pub inited: bool,
    pub fail_init: bool,
    pub init_viewports: Vec<RenderTargetId>,
    pub closed_viewports: Vec<RenderTargetId>,
    /// (target, list count) per render call.
    pub rendered: Vec<(RenderTargetId, usize)>,
    pub hidden: u32,
    pub shutdowns: u32,
}

/// Clonable handle; state lives behind `Rc` so tests keep visibility after
/// the bridge takes ownership of the boxed renderer.
#[derive(Clone)]
pub(crate) struct FakeRenderer {
    pub state: Rc<RefCell<RendererState>>,
    pub log: Rc<RefCell<Vec<String>>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::with_log(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn with_log(log: Rc<RefCell<Vec<String>>>) -> Self {
        FakeRenderer {
            state: Rc::new(RefCell::new(Default::default())),
            log,
        }
    }
}

impl Renderer for FakeRenderer {
    fn name(&self) -> &str {
        "fake"
    }

    fn init(&mut self, _ui: &mut dyn UiContext) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_init {
            bail!("required native capability unavailable");
        }
        state.inited = true;
        Ok(())
    }

    fn init_viewport(&mut self, target: RenderTargetId) {
        self.state.borrow_mut().init_viewports.push(target);
        self.log.borrow_mut().push(format!("init_viewport {}", target.0));
    }

    fn close_viewport(&mut self, target: RenderTargetId) {
        self.state.borrow_mut().closed_viewports.push(target);
        self.log.borrow_mut().push(format!("close_viewport {}", target.0));
    }

    fn render(&mut self, target: RenderTargetId, draw_data: &DrawData) -> Result<()> {
        self.state.borrow_mut().rendered.push((target, draw_data.lists.len()));
        Ok(())
    }

    fn on_hide(&mut self) {
        self.state.borrow_mut().hidden += 1;
    }

    fn shutdown(&mut self) {
        self.state.borrow_mut().shutdowns += 1;
    }
}
