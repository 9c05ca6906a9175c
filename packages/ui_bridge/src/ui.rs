//! The surface of the immediate-mode GUI library that the bridge drives.
//!
//! The library itself is an external collaborator. The bridge never reaches
//! into widget or layout logic; everything it needs is captured by the
//! [`UiContext`] trait: frame lifecycle, IO capability flags, font atlas
//! operations, style access, and the per-event input submission calls.

use crate::renderer::{
    DrawData,
    TextureId,
};
use crate::platform::WindowRequest;
use std::path::Path;
use image::RgbaImage;
use vek::*;


/// Identity of a font inside the library's atlas. Invalidated whenever the
/// atlas is cleared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UiFontId(pub u32);

/// Identity of a library-requested platform viewport in multi-window mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UiViewportId(pub u32);

/// Abstract mouse buttons understood by the library.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UiMouseButton {
    Left,
    Right,
    Middle,
    Extra1,
    Extra2,
}

/// Visual cursor the library wants shown, queried once per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UiCursor {
    None,
    Arrow,
    TextInput,
    ResizeAll,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
    Hand,
    NotAllowed,
}

/// The library's abstract key space, including synthesized modifier states
/// and gamepad navigation inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UiKey {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftSuper,
    RightSuper,
    Menu,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,
    LeftBracket,
    Backslash,
    RightBracket,
    GraveAccent,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadDecimal,
    KeypadDivide,
    KeypadMultiply,
    KeypadSubtract,
    KeypadAdd,
    KeypadEnter,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    ModCtrl,
    ModShift,
    ModAlt,
    ModSuper,
    GamepadStart,
    GamepadBack,
    GamepadFaceUp,
    GamepadFaceDown,
    GamepadFaceLeft,
    GamepadFaceRight,
    GamepadDpadUp,
    GamepadDpadDown,
    GamepadDpadLeft,
    GamepadDpadRight,
    GamepadL1,
    GamepadR1,
    GamepadL2,
    GamepadR2,
    GamepadL3,
    GamepadR3,
    GamepadLStickLeft,
    GamepadLStickRight,
    GamepadLStickUp,
    GamepadLStickDown,
    GamepadRStickLeft,
    GamepadRStickRight,
    GamepadRStickUp,
    GamepadRStickDown,
}

/// Application-set configuration flags read back by the bridge.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ConfigFlags {
    /// The library may spawn additional platform windows for widgets dragged
    /// outside the primary window.
    pub multi_windows: bool,
    /// The library consumes gamepad navigation input.
    pub gamepad_nav: bool,
    /// The library is not allowed to change the visible cursor shape.
    pub no_cursor_change: bool,
}

/// Capabilities this bridge declares to the library on init.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BackendFlags {
    pub has_gamepad: bool,
    pub has_set_mouse_pos: bool,
    pub has_mouse_cursors: bool,
}

/// One font the bridge asks the library to bake into its atlas.
#[derive(Debug, Clone)]
pub struct UiFontConfig {
    /// Display name, truncated by the caller; purely diagnostic.
    pub name: String,
    /// Raw TTF/OTF bytes, or `None` for the library's built-in default font.
    pub data: Option<Vec<u8>>,
    pub size_pixels: f32,
    /// Layer this font's glyphs onto the previously added font instead of
    /// adding a separate font.
    pub merge: bool,
    /// Inclusive codepoint ranges to bake. Empty means the library default
    /// range.
    pub glyph_ranges: Vec<(u32, u32)>,
    pub oversample_h: u32,
    pub oversample_v: u32,
    pub pixel_snap_h: bool,
}

impl Default for UiFontConfig {
    fn default() -> Self {
        UiFontConfig {
            name: String::new(),
            data: None,
            size_pixels: 13.0,
            merge: false,
            glyph_ranges: Vec::new(),
            oversample_h: 2,
            oversample_v: 1,
            pixel_snap_h: false,
        }
    }
}

/// Platform-window request/teardown emitted by the library after a frame in
/// multi-window mode.
#[derive(Debug, Clone, PartialEq)]
pub enum UiViewportEvent {
    Created {
        viewport: UiViewportId,
        request: WindowRequest,
    },
    Destroyed {
        viewport: UiViewportId,
    },
}

/// Style metrics the bridge resets on atlas rebuild.
///
/// Only the metric whitelist below is ever written by the bridge; the color
/// palette is left exactly as the application set it.
#[derive(Debug, Clone, PartialEq)]
pub struct UiStyle {
    pub window_padding: Vec2<f32>,
    pub window_rounding: f32,
    pub window_min_size: Extent2<f32>,
    pub child_rounding: f32,
    pub popup_rounding: f32,
    pub frame_padding: Vec2<f32>,
    pub frame_rounding: f32,
    pub item_spacing: Vec2<f32>,
    pub item_inner_spacing: Vec2<f32>,
    pub cell_padding: Vec2<f32>,
    pub touch_extra_padding: Vec2<f32>,
    pub indent_spacing: f32,
    pub columns_min_spacing: f32,
    pub scrollbar_size: f32,
    pub scrollbar_rounding: f32,
    pub grab_min_size: f32,
    pub grab_rounding: f32,
    pub log_slider_deadzone: f32,
    pub tab_rounding: f32,
    pub tab_min_width_for_close_button: f32,
    pub display_window_padding: Vec2<f32>,
    pub display_safe_area_padding: Vec2<f32>,
    pub mouse_cursor_scale: f32,
    /// Widget palette, owned by the application. Never touched by the bridge.
    pub colors: Vec<Rgba<f32>>,
}

impl Default for UiStyle {
    fn default() -> Self {
        UiStyle {
            window_padding: Vec2::new(8.0, 8.0),
            window_rounding: 0.0,
            window_min_size: Extent2::new(32.0, 32.0),
            child_rounding: 0.0,
            popup_rounding: 0.0,
            frame_padding: Vec2::new(4.0, 3.0),
            frame_rounding: 0.0,
            item_spacing: Vec2::new(8.0, 4.0),
            item_inner_spacing: Vec2::new(4.0, 4.0),
            cell_padding: Vec2::new(4.0, 2.0),
            touch_extra_padding: Vec2::new(0.0, 0.0),
            indent_spacing: 21.0,
            columns_min_spacing: 6.0,
            scrollbar_size: 14.0,
            scrollbar_rounding: 9.0,
            grab_min_size: 12.0,
            grab_rounding: 0.0,
            log_slider_deadzone: 4.0,
            tab_rounding: 4.0,
            tab_min_width_for_close_button: 0.0,
            display_window_padding: Vec2::new(19.0, 19.0),
            display_safe_area_padding: Vec2::new(3.0, 3.0),
            mouse_cursor_scale: 1.0,
            colors: Vec::new(),
        }
    }
}

impl UiStyle {
    /// Scale every metric in place, flooring to whole pixels the way the
    /// library itself does. Colors are not metrics and are not touched.
    pub fn scale_all_sizes(&mut self, scale: f32) {
        fn f(v: f32, s: f32) -> f32 {
            (v * s).floor()
        }
        fn f2(v: Vec2<f32>, s: f32) -> Vec2<f32> {
            Vec2::new(f(v.x, s), f(v.y, s))
        }
        self.window_padding = f2(self.window_padding, scale);
        self.window_rounding = f(self.window_rounding, scale);
        self.window_min_size = Extent2::new(
            f(self.window_min_size.w, scale),
            f(self.window_min_size.h, scale),
        );
        self.child_rounding = f(self.child_rounding, scale);
        self.popup_rounding = f(self.popup_rounding, scale);
        self.frame_padding = f2(self.frame_padding, scale);
        self.frame_rounding = f(self.frame_rounding, scale);
        self.item_spacing = f2(self.item_spacing, scale);
        self.item_inner_spacing = f2(self.item_inner_spacing, scale);
        self.cell_padding = f2(self.cell_padding, scale);
        self.touch_extra_padding = f2(self.touch_extra_padding, scale);
        self.indent_spacing = f(self.indent_spacing, scale);
        self.columns_min_spacing = f(self.columns_min_spacing, scale);
        self.scrollbar_size = f(self.scrollbar_size, scale);
        self.scrollbar_rounding = f(self.scrollbar_rounding, scale);
        self.grab_min_size = f(self.grab_min_size, scale);
        self.grab_rounding = f(self.grab_rounding, scale);
        self.log_slider_deadzone = f(self.log_slider_deadzone, scale);
        self.tab_rounding = f(self.tab_rounding, scale);
        self.tab_min_width_for_close_button =
            f(self.tab_min_width_for_close_button, scale);
        self.display_window_padding = f2(self.display_window_padding, scale);
        self.display_safe_area_padding = f2(self.display_safe_area_padding, scale);
        self.mouse_cursor_scale = f(self.mouse_cursor_scale, scale);
    }
}

/// The GUI library as consumed by the bridge.
///
/// All calls happen on the engine's main thread; the library context is not
/// thread-safe and the bridge never touches it concurrently.
pub trait UiContext {
    /// Destroy the current library context if one exists and create a fresh
    /// one.
    fn reset_context(&mut self);
    fn config_flags(&self) -> ConfigFlags;
    fn set_backend_flags(&mut self, flags: BackendFlags);
    fn set_backend_names(&mut self, platform: &str, renderer: &str);
    /// Point the library's persisted-layout machinery at a file, or disable
    /// persistence with `None`. The path is already absolute.
    fn set_layout_file(&mut self, path: Option<&Path>);

    fn want_capture_mouse(&self) -> bool;
    fn want_capture_keyboard(&self) -> bool;
    fn want_text_input(&self) -> bool;
    /// `Some(pos)` while the library is asking the platform to move the
    /// pointer.
    fn want_set_mouse_pos(&self) -> Option<Vec2<f32>>;
    fn mouse_cursor(&self) -> UiCursor;

    fn set_display_size(&mut self, size: Extent2<f32>);
    fn set_delta_time(&mut self, seconds: f32);
    fn new_frame(&mut self);
    /// Finalize the frame and return its draw-data snapshot.
    fn render(&mut self) -> DrawData;

    fn add_mouse_pos_event(&mut self, pos: Vec2<f32>);
    fn add_mouse_button_event(&mut self, button: UiMouseButton, pressed: bool);
    fn add_mouse_wheel_event(&mut self, delta: Vec2<f32>);
    fn add_key_event(&mut self, key: UiKey, pressed: bool);
    fn add_key_analog_event(&mut self, key: UiKey, pressed: bool, value: f32);
    fn add_input_character(&mut self, c: char);
    fn add_focus_event(&mut self, focused: bool);

    /// Discard every font in the atlas. Invalidates all `UiFontId`s.
    fn clear_fonts(&mut self);
    fn add_font(&mut self, config: UiFontConfig) -> UiFontId;
    /// Bake everything added so far. Safe to call repeatedly.
    fn build_fonts(&mut self);
    /// RGBA8 pixels of the built atlas, building first if necessary.
    fn font_atlas_rgba32(&mut self) -> RgbaImage;
    /// Drop the CPU-side pixel copy once it has been uploaded.
    fn clear_font_tex_data(&mut self);
    fn set_font_texture(&mut self, texture: TextureId);
    /// Current fonts in atlas order.
    fn fonts(&self) -> Vec<UiFontId>;
    fn default_font(&self) -> Option<UiFontId>;
    fn set_default_font(&mut self, font: Option<UiFontId>);

    fn style_mut(&mut self) -> &mut UiStyle;

    /// Let the library reconcile its platform windows after a frame, handing
    /// back the create/destroy work for the mirror manager.
    fn update_platform_windows(&mut self) -> Vec<UiViewportEvent>;
    /// Draw-data snapshot for one secondary viewport.
    fn viewport_draw_data(&mut self, viewport: UiViewportId) -> DrawData;
}


#[test]
fn test_scale_all_sizes_floors_metrics() {
    let mut style = UiStyle::default();
    style.colors = vec![Rgba::new(0.1, 0.2, 0.3, 1.0)];
    style.scale_all_sizes(1.5);
    // 8 * 1.5 = 12, 4 * 1.5 = 6, 3 * 1.5 = 4.5 floored to 4
    assert_eq!(style.window_padding, Vec2::new(12.0, 12.0));
    assert_eq!(style.frame_padding, Vec2::new(6.0, 4.0));
    assert_eq!(style.indent_spacing, 31.0);
    assert_eq!(style.colors, vec![Rgba::new(0.1, 0.2, 0.3, 1.0)]);
}
