//! The slice of the engine the bridge talks to.
//!
//! The engine's scene graph, display server, and input dispatch are external
//! collaborators. The bridge consumes them through [`Platform`]: a handful of
//! queries (window position, pointer position, live modifier state, embedded
//! render-target size) and commands (warp pointer, set cursor shape, create
//! and destroy native windows, upload a texture, route input into an embedded
//! render target).
//!
//! Failures in these calls other than texture upload are defects in the host
//! environment; the bridge does not retry them.

use crate::renderer::{
    RenderTargetId,
    TextureId,
};
use anyhow::Result;
use image::RgbaImage;
use vek::*;


/// Handle to a native OS window created for a mirror viewport.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Handle to an engine render target embedded in the scene (a nested
/// viewport widget), distinct from a platform window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubViewportId(pub u64);

/// A native window plus the render surface backing it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlatformWindow {
    pub id: WindowId,
    pub render_target: RenderTargetId,
}

/// Geometry and decoration for a mirror window the GUI library asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRequest {
    /// Desktop-space position.
    pub position: Vec2<f32>,
    pub size: Extent2<f32>,
    pub borderless: bool,
    pub always_on_top: bool,
}

/// Live modifier key state, polled rather than event-derived so held
/// modifiers stay correct across key repeat and focus changes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

/// Platform cursor shapes the bridge can apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorShape {
    Arrow,
    IBeam,
    Move,
    VSize,
    HSize,
    BDiagSize,
    FDiagSize,
    PointingHand,
    Forbidden,
}

/// An engine font asset: raw bytes plus the characters the asset declares it
/// supports, used to compute minimal glyph ranges at atlas build time.
#[derive(Debug, Clone)]
pub struct FontResource {
    pub name: String,
    pub data: Vec<u8>,
    pub supported_chars: String,
}

/// Mouse buttons as the engine reports them. Wheel directions arrive as
/// pseudo-buttons carrying a scroll factor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Extra1,
    Extra2,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    Start,
    Back,
    Guide,
    FaceUp,
    FaceDown,
    FaceLeft,
    FaceRight,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    LeftShoulder,
    RightShoulder,
    LeftStick,
    RightStick,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

/// Engine-native keycodes, as delivered by the engine's input dispatch.
/// Keys with no mapping into the GUI library's key space are dropped by the
/// translator without an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NativeKey {
    Unknown,
    Tab,
    Left,
    Right,
    Up,
    Down,
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
    Ctrl,
    Shift,
    Alt,
    SuperL,
    SuperR,
    Menu,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,
    BracketLeft,
    Backslash,
    BracketRight,
    QuoteLeft,
    CapsLock,
    ScrollLock,
    NumLock,
    Print,
    Pause,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpPeriod,
    KpDivide,
    KpMultiply,
    KpSubtract,
    KpAdd,
    KpEnter,
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
    VolumeUp,
    VolumeDown,
    MediaPlay,
    MediaStop,
}

/// One engine-native input event, already routed to the bridge by the host's
/// input dispatch.
///
/// `position` is window-local; `global_position` is desktop-space in
/// multi-window mode and coincides with window space otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMotion {
        position: Vec2<f32>,
        global_position: Vec2<f32>,
    },
    PointerButton {
        button: PointerButton,
        pressed: bool,
        /// Scroll magnitude for wheel pseudo-buttons, 1.0 for plain clicks.
        factor: f32,
        position: Vec2<f32>,
        global_position: Vec2<f32>,
    },
    Key {
        key: NativeKey,
        pressed: bool,
        /// Produced character for printable keys, if any.
        codepoint: Option<char>,
    },
    GamepadButton {
        button: GamepadButton,
        pressed: bool,
    },
    GamepadAxis {
        axis: GamepadAxis,
        value: f32,
    },
    PanGesture {
        delta: Vec2<f32>,
    },
}

/// The engine collaborator interface.
///
/// Implemented by the host's engine glue; a recording fake stands in for it
/// in this crate's tests.
pub trait Platform {
    /// Desktop-space origin of the primary window.
    fn window_position(&self) -> Vec2<f32>;
    /// Desktop-space pointer position.
    fn pointer_position(&self) -> Vec2<f32>;
    fn warp_pointer(&mut self, pos: Vec2<f32>);
    fn modifiers(&self) -> KeyModifiers;
    fn set_cursor_shape(&mut self, shape: CursorShape);

    /// Upload an RGBA8 image as a new engine texture. The only fallible
    /// platform call; a failure here aborts the current atlas rebuild.
    fn create_texture(&mut self, image: &RgbaImage) -> Result<TextureId>;
    fn free_texture(&mut self, texture: TextureId);

    fn create_window(&mut self, request: &WindowRequest) -> PlatformWindow;
    fn destroy_window(&mut self, window: WindowId);

    fn sub_viewport_size(&self, target: SubViewportId) -> Extent2<f32>;
    /// Deliver an event to an embedded render target's handled-input path.
    /// Returns whether the target consumed it.
    fn push_sub_viewport_input(
        &mut self,
        target: SubViewportId,
        event: &InputEvent,
    ) -> bool;
    /// Fallback delivery for events the handled path left untouched.
    fn push_sub_viewport_unhandled_input(
        &mut self,
        target: SubViewportId,
        event: &InputEvent,
    );
}
