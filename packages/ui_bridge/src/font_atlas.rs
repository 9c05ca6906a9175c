//! Font registration and atlas rebuilding.
//!
//! Fonts are registered up front and baked wholesale: every rebuild clears
//! the GUI library's atlas, re-adds the whole list at the requested scale,
//! extracts the packed RGBA pixels, and uploads them as a fresh engine
//! texture. Rebuilds are rare (font change, DPI change) and synchronous;
//! the frame simply stalls for the upload.

use crate::{
    platform::{
        FontResource,
        Platform,
    },
    renderer::TextureId,
    ui::{
        UiContext,
        UiFontConfig,
        UiStyle,
    },
};
use anyhow::*;


/// One registered font: a source asset (or the library's built-in default),
/// a pixel size, and whether it merges into the previous entry's glyph set.
#[derive(Debug, Clone)]
pub struct FontSpec {
    pub source: Option<FontResource>,
    pub size_px: u32,
    pub merge: bool,
}

/// Owns the configured font list and the currently live atlas texture.
#[derive(Debug, Default)]
pub struct FontAtlasManager {
    fonts: Vec<FontSpec>,
    texture: Option<TextureId>,
}

impl FontAtlasManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Append a font. Order matters: atlas build order is registration
    /// order, and a `merge` entry layers onto the entry before it.
    /// `None` source means the library's built-in default font.
    pub fn register(&mut self, source: Option<FontResource>, size_px: u32, merge: bool) {
        self.fonts.push(FontSpec { source, size_px, merge });
    }

    /// Forget every registered font and clear the library's atlas state.
    pub fn reset(&mut self, ui: &mut dyn UiContext) {
        ui.clear_fonts();
        ui.set_default_font(None);
        self.fonts.clear();
    }

    /// Drop the registered list without touching the library. Used on
    /// bridge re-initialization, where the context was just reset anyway.
    pub(crate) fn clear_registered(&mut self) {
        self.fonts.clear();
    }

    /// Handle of the live atlas texture, once one has been built.
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Rebuild the atlas at `scale`.
    ///
    /// The old texture stays bound until the new one is uploaded and
    /// published, so a failed upload leaves the previous atlas usable and
    /// the error propagates to the caller.
    pub fn rebuild(
        &mut self,
        ui: &mut dyn UiContext,
        platform: &mut dyn Platform,
        scale: f32,
    ) -> Result<()> {
        // the clear invalidates font ids, so capture the default font's
        // list position, not its id
        let default_position = ui
            .default_font()
            .and_then(|font| ui.fonts().iter().position(|&f| f == font));
        ui.set_default_font(None);
        ui.clear_fonts();

        for spec in &self.fonts {
            add_to_atlas(ui, spec, scale);
        }

        let image = ui.font_atlas_rgba32();
        ensure!(
            image.width() > 0 && image.height() > 0,
            "font atlas build produced an empty image",
        );
        let texture = platform
            .create_texture(&image)
            .context("font atlas texture upload failed")?;
        ui.set_font_texture(texture);
        ui.clear_font_tex_data();
        if let Some(old) = self.texture.replace(texture) {
            platform.free_texture(old);
        }

        if let Some(position) = default_position {
            let fonts = ui.fonts();
            if position < fonts.len() {
                ui.set_default_font(Some(fonts[position]));
            }
        }

        reset_style(ui.style_mut());
        ui.style_mut().scale_all_sizes(scale);

        debug!(
            width = image.width(),
            height = image.height(),
            fonts = self.fonts.len(),
            "rebuilt font atlas",
        );
        Ok(())
    }
}

fn add_to_atlas(ui: &mut dyn UiContext, spec: &FontSpec, scale: f32) {
    let size_pixels = (spec.size_px as f32 * scale).round();

    match &spec.source {
        None => {
            ui.add_font(UiFontConfig {
                name: String::new(),
                data: None,
                size_pixels,
                merge: spec.merge,
                glyph_ranges: Vec::new(),
                oversample_h: 1,
                oversample_v: 1,
                pixel_snap_h: true,
            });
        }
        Some(resource) => {
            let name: String = format!("{}, {}px", resource.name, size_pixels as i32)
                .chars()
                .take(40)
                .collect();
            ui.add_font(UiFontConfig {
                name,
                data: Some(resource.data.clone()),
                size_pixels,
                merge: spec.merge,
                glyph_ranges: glyph_ranges(&resource.supported_chars),
                oversample_h: 2,
                oversample_v: 1,
                pixel_snap_h: false,
            });
        }
    }

    // merged glyph ranges only land once the group is baked
    if spec.merge {
        ui.build_fonts();
    }
}

/// Minimal set of inclusive codepoint ranges covering `supported`, so atlas
/// memory stays proportional to the glyphs the asset actually has.
pub fn glyph_ranges(supported: &str) -> Vec<(u32, u32)> {
    let mut points: Vec<u32> = supported.chars().map(|c| c as u32).collect();
    points.sort_unstable();
    points.dedup();

    let mut ranges = Vec::new();
    for point in points {
        match ranges.last_mut() {
            Some(&mut (_, ref mut end)) if *end + 1 == point => *end = point,
            _ => ranges.push((point, point)),
        }
    }
    ranges
}

/// Reset the fixed whitelist of style metrics to library defaults. Colors
/// belong to the application and are left alone.
fn reset_style(style: &mut UiStyle) {
    let defaults = UiStyle::default();

    style.window_padding = defaults.window_padding;
    style.window_rounding = defaults.window_rounding;
    style.window_min_size = defaults.window_min_size;
    style.child_rounding = defaults.child_rounding;
    style.popup_rounding = defaults.popup_rounding;
    style.frame_padding = defaults.frame_padding;
    style.frame_rounding = defaults.frame_rounding;
    style.item_spacing = defaults.item_spacing;
    style.item_inner_spacing = defaults.item_inner_spacing;
    style.cell_padding = defaults.cell_padding;
    style.touch_extra_padding = defaults.touch_extra_padding;
    style.indent_spacing = defaults.indent_spacing;
    style.columns_min_spacing = defaults.columns_min_spacing;
    style.scrollbar_size = defaults.scrollbar_size;
    style.scrollbar_rounding = defaults.scrollbar_rounding;
    style.grab_min_size = defaults.grab_min_size;
    style.grab_rounding = defaults.grab_rounding;
    style.log_slider_deadzone = defaults.log_slider_deadzone;
    style.tab_rounding = defaults.tab_rounding;
    style.tab_min_width_for_close_button = defaults.tab_min_width_for_close_button;
    style.display_window_padding = defaults.display_window_padding;
    style.display_safe_area_padding = defaults.display_safe_area_padding;
    style.mouse_cursor_scale = defaults.mouse_cursor_scale;
}


#[cfg(test)]
use crate::test_fakes::{
    FakePlatform,
    FakeUi,
};

#[cfg(test)]
fn test_font(name: &str, chars: &str) -> FontResource {
    FontResource {
        name: name.to_owned(),
        data: vec![0, 1, 0, 0],
        supported_chars: chars.to_owned(),
    }
}

#[test]
fn test_rebuild_uploads_rgba_atlas() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(None, 13, false);
    fonts.register(Some(test_font("mono", "abc")), 16, false);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();

    let &(width, height, byte_len) = platform.uploaded.last().unwrap();
    assert!(width > 0 && height > 0);
    assert_eq!(byte_len, (width * height * 4) as usize);
    assert_eq!(ui.font_texture, fonts.texture());
    assert!(ui.tex_data_cleared);
}

#[test]
fn test_rebuild_same_inputs_same_dimensions() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(Some(test_font("mono", "abcdef")), 14, false);
    fonts.register(Some(test_font("icons", "xyz")), 14, true);

    fonts.rebuild(&mut ui, &mut platform, 2.0).unwrap();
    fonts.rebuild(&mut ui, &mut platform, 2.0).unwrap();

    assert_eq!(platform.uploaded.len(), 2);
    assert_eq!(platform.uploaded[0], platform.uploaded[1]);
}

#[test]
fn test_rebuild_scales_and_rounds_font_sizes() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(Some(test_font("mono", "ab")), 13, false);

    fonts.rebuild(&mut ui, &mut platform, 1.5).unwrap();

    // 13 * 1.5 = 19.5, rounded to nearest
    assert_eq!(ui.added_fonts[0].size_pixels, 20.0);
    assert_eq!(ui.added_fonts[0].name, "mono, 20px");
}

#[test]
fn test_rebuild_failure_keeps_previous_texture() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(None, 13, false);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    let live = fonts.texture().unwrap();

    platform.fail_texture_upload = true;
    let result = fonts.rebuild(&mut ui, &mut platform, 1.0);
    assert!(result.is_err());
    assert_eq!(fonts.texture(), Some(live));
    assert_eq!(ui.font_texture, Some(live));
    assert!(platform.freed_textures.is_empty());
}

#[test]
fn test_old_texture_freed_only_after_new_published() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(None, 13, false);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    let first = fonts.texture().unwrap();
    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    let second = fonts.texture().unwrap();

    assert_ne!(first, second);
    assert_eq!(platform.freed_textures, vec![first]);
    assert_eq!(ui.font_texture, Some(second));
    // the second upload happened before the first was released
    let create_pos = platform
        .lifecycle()
        .iter()
        .rposition(|entry| entry == &format!("create_texture {}", second.0))
        .unwrap();
    let free_pos = platform
        .lifecycle()
        .iter()
        .position(|entry| entry == &format!("free_texture {}", first.0))
        .unwrap();
    assert!(create_pos < free_pos);
}

#[test]
fn test_default_font_restored_across_rebuild() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(Some(test_font("body", "abc")), 14, false);
    fonts.register(Some(test_font("heading", "abc")), 22, false);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    let heading = ui.fonts()[1];
    ui.set_default_font(Some(heading));

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    // same list position, fresh id generation
    assert_eq!(ui.default_font(), Some(ui.fonts()[1]));
    assert_ne!(ui.default_font(), Some(heading));
}

#[test]
fn test_merge_groups_trigger_build() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(Some(test_font("body", "abc")), 14, false);
    fonts.register(Some(test_font("icons", "xy")), 14, true);
    fonts.register(Some(test_font("heading", "abc")), 22, false);
    fonts.register(Some(test_font("icons", "xy")), 22, true);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    assert_eq!(ui.explicit_build_calls, 2);
}

#[test]
fn test_default_source_uses_builtin_font() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(None, 13, false);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    let config = &ui.added_fonts[0];
    assert!(config.data.is_none());
    assert!(config.pixel_snap_h);
    assert_eq!((config.oversample_h, config.oversample_v), (1, 1));
}

#[test]
fn test_glyph_ranges_minimal() {
    assert_eq!(
        glyph_ranges("cabACE"),
        vec![(65, 65), (67, 67), (69, 69), (97, 99)],
    );
    assert_eq!(glyph_ranges(""), vec![]);
    assert_eq!(glyph_ranges("aa"), vec![(97, 97)]);
}

#[test]
fn test_style_reset_whitelist_never_colors() {
    use vek::*;

    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(None, 13, false);

    let custom = vec![Rgba::new(1.0, 0.0, 0.5, 1.0)];
    ui.style.colors = custom.clone();
    ui.style.window_padding = Vec2::new(99.0, 99.0);
    ui.style.scrollbar_size = 77.0;

    fonts.rebuild(&mut ui, &mut platform, 2.0).unwrap();

    // metrics reset to defaults, then scaled
    assert_eq!(ui.style.window_padding, Vec2::new(16.0, 16.0));
    assert_eq!(ui.style.scrollbar_size, 28.0);
    assert_eq!(ui.style.colors, custom);
}

#[test]
fn test_reset_clears_registered_fonts() {
    let mut ui = FakeUi::new();
    let mut platform = FakePlatform::new();
    let mut fonts = FontAtlasManager::new();
    fonts.register(None, 13, false);
    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();

    fonts.reset(&mut ui);
    assert!(ui.fonts().is_empty());
    assert_eq!(ui.default_font(), None);

    fonts.rebuild(&mut ui, &mut platform, 1.0).unwrap();
    assert!(ui.added_fonts.is_empty());
}
