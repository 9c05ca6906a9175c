
use std::{
    path::{
        Path,
        PathBuf,
    },
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
};
use serde::{Serialize, Deserialize};
use anyhow::*;


pub const SETTINGS_FILE_NAME: &'static str = "ui_bridge.json";


/// Bridge configuration surface. A host-side global resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Analog magnitude below which gamepad axes read as zero.
    pub joy_axis_dead_zone: f32,
    /// Swap the physical A and B face buttons for regional controller
    /// layouts.
    pub joy_button_swap_ab: bool,
    /// Global UI scale applied to font sizes and style metrics on atlas
    /// rebuild.
    pub scale: f32,
    /// Where the GUI library persists its window layout, if anywhere.
    /// Made absolute before it is handed to the library.
    pub layout_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            joy_axis_dead_zone: 0.15,
            joy_button_swap_ab: false,
            scale: 1.0,
            layout_file: None,
        }
    }
}

impl Settings {
    pub fn read(path: impl AsRef<Path>) -> Self {
        Self::try_read(path).unwrap_or_default()
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }
}


#[test]
fn test_missing_file_falls_back_to_defaults() {
    let settings = Settings::read("/nonexistent/ui_bridge.json");
    assert_eq!(settings.joy_axis_dead_zone, 0.15);
    assert_eq!(settings.joy_button_swap_ab, false);
    assert_eq!(settings.scale, 1.0);
    assert!(settings.layout_file.is_none());
}

#[test]
fn test_settings_roundtrip() {
    let dir = std::env::temp_dir().join("ui_bridge_settings_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(SETTINGS_FILE_NAME);

    let settings = Settings {
        joy_axis_dead_zone: 0.25,
        joy_button_swap_ab: true,
        scale: 2.0,
        layout_file: Some(PathBuf::from("layout.ini")),
    };
    settings.write(&path).unwrap();
    let read_back = Settings::try_read(&path).unwrap();
    assert_eq!(read_back.joy_axis_dead_zone, 0.25);
    assert_eq!(read_back.joy_button_swap_ab, true);
    assert_eq!(read_back.scale, 2.0);
    assert_eq!(read_back.layout_file, Some(PathBuf::from("layout.ini")));
}
