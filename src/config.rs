//! Application Configuration
//! Fixed defaults for the data directory, CSV decoding and chart appearance.

use std::path::{Path, PathBuf};

/// Text encoding used to decode CSV bytes before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// ISO-8859-1: every byte maps to the code point of the same value.
    #[default]
    Latin1,
    Utf8,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Utf8 => "UTF-8",
        }
    }
}

/// Canvas and font sizes for rendered charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub title_font_size: f64,
    pub label_font_size: f64,
    pub tick_font_size: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        // 6x4 inches at 100 dpi
        Self {
            width: 600,
            height: 400,
            title_font_size: 12.0,
            label_font_size: 10.0,
            tick_font_size: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory name resolved next to the executable.
    pub data_dir_name: String,
    pub extension: String,
    pub encoding: TextEncoding,
    pub preview_rows: usize,
    pub chart: ChartStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir_name: "data".to_string(),
            extension: "csv".to_string(),
            encoding: TextEncoding::Latin1,
            preview_rows: 5,
            chart: ChartStyle::default(),
        }
    }
}

impl AppConfig {
    /// Resolve the data directory relative to the running executable.
    ///
    /// Falls back to the current directory when the executable path is unknown.
    pub fn data_dir(&self) -> PathBuf {
        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(&self.data_dir_name)
    }
}
