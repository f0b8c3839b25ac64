use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    color::Color,
    color_editor::Channel,
    palette::{BaseSlot, DEFAULT_FONT, FONT_FAMILIES},
};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChannelLabels {
    pub hex: String,
    pub red: String,
    pub green: String,
    pub blue: String,
    pub alpha: String,
}

impl Default for ChannelLabels {
    fn default() -> Self {
        Self {
            hex: "Hex".into(),
            red: "Red".into(),
            green: "Green".into(),
            blue: "Blue".into(),
            alpha: "Alpha".into(),
        }
    }
}

impl ChannelLabels {
    pub fn label(&self, channel: Channel) -> &str {
        match channel {
            Channel::Hex => &self.hex,
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::Alpha => &self.alpha,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DesignerConfiguration {
    pub primary_color: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub font: Option<String>,
    pub alpha_hidden: bool,
    pub labels: ChannelLabels,
}

impl DesignerConfiguration {
    pub fn file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("theming-designer")
            .join("theming-designer.toml")
    }

    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(configuration) => {
                    log::info!("[configuration] loaded from {}", path.display());
                    configuration
                }
                Err(error) => {
                    log::warn!("[configuration] {}: {error}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "[configuration] no configuration file at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|error| format!("Failed to parse configuration: {error}"))
    }

    /// Starting color for a slot. Values that fail to parse fall back to the slot default.
    pub fn color(&self, slot: BaseSlot) -> Color {
        let configured = match slot {
            BaseSlot::Primary => self.primary_color.as_deref(),
            BaseSlot::Foreground => self.text_color.as_deref(),
            BaseSlot::Background => self.background_color.as_deref(),
        };
        if let Some(value) = configured {
            match Color::parse(value) {
                Ok(color) => return color,
                Err(error) => {
                    log::warn!(
                        "[configuration] {} ignored: {error}",
                        slot.label().to_lowercase()
                    );
                }
            }
        }
        Color::parse(slot.default_color()).unwrap_or_default()
    }

    pub fn font(&self) -> &'static str {
        match self.font.as_deref() {
            None => DEFAULT_FONT,
            Some(font) => match FONT_FAMILIES
                .iter()
                .find(|family| family.eq_ignore_ascii_case(font))
            {
                Some(family) => family,
                None => {
                    log::warn!("[configuration] unknown font {font:?}, using {DEFAULT_FONT}");
                    DEFAULT_FONT
                }
            },
        }
    }
}
