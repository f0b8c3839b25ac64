use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::color_editor::ColorError;

pub const MAX_COLOR_HUE: f64 = 359.0;
pub const MAX_COLOR_SATURATION: f64 = 100.0;
pub const MAX_COLOR_VALUE: f64 = 100.0;
pub const MAX_COLOR_RGB: u8 = 255;
pub const MAX_COLOR_ALPHA: f64 = 100.0;

pub const MIN_HEX_LENGTH: usize = 3;
pub const MAX_HEX_LENGTH: usize = 6;
pub const MIN_RGB_LENGTH: usize = 1;
pub const MAX_RGB_LENGTH: usize = 3;

const NAMED_COLORS: [(&str, u32); 17] = [
    ("black", 0x000000),
    ("silver", 0xc0c0c0),
    ("gray", 0x808080),
    ("white", 0xffffff),
    ("maroon", 0x800000),
    ("red", 0xff0000),
    ("purple", 0x800080),
    ("fuchsia", 0xff00ff),
    ("green", 0x008000),
    ("lime", 0x00ff00),
    ("olive", 0x808000),
    ("yellow", 0xffff00),
    ("navy", 0x000080),
    ("blue", 0x0000ff),
    ("teal", 0x008080),
    ("aqua", 0x00ffff),
    ("orange", 0xffa500),
];

/// A fully resolved color.
///
/// Every representation (HSV, RGB, alpha, hex, display string) is derived once
/// at construction; updates go through the `with_*` methods, which return a new
/// value.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    hue: f64,
    saturation: f64,
    value: f64,
    red: u8,
    green: u8,
    blue: u8,
    alpha: f64,
    hex: String,
    display: String,
}

impl Color {
    /// Parses `#rgb`, `#rrggbb`, `rgb()`, `rgba()`, `hsl()`, `hsla()`, the basic
    /// CSS color names and `transparent`.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let normalized = input.trim().to_ascii_lowercase();
        parse_components(&normalized)
            .map(|(red, green, blue, alpha)| Self::from_rgba(red, green, blue, alpha))
            .ok_or_else(|| ColorError::InvalidColorFormat(input.trim().to_string()))
    }

    pub fn from_rgba(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        let (hue, saturation, value) = rgb_to_hsv(red, green, blue);
        let hex = rgb_to_hex(red, green, blue);
        let display = display_string(red, green, blue, alpha, &hex);
        Self {
            hue,
            saturation,
            value,
            red,
            green,
            blue,
            alpha,
            hex,
            display,
        }
    }

    pub fn with_hue(&self, hue: f64) -> Self {
        let hue = hue.clamp(0.0, MAX_COLOR_HUE);
        self.with_hsv(hue, self.saturation, self.value)
    }

    pub fn with_saturation_value(&self, saturation: f64, value: f64) -> Self {
        let saturation = round_half_up(saturation.clamp(0.0, MAX_COLOR_SATURATION));
        let value = round_half_up(value.clamp(0.0, MAX_COLOR_VALUE));
        self.with_hsv(self.hue, saturation, value)
    }

    pub fn with_alpha(&self, alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, MAX_COLOR_ALPHA);
        Self {
            alpha,
            display: display_string(self.red, self.green, self.blue, alpha, &self.hex),
            ..self.clone()
        }
    }

    fn with_hsv(&self, hue: f64, saturation: f64, value: f64) -> Self {
        let (red, green, blue) = hsv_to_rgb(hue, saturation, value);
        let hex = rgb_to_hex(red, green, blue);
        let display = display_string(red, green, blue, self.alpha, &hex);
        Self {
            hue,
            saturation,
            value,
            red,
            green,
            blue,
            alpha: self.alpha,
            hex,
            display,
        }
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Opacity in percent, 0 to 100.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Six lowercase hex digits without `#`.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn to_rgb_u32(&self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    pub fn to_rgba_u32(&self) -> u32 {
        let alpha = round_half_up(self.alpha / MAX_COLOR_ALPHA * 255.0) as u32;
        (self.to_rgb_u32() << 8) | alpha
    }

    pub fn is_dark(&self) -> bool {
        let (_, _, lightness) = hsv_to_hsl(self.hue, self.saturation, self.value);
        lightness < 50.0
    }

    fn relative_luminance(&self) -> f64 {
        let linear = |channel: u8| {
            let channel = f64::from(channel) / 255.0;
            if channel <= 0.03928 {
                channel / 12.92
            } else {
                ((channel + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.red) + 0.7152 * linear(self.green) + 0.0722 * linear(self.blue)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgba(MAX_COLOR_RGB, MAX_COLOR_RGB, MAX_COLOR_RGB, MAX_COLOR_ALPHA)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

/// WCAG contrast ratio between two colors, lighter luminance first. Alpha is ignored.
pub fn contrast_ratio(first: &Color, second: &Color) -> f64 {
    let first = first.relative_luminance();
    let second = second.relative_luminance();
    let (lighter, darker) = if first >= second {
        (first, second)
    } else {
        (second, first)
    };
    (lighter + 0.05) / (darker + 0.05)
}

/// Rounds and clamps loose channel values into a color.
pub fn correct_rgb(red: f64, green: f64, blue: f64, alpha: f64) -> Color {
    let channel = |value: f64| round_half_up(value.clamp(0.0, f64::from(MAX_COLOR_RGB))) as u8;
    Color::from_rgba(
        channel(red),
        channel(green),
        channel(blue),
        alpha.clamp(0.0, MAX_COLOR_ALPHA),
    )
}

/// Brings a hex digit string to a parseable length: six digits are kept, longer
/// input is truncated to six, three to five digits become the three-digit
/// shorthand, and anything shorter falls back to white.
pub fn correct_hex(hex: &str) -> String {
    let length = hex.chars().count();
    if length < MIN_HEX_LENGTH {
        "ffffff".into()
    } else if length >= MAX_HEX_LENGTH {
        hex.chars().take(MAX_HEX_LENGTH).collect()
    } else {
        hex.chars().take(MIN_HEX_LENGTH).collect()
    }
}

pub fn rgb_to_hex(red: u8, green: u8, blue: u8) -> String {
    format!("{red:02x}{green:02x}{blue:02x}")
}

/// Hue in degrees (0 to 359), saturation and value in percent, all rounded.
pub fn rgb_to_hsv(red: u8, green: u8, blue: u8) -> (f64, f64, f64) {
    let (red, green, blue) = (f64::from(red), f64::from(green), f64::from(blue));
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let delta = max - min;

    let sector = if delta == 0.0 {
        0.0
    } else if red == max {
        ((green - blue) / delta) % 6.0
    } else if green == max {
        (blue - red) / delta + 2.0
    } else {
        (red - green) / delta + 4.0
    };

    let mut hue = round_half_up(sector * 60.0);
    if hue < 0.0 {
        hue += 360.0;
    }
    let saturation = round_half_up(if max == 0.0 { 0.0 } else { delta / max } * 100.0);
    let value = round_half_up(max / f64::from(MAX_COLOR_RGB) * 100.0);
    (hue, saturation, value)
}

pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let saturation = saturation / MAX_COLOR_SATURATION;
    let value = value / MAX_COLOR_VALUE;
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let secondary = chroma * (1.0 - ((sector % 2.0) - 1.0).abs());
    let offset = value - chroma;

    let (red, green, blue) = match sector.floor() as i32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };

    let channel = |fraction: f64| {
        round_half_up(f64::from(MAX_COLOR_RGB) * (fraction + offset))
            .clamp(0.0, f64::from(MAX_COLOR_RGB)) as u8
    };
    (channel(red), channel(green), channel(blue))
}

pub fn hsl_to_hsv(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    let saturation = saturation
        * if lightness < 50.0 {
            lightness
        } else {
            100.0 - lightness
        }
        / 100.0;
    let value = lightness + saturation;
    let saturation = if value == 0.0 {
        0.0
    } else {
        2.0 * saturation / value * 100.0
    };
    (hue, saturation, value)
}

pub fn hsv_to_hsl(hue: f64, saturation: f64, value: f64) -> (f64, f64, f64) {
    let saturation = saturation / MAX_COLOR_SATURATION;
    let value = value / MAX_COLOR_VALUE;
    let lightness = (2.0 - saturation) * value;
    let divisor = if lightness <= 1.0 {
        lightness
    } else {
        2.0 - lightness
    };
    let hsl_saturation = saturation * value / divisor;
    let hsl_saturation = if hsl_saturation.is_finite() {
        hsl_saturation
    } else {
        0.0
    };
    (hue, hsl_saturation * 100.0, lightness / 2.0 * 100.0)
}

fn display_string(red: u8, green: u8, blue: u8, alpha: f64, hex: &str) -> String {
    if alpha == MAX_COLOR_ALPHA {
        format!("#{hex}")
    } else {
        format!("rgba({red}, {green}, {blue}, {})", alpha / MAX_COLOR_ALPHA)
    }
}

// Halves round towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn split_rgb(packed: u32) -> (u8, u8, u8) {
    (
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    )
}

fn parse_components(input: &str) -> Option<(u8, u8, u8, f64)> {
    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex).map(|(red, green, blue)| (red, green, blue, MAX_COLOR_ALPHA));
    }
    if input == "transparent" {
        return Some((0, 0, 0, 0.0));
    }
    if let Some((_, packed)) = NAMED_COLORS.iter().find(|(name, _)| *name == input) {
        let (red, green, blue) = split_rgb(*packed);
        return Some((red, green, blue, MAX_COLOR_ALPHA));
    }

    let (function, arguments) = input.strip_suffix(')')?.split_once('(')?;
    let arguments: Vec<&str> = arguments.split(',').map(str::trim).collect();
    match (function.trim(), arguments.as_slice()) {
        ("rgb", [red, green, blue]) => parse_rgb(red, green, blue, None),
        ("rgba", [red, green, blue, alpha]) => parse_rgb(red, green, blue, Some(*alpha)),
        ("hsl", [hue, saturation, lightness]) => parse_hsl(hue, saturation, lightness, None),
        ("hsla", [hue, saturation, lightness, alpha]) => {
            parse_hsl(hue, saturation, lightness, Some(*alpha))
        }
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|character| character.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |index: usize| u8::from_str_radix(&hex[index..index + 1], 16).ok();
            Some((digit(0)? * 17, digit(1)? * 17, digit(2)? * 17))
        }
        6 => {
            let byte = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

fn parse_rgb(red: &str, green: &str, blue: &str, alpha: Option<&str>) -> Option<(u8, u8, u8, f64)> {
    let channel = |text: &str| {
        let value: f64 = text.parse().ok()?;
        (0.0..=f64::from(MAX_COLOR_RGB))
            .contains(&value)
            .then(|| round_half_up(value) as u8)
    };
    Some((
        channel(red)?,
        channel(green)?,
        channel(blue)?,
        parse_alpha(alpha)?,
    ))
}

fn parse_hsl(
    hue: &str,
    saturation: &str,
    lightness: &str,
    alpha: Option<&str>,
) -> Option<(u8, u8, u8, f64)> {
    let hue: f64 = hue.trim_end_matches("deg").parse().ok()?;
    let percentage = |text: &str| {
        let value: f64 = text.trim_end_matches('%').parse().ok()?;
        (0.0..=100.0).contains(&value).then_some(value)
    };
    if !(0.0..=360.0).contains(&hue) {
        return None;
    }
    let (hue, saturation, value) = hsl_to_hsv(hue, percentage(saturation)?, percentage(lightness)?);
    let (red, green, blue) = hsv_to_rgb(hue, saturation, value);
    Some((red, green, blue, parse_alpha(alpha)?))
}

fn parse_alpha(alpha: Option<&str>) -> Option<f64> {
    let Some(alpha) = alpha else {
        return Some(MAX_COLOR_ALPHA);
    };
    let alpha: f64 = alpha.parse().ok()?;
    (0.0..=1.0)
        .contains(&alpha)
        .then_some(alpha * MAX_COLOR_ALPHA)
}
