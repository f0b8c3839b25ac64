use serde::Serialize;

use crate::color::{Color, contrast_ratio};

pub const FONT_FAMILIES: [&str; 5] = [
    "Arial Black",
    "Times New Roman",
    "Comic Sans MS",
    "Calibri",
    "Audiowide",
];
pub const DEFAULT_FONT: &str = "Audiowide";

// WCAG AA for body text
pub const MINIMUM_CONTRAST: f64 = 4.5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BaseSlot {
    Primary,
    Foreground,
    Background,
}

impl BaseSlot {
    pub const ALL: [BaseSlot; 3] = [BaseSlot::Primary, BaseSlot::Foreground, BaseSlot::Background];

    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary color",
            Self::Foreground => "Text color",
            Self::Background => "Background color",
        }
    }

    pub fn default_color(self) -> &'static str {
        match self {
            Self::Primary => "#0078d4",
            Self::Foreground => "#323130",
            Self::Background => "#ffffff",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BaseColors {
    pub primary: Color,
    pub foreground: Color,
    pub background: Color,
}

impl BaseColors {
    pub fn get(&self, slot: BaseSlot) -> &Color {
        match slot {
            BaseSlot::Primary => &self.primary,
            BaseSlot::Foreground => &self.foreground,
            BaseSlot::Background => &self.background,
        }
    }

    pub fn set(&mut self, slot: BaseSlot, color: Color) {
        match slot {
            BaseSlot::Primary => self.primary = color,
            BaseSlot::Foreground => self.foreground = color,
            BaseSlot::Background => self.background = color,
        }
    }
}

/// Snapshot of the theme the preview renders with.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTheme {
    pub primary_color: Color,
    pub foreground_color: Color,
    pub background_color: Color,
    pub is_inverted: bool,
    pub font_family: String,
}

impl DesignTheme {
    pub fn new(colors: &BaseColors, font_family: &str) -> Self {
        Self {
            primary_color: colors.primary.clone(),
            foreground_color: colors.foreground.clone(),
            background_color: colors.background.clone(),
            is_inverted: colors.background.is_dark(),
            font_family: font_family.to_string(),
        }
    }

    pub fn slot(&self, slot: BaseSlot) -> &Color {
        match slot {
            BaseSlot::Primary => &self.primary_color,
            BaseSlot::Foreground => &self.foreground_color,
            BaseSlot::Background => &self.background_color,
        }
    }

    pub fn contrast_report(&self) -> Vec<ContrastCheck> {
        let white = Color::default();
        vec![
            ContrastCheck::new(
                "Text on background",
                &self.foreground_color,
                &self.background_color,
            ),
            ContrastCheck::new(
                "Primary on background",
                &self.primary_color,
                &self.background_color,
            ),
            ContrastCheck::new("White on primary", &white, &self.primary_color),
        ]
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|error| format!("Failed to serialize theme: {error}"))
    }
}

#[derive(Clone, Debug)]
pub struct ContrastCheck {
    pub label: &'static str,
    pub foreground: Color,
    pub background: Color,
    pub ratio: f64,
}

impl ContrastCheck {
    fn new(label: &'static str, foreground: &Color, background: &Color) -> Self {
        Self {
            label,
            foreground: foreground.clone(),
            background: background.clone(),
            ratio: contrast_ratio(foreground, background),
        }
    }

    pub fn passes(&self) -> bool {
        self.ratio >= MINIMUM_CONTRAST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_colors() -> BaseColors {
        let color = |slot: BaseSlot| Color::parse(slot.default_color()).unwrap();
        BaseColors {
            primary: color(BaseSlot::Primary),
            foreground: color(BaseSlot::Foreground),
            background: color(BaseSlot::Background),
        }
    }

    #[test]
    fn light_background_is_not_inverted() {
        let theme = DesignTheme::new(&default_colors(), DEFAULT_FONT);
        assert!(!theme.is_inverted);
        assert_eq!(theme.slot(BaseSlot::Primary).hex(), "0078d4");
        assert_eq!(theme.font_family, "Audiowide");
    }

    #[test]
    fn dark_background_inverts() {
        let mut colors = default_colors();
        colors.set(BaseSlot::Background, Color::parse("#201f1e").unwrap());
        assert_eq!(colors.get(BaseSlot::Background).hex(), "201f1e");
        assert!(DesignTheme::new(&colors, DEFAULT_FONT).is_inverted);
    }

    #[test]
    fn contrast_report_flags_low_contrast() {
        let theme = DesignTheme::new(&default_colors(), DEFAULT_FONT);
        let report = theme.contrast_report();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].label, "Text on background");
        assert!(report[0].passes());

        let mut colors = default_colors();
        colors.set(BaseSlot::Foreground, Color::parse("#eeeeee").unwrap());
        let report = DesignTheme::new(&colors, DEFAULT_FONT).contrast_report();
        assert!(!report[0].passes());
        assert!(report[0].ratio < 1.5);
    }

    #[test]
    fn exports_json() {
        let mut colors = default_colors();
        colors.set(BaseSlot::Primary, Color::parse("rgba(0, 120, 212, 0.5)").unwrap());
        let json = DesignTheme::new(&colors, "Calibri").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["primaryColor"], "rgba(0, 120, 212, 0.5)");
        assert_eq!(value["foregroundColor"], "#323130");
        assert_eq!(value["backgroundColor"], "#ffffff");
        assert_eq!(value["isInverted"], false);
        assert_eq!(value["fontFamily"], "Calibri");
    }
}
