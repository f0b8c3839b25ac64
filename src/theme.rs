// Light chrome around the preview. The designed theme only paints the
// preview panel; the editor itself keeps these neutral tones so it never
// fights with the colors being picked.

// Backgrounds: #eeeeee (base) and #fafafa (elevated surface)
pub const SURFACE: u32 = 0xeeeeee;
pub const TITLEBAR_BACKGROUND: u32 = 0xfafafa;
pub const PANEL_BACKGROUND: u32 = 0xfafafa;
pub const INPUT_BACKGROUND: u32 = 0xeeeeee;

// Borders
pub const BORDER: u32 = 0xccc9c7;
pub const BORDER_STRONG: u32 = 0x4d4947;
pub const BORDER_FOCUS: u32 = 0xef6f2e;

// Text
pub const TEXT_PRIMARY: u32 = 0x020202;
pub const TEXT_DIM: u32 = 0x5c5855;
pub const TEXT_WHITE: u32 = 0xffffff;

// Primary filled button
pub const BUTTON_FILLED: u32 = 0x020202;
pub const BUTTON_FILLED_HOVER: u32 = 0x4d4947;

// Accent, reserved for selected options and focus
pub const BUTTON_PRIMARY: u32 = 0xef6f2e;
pub const BUTTON_HOVER: u32 = 0xd15010;

// Contrast verdicts
pub const COLOR_GREEN: u32 = 0x107c10;
pub const COLOR_RED: u32 = 0xd93050;

pub const SELECTION: u32 = 0xef6f2e40;

// Checkerboard behind translucent colors
pub const CHECKER_LIGHT: u32 = 0xffffff;
pub const CHECKER_DARK: u32 = 0xd6d3d2;

// Typography
pub const TEXT_SIZE_LARGE: f32 = 20.0;
pub const TEXT_SIZE_MEDIUM: f32 = 13.0;
pub const TEXT_SIZE_SMALL: f32 = 12.0;
pub const TEXT_SIZE_EXTRA_SMALL: f32 = 10.0;

pub const LINE_HEIGHT_MEDIUM: f32 = 18.0;

// Element sizing
pub const ELEMENT_HEIGHT: f32 = 32.0;
pub const TITLEBAR_HEIGHT: f32 = 32.0;
pub const CHANNEL_INPUT_WIDTH: f32 = 56.0;

// Color surfaces
pub const SURFACE_WIDTH: f32 = 300.0;
pub const SATURATION_VALUE_HEIGHT: f32 = 140.0;
pub const TRACK_HEIGHT: f32 = 14.0;
pub const THUMB_SIZE: f32 = 12.0;
pub const SWATCH_SIZE: f32 = 28.0;
pub const SWATCH_LARGE: f32 = 56.0;

// Radius
pub const RADIUS: f32 = 4.0;
pub const CURSOR_WIDTH: f32 = 2.0;

// Spacing
pub const GAP_EXTRA_SMALL: f32 = 4.0;
pub const GAP_SMALL: f32 = 8.0;
pub const GAP_MEDIUM: f32 = 12.0;
pub const GAP_LARGE: f32 = 20.0;

// Padding
pub const PADDING_INPUT_HORIZONTAL: f32 = 10.0;
pub const PADDING_INPUT_VERTICAL: f32 = 6.0;

pub const PADDING_COLUMN: f32 = 20.0;
pub const PADDING_COLUMN_TOP: f32 = 8.0;

// Layout
pub const WINDOW_WIDTH: f32 = 1120.0;
pub const WINDOW_HEIGHT: f32 = 760.0;
pub const LEFT_COLUMN_WIDTH: f32 = 360.0;
