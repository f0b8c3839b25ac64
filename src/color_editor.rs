use std::fmt;

use thiserror::Error;

use crate::color::{
    self, Color, MAX_COLOR_RGB, MAX_HEX_LENGTH, MAX_RGB_LENGTH, MIN_HEX_LENGTH, MIN_RGB_LENGTH,
};

/// A textual facet of a color that has its own input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hex,
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Hex,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
        Channel::Alpha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Alpha => "alpha",
        }
    }

    /// Committed value as a plain number, used to tell typed text apart from
    /// what is already there.
    pub fn raw_value(self, color: &Color) -> String {
        match self {
            Self::Hex => color.hex().to_string(),
            Self::Red => color.red().to_string(),
            Self::Green => color.green().to_string(),
            Self::Blue => color.blue().to_string(),
            Self::Alpha => color.alpha().to_string(),
        }
    }

    /// Committed value as shown in the channel's field.
    pub fn display_value(self, color: &Color) -> String {
        match self {
            Self::Alpha => format!("{:.1}", color.alpha()),
            _ => self.raw_value(color),
        }
    }

    /// Whether typed text spells the committed value; hex ignores case.
    fn matches_raw(self, color: &Color, text: &str) -> bool {
        let raw = self.raw_value(color);
        match self {
            Self::Hex => raw.eq_ignore_ascii_case(text),
            _ => raw == text,
        }
    }

    fn clamp_length(self, text: &str) -> String {
        match self {
            Self::Hex => text.chars().take(MAX_HEX_LENGTH).collect(),
            // Alpha shows one decimal place; drop everything after the first
            // `.` followed by a digit.
            Self::Alpha => text
                .as_bytes()
                .windows(2)
                .position(|pair| pair[0] == b'.' && pair[1].is_ascii_digit())
                .map(|dot| text[..dot + 2].to_string())
                .unwrap_or_else(|| text.to_string()),
            _ => text.chars().take(MAX_RGB_LENGTH).collect(),
        }
    }

    fn accepts_characters(self, text: &str) -> bool {
        let digits = |part: &str, max: usize| {
            part.len() <= max && part.chars().all(|character| character.is_ascii_digit())
        };
        match self {
            Self::Hex => {
                text.len() <= MAX_HEX_LENGTH
                    && text.chars().all(|character| character.is_ascii_hexdigit())
            }
            Self::Alpha => match text.split_once('.') {
                Some((whole, fraction)) => digits(whole, 3) && digits(fraction, 1),
                None => digits(text, 3),
            },
            _ => digits(text, MAX_RGB_LENGTH),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color format: {0:?}")]
    InvalidColorFormat(String),
    #[error("rejected characters in {channel} field: {text:?}")]
    RejectedCharacter { channel: Channel, text: String },
    #[error("{channel} value is not complete yet")]
    IncompleteValue { channel: Channel },
}

/// Text typed into one channel that does not form a committable value yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub channel: Channel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// A different color was committed; the owner should be told.
    Changed(Color),
    /// The edit resolved to the color already committed.
    Unchanged,
    /// The text is kept as a pending edit for display.
    Pending,
    /// A pending edit could not be corrected and was dropped.
    Reverted,
}

/// Reconciles the committed color with text, slider and surface edits.
#[derive(Debug, Clone)]
pub struct ColorEditor {
    color: Color,
    pending: Option<PendingEdit>,
}

impl ColorEditor {
    pub fn new(initial: Option<Color>) -> Self {
        Self {
            color: initial.unwrap_or_default(),
            pending: None,
        }
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        self.pending.as_ref()
    }

    /// Replaces the color from outside. Never reported as a change.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.pending = None;
    }

    pub fn set_color_str(&mut self, input: &str) -> Result<(), ColorError> {
        let color = Color::parse(input)?;
        self.set_color(color);
        Ok(())
    }

    pub fn set_hue(&mut self, hue: f64) -> EditOutcome {
        let candidate = self.color.with_hue(hue);
        self.commit(candidate)
    }

    pub fn set_saturation_value(&mut self, saturation: f64, value: f64) -> EditOutcome {
        let candidate = self.color.with_saturation_value(saturation, value);
        self.commit(candidate)
    }

    pub fn set_alpha(&mut self, alpha: f64) -> EditOutcome {
        let candidate = self.color.with_alpha(alpha);
        self.commit(candidate)
    }

    /// Applies one keystroke's worth of text to a channel.
    ///
    /// Text with characters the channel never accepts is rejected without any
    /// state change. Text that is acceptable but not yet complete becomes the
    /// pending edit unless it matches the committed value.
    pub fn edit_text(&mut self, channel: Channel, text: &str) -> Result<EditOutcome, ColorError> {
        let text = channel.clamp_length(text);
        if !channel.accepts_characters(&text) {
            return Err(ColorError::RejectedCharacter { channel, text });
        }

        // Retyping the committed value must not rebuild the color: a hex
        // parse is opaque and would drop the alpha.
        if channel.matches_raw(&self.color, &text) {
            self.pending = None;
            return Ok(EditOutcome::Unchanged);
        }

        match self.typed_candidate(channel, &text) {
            Ok(candidate) => Ok(self.commit(candidate)),
            Err(ColorError::IncompleteValue { .. }) => {
                self.pending = Some(PendingEdit { channel, text });
                Ok(EditOutcome::Pending)
            }
            Err(error) => Err(error),
        }
    }

    /// Resolves the pending edit when its field loses focus: corrected into a
    /// color when possible, dropped otherwise.
    pub fn blur(&mut self) -> EditOutcome {
        let Some(pending) = self.pending.take() else {
            return EditOutcome::Unchanged;
        };
        match self.corrected_candidate(&pending) {
            Some(candidate) => self.commit(candidate),
            None => EditOutcome::Reverted,
        }
    }

    pub fn display_value(&self, channel: Channel) -> String {
        match &self.pending {
            Some(pending) if pending.channel == channel => pending.text.clone(),
            _ => channel.display_value(&self.color),
        }
    }

    fn typed_candidate(&self, channel: Channel, text: &str) -> Result<Color, ColorError> {
        let incomplete = ColorError::IncompleteValue { channel };
        if text.is_empty() {
            return Err(incomplete);
        }
        match channel {
            // Decimals are only settled on blur.
            Channel::Alpha => Err(incomplete),
            Channel::Hex if text.len() == MAX_HEX_LENGTH => Color::parse(&format!("#{text}")),
            Channel::Hex => Err(incomplete),
            _ => match text.parse::<u16>() {
                Ok(number) if number <= u16::from(MAX_COLOR_RGB) => {
                    Ok(self.with_channel(channel, f64::from(number)))
                }
                _ => Err(incomplete),
            },
        }
    }

    fn corrected_candidate(&self, pending: &PendingEdit) -> Option<Color> {
        let text = pending.text.as_str();
        match pending.channel {
            Channel::Hex if text.chars().count() >= MIN_HEX_LENGTH => {
                Color::parse(&format!("#{}", color::correct_hex(text))).ok()
            }
            Channel::Hex => None,
            channel if text.len() >= MIN_RGB_LENGTH => text
                .parse::<f64>()
                .ok()
                .map(|number| self.with_channel(channel, number)),
            _ => None,
        }
    }

    fn with_channel(&self, channel: Channel, number: f64) -> Color {
        let color = &self.color;
        let mut red = f64::from(color.red());
        let mut green = f64::from(color.green());
        let mut blue = f64::from(color.blue());
        let mut alpha = color.alpha();
        match channel {
            Channel::Red => red = number,
            Channel::Green => green = number,
            Channel::Blue => blue = number,
            Channel::Alpha => alpha = number,
            Channel::Hex => {}
        }
        color::correct_rgb(red, green, blue, alpha)
    }

    fn commit(&mut self, candidate: Color) -> EditOutcome {
        self.pending = None;
        let differs = candidate.hue() != self.color.hue()
            || candidate.display() != self.color.display();
        if differs {
            self.color = candidate.clone();
            EditOutcome::Changed(candidate)
        } else {
            EditOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn editor(input: &str) -> ColorEditor {
        ColorEditor::new(Some(Color::parse(input).unwrap()))
    }

    fn displayed(editor: &ColorEditor) -> Vec<String> {
        Channel::ALL
            .iter()
            .map(|channel| editor.display_value(*channel))
            .collect()
    }

    #[test]
    fn starts_white_without_initial_color() {
        let editor = ColorEditor::new(None);
        assert_eq!(editor.color().hex(), "ffffff");
        assert_eq!(editor.display_value(Channel::Alpha), "100.0");
        assert!(editor.pending().is_none());
    }

    #[test]
    fn hue_drag_commits_once() {
        let mut editor = editor("#0078D4");
        let notifications: Vec<Color> = [editor.set_hue(0.0), editor.set_hue(0.0)]
            .into_iter()
            .filter_map(|outcome| match outcome {
                EditOutcome::Changed(color) => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].hex(), "d40000");
        assert_eq!(editor.display_value(Channel::Hex), "d40000");
        assert_eq!(editor.display_value(Channel::Red), "212");
    }

    #[test]
    fn hue_only_change_is_reported() {
        let mut editor = editor("#808080");
        match editor.set_hue(200.0) {
            EditOutcome::Changed(color) => {
                assert_eq!(color.hue(), 200.0);
                assert_eq!(color.hex(), "808080");
            }
            outcome => panic!("unexpected outcome {outcome:?}"),
        }
    }

    #[test]
    fn saturation_value_and_alpha_surfaces() {
        let mut editor = editor("#ff0000");
        assert!(matches!(
            editor.set_saturation_value(0.0, 100.0),
            EditOutcome::Changed(_)
        ));
        assert_eq!(editor.color().hex(), "ffffff");

        assert!(matches!(editor.set_alpha(40.0), EditOutcome::Changed(_)));
        assert_eq!(editor.display_value(Channel::Alpha), "40.0");
        assert_eq!(editor.set_alpha(40.0), EditOutcome::Unchanged);
    }

    #[test]
    fn six_hex_digits_commit_immediately() {
        let mut editor = editor("rgba(0, 0, 0, 0.5)");
        let outcome = editor.edit_text(Channel::Hex, "00FF00").unwrap();
        assert!(matches!(outcome, EditOutcome::Changed(_)));
        assert_eq!(editor.color().hex(), "00ff00");
        // Parsing a hex string yields an opaque color.
        assert_eq!(editor.color().alpha(), 100.0);
        assert!(editor.pending().is_none());
    }

    #[test]
    fn short_hex_stays_pending_until_blur() {
        let mut editor = editor("#0078d4");
        assert_eq!(
            editor.edit_text(Channel::Hex, "abc").unwrap(),
            EditOutcome::Pending
        );
        assert_eq!(editor.color().hex(), "0078d4");
        assert_eq!(editor.display_value(Channel::Hex), "abc");

        match editor.blur() {
            EditOutcome::Changed(color) => assert_eq!(color.hex(), "aabbcc"),
            outcome => panic!("unexpected outcome {outcome:?}"),
        }
        assert!(editor.pending().is_none());
    }

    #[test]
    fn hex_blur_corrections() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Hex, "abcde").unwrap();
        editor.blur();
        assert_eq!(editor.color().hex(), "aabbcc");

        editor.edit_text(Channel::Hex, "12").unwrap();
        assert_eq!(editor.blur(), EditOutcome::Reverted);
        assert_eq!(editor.color().hex(), "aabbcc");
        assert_eq!(editor.display_value(Channel::Hex), "aabbcc");
    }

    #[test]
    fn overlong_text_is_truncated() {
        let mut editor = editor("#000000");
        editor.edit_text(Channel::Hex, "1234567").unwrap();
        assert_eq!(editor.color().hex(), "123456");

        let outcome = editor.edit_text(Channel::Red, "2001").unwrap();
        assert!(matches!(outcome, EditOutcome::Changed(_)));
        assert_eq!(editor.color().red(), 200);
    }

    #[test]
    fn rejected_keystroke_changes_nothing() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Green, "").unwrap();
        let before = displayed(&editor);
        let pending = editor.pending().cloned();

        let error = editor.edit_text(Channel::Red, "1x").unwrap_err();
        assert_eq!(
            error,
            ColorError::RejectedCharacter {
                channel: Channel::Red,
                text: "1x".into()
            }
        );
        assert_eq!(displayed(&editor), before);
        assert_eq!(editor.pending().cloned(), pending);

        assert!(editor.edit_text(Channel::Hex, "12345g").is_err());
        assert!(editor.edit_text(Channel::Alpha, "1a").is_err());
        assert!(editor.edit_text(Channel::Alpha, "1000").is_err());
        assert!(editor.edit_text(Channel::Alpha, "-1").is_err());
    }

    #[test]
    fn rgb_out_of_range_is_pending_then_clamped() {
        let mut editor = editor("#0078d4");
        assert_eq!(
            editor.edit_text(Channel::Red, "300").unwrap(),
            EditOutcome::Pending
        );
        assert_eq!(editor.display_value(Channel::Red), "300");
        assert_eq!(editor.color().red(), 0);

        match editor.blur() {
            EditOutcome::Changed(color) => assert_eq!(color.hex(), "ff78d4"),
            outcome => panic!("unexpected outcome {outcome:?}"),
        }
    }

    #[test]
    fn empty_text_reverts_on_blur() {
        let mut editor = editor("#0078d4");
        assert_eq!(
            editor.edit_text(Channel::Blue, "").unwrap(),
            EditOutcome::Pending
        );
        assert_eq!(editor.display_value(Channel::Blue), "");
        assert_eq!(editor.blur(), EditOutcome::Reverted);
        assert_eq!(editor.display_value(Channel::Blue), "212");
    }

    #[test]
    fn blur_without_pending_is_a_no_op() {
        let mut editor = editor("#0078d4");
        assert_eq!(editor.blur(), EditOutcome::Unchanged);
        assert_eq!(editor.color().hex(), "0078d4");
    }

    #[test]
    fn alpha_waits_for_blur() {
        let mut editor = ColorEditor::new(Some(Color::from_rgba(0, 120, 212, 0.5)));
        assert_eq!(editor.display_value(Channel::Alpha), "0.5");

        assert_eq!(
            editor.edit_text(Channel::Alpha, "1").unwrap(),
            EditOutcome::Pending
        );
        assert_eq!(editor.display_value(Channel::Alpha), "1");
        assert_eq!(editor.color().alpha(), 0.5);

        match editor.blur() {
            EditOutcome::Changed(color) => assert_eq!(color.alpha(), 1.0),
            outcome => panic!("unexpected outcome {outcome:?}"),
        }
        assert_eq!(editor.display_value(Channel::Alpha), "1.0");
    }

    #[test]
    fn alpha_keeps_a_single_decimal() {
        let mut editor = ColorEditor::new(Some(Color::from_rgba(0, 120, 212, 1.0)));
        assert_eq!(editor.display_value(Channel::Alpha), "1.0");

        assert_eq!(
            editor.edit_text(Channel::Alpha, "1.05").unwrap(),
            EditOutcome::Pending
        );
        let pending = editor.pending().unwrap();
        assert_eq!(pending.channel, Channel::Alpha);
        assert_eq!(pending.text, "1.0");
    }

    #[test]
    fn alpha_out_of_range_is_clamped_on_blur() {
        let mut editor = editor("rgba(0, 120, 212, 0.5)");
        editor.edit_text(Channel::Alpha, "150").unwrap();
        editor.blur();
        assert_eq!(editor.color().alpha(), 100.0);
        assert_eq!(editor.color().display(), "#0078d4");
    }

    #[test]
    fn lone_decimal_point_reverts() {
        let mut editor = editor("rgba(0, 120, 212, 0.5)");
        assert_eq!(
            editor.edit_text(Channel::Alpha, ".").unwrap(),
            EditOutcome::Pending
        );
        assert_eq!(editor.blur(), EditOutcome::Reverted);
        assert_eq!(editor.color().alpha(), 50.0);
    }

    #[test]
    fn text_matching_committed_value_clears_pending() {
        let mut editor = editor("rgba(0, 120, 212, 0.5)");
        editor.edit_text(Channel::Alpha, "5").unwrap();
        assert!(editor.pending().is_some());

        assert_eq!(
            editor.edit_text(Channel::Alpha, "50").unwrap(),
            EditOutcome::Unchanged
        );
        assert!(editor.pending().is_none());
        assert_eq!(editor.display_value(Channel::Alpha), "50.0");
    }

    #[test]
    fn valid_text_equal_to_committed_resolves_silently() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Red, "").unwrap();
        assert_eq!(
            editor.edit_text(Channel::Red, "0").unwrap(),
            EditOutcome::Unchanged
        );
        assert!(editor.pending().is_none());
    }

    #[test]
    fn retyping_committed_hex_keeps_alpha() {
        let mut editor = editor("rgba(0, 120, 212, 0.5)");
        assert_eq!(
            editor.edit_text(Channel::Hex, "0078d").unwrap(),
            EditOutcome::Pending
        );
        assert_eq!(
            editor.edit_text(Channel::Hex, "0078D4").unwrap(),
            EditOutcome::Unchanged
        );
        assert!(editor.pending().is_none());
        assert_eq!(editor.color().alpha(), 50.0);
        assert_eq!(editor.color().display(), "rgba(0, 120, 212, 0.5)");

        // A different hex still commits as an opaque color.
        assert!(matches!(
            editor.edit_text(Channel::Hex, "0078d5").unwrap(),
            EditOutcome::Changed(_)
        ));
        assert_eq!(editor.color().alpha(), 100.0);
    }

    #[test]
    fn switching_channels_abandons_pending_edit() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Red, "").unwrap();
        editor.edit_text(Channel::Green, "3000").unwrap();

        let pending = editor.pending().unwrap();
        assert_eq!(pending.channel, Channel::Green);
        assert_eq!(pending.text, "300");
        assert_eq!(editor.display_value(Channel::Red), "0");

        editor.blur();
        assert_eq!(editor.color().red(), 0);
        assert_eq!(editor.color().green(), 255);
    }

    #[test]
    fn geometric_edit_clears_pending() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Hex, "12").unwrap();
        editor.set_hue(100.0);
        assert!(editor.pending().is_none());
    }

    #[test]
    fn external_color_replaces_without_notification() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Red, "").unwrap();

        editor.set_color(Color::parse("#0078d4").unwrap());
        assert!(editor.pending().is_none());
        assert_eq!(editor.display_value(Channel::Red), "0");

        editor.set_color_str("rgb(1, 2, 3)").unwrap();
        assert_eq!(editor.color().hex(), "010203");
    }

    #[test]
    fn unparseable_external_color_keeps_state() {
        let mut editor = editor("#0078d4");
        editor.edit_text(Channel::Hex, "ab").unwrap();

        let error = editor.set_color_str("#nope").unwrap_err();
        assert_eq!(error, ColorError::InvalidColorFormat("#nope".into()));
        assert_eq!(editor.color().hex(), "0078d4");
        assert_eq!(editor.display_value(Channel::Hex), "ab");
    }

    proptest! {
        #[test]
        fn hex_round_trips(hex in "[0-9a-fA-F]{6}") {
            let mut editor = ColorEditor::new(None);
            editor.edit_text(Channel::Hex, &hex).unwrap();
            let shown = editor.display_value(Channel::Hex);
            prop_assert!(shown.eq_ignore_ascii_case(&hex));
            prop_assert!(editor.pending().is_none());
        }

        #[test]
        fn red_edit_keeps_channels_consistent(
            red in 0u8..=255,
            green in 0u8..=255,
            blue in 0u8..=255,
            start in 0u8..=255,
            alpha in 0u8..=100,
        ) {
            let alpha = f64::from(alpha);
            let mut editor = ColorEditor::new(Some(Color::from_rgba(start, green, blue, alpha)));
            editor.edit_text(Channel::Red, &red.to_string()).unwrap();

            let expected = Color::from_rgba(red, green, blue, alpha);
            prop_assert_eq!(editor.display_value(Channel::Red), red.to_string());
            prop_assert_eq!(editor.display_value(Channel::Green), green.to_string());
            prop_assert_eq!(editor.display_value(Channel::Blue), blue.to_string());
            prop_assert_eq!(editor.display_value(Channel::Hex), expected.hex());
            prop_assert_eq!(editor.display_value(Channel::Alpha), format!("{alpha:.1}"));
        }

        #[test]
        fn non_digit_rgb_input_is_rejected(text in "[0-9]{0,2}[a-zA-Z .,+-]") {
            let mut editor = ColorEditor::new(Some(Color::parse("#336699").unwrap()));
            let before = displayed(&editor);
            for channel in [Channel::Red, Channel::Green, Channel::Blue] {
                let rejected = matches!(
                    editor.edit_text(channel, &text),
                    Err(ColorError::RejectedCharacter { .. })
                );
                prop_assert!(rejected);
            }
            prop_assert_eq!(displayed(&editor), before);
            prop_assert!(editor.pending().is_none());
        }
    }
}
