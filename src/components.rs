use gpui::{Div, Entity, FocusHandle, Stateful, div, prelude::*, px, rgb, rgba};

use crate::{channel_input::ChannelInput, color::Color, theme::*};

pub fn label(text: &str) -> Div {
    div()
        .px(px(GAP_EXTRA_SMALL))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(TEXT_DIM))
        .child(text.to_string())
}

pub fn field(text: &str, input: &Entity<ChannelInput>) -> Div {
    div()
        .flex()
        .flex_col()
        .gap(px(GAP_EXTRA_SMALL))
        .w_full()
        .child(label(text))
        .child(input.clone())
}

/// Color sample over a light/dark split so translucency stays visible.
pub fn swatch(color: &Color, size: f32) -> Div {
    div()
        .relative()
        .flex_shrink_0()
        .size(px(size))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(rgb(BORDER))
        .overflow_hidden()
        .bg(rgb(CHECKER_LIGHT))
        .child(
            div()
                .absolute()
                .top_0()
                .right_0()
                .w(px(size / 2.0))
                .h_full()
                .bg(rgb(CHECKER_DARK)),
        )
        .child(
            div()
                .absolute()
                .inset_0()
                .bg(rgba(color.to_rgba_u32())),
        )
}

pub fn verdict(passes: bool) -> Div {
    let (text, color) = if passes {
        ("Pass", COLOR_GREEN)
    } else {
        ("Fail", COLOR_RED)
    };
    div()
        .px(px(GAP_SMALL))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(rgb(color))
        .text_size(px(TEXT_SIZE_EXTRA_SMALL))
        .text_color(rgb(color))
        .child(text)
}

pub fn selector_option(text: &str, active: bool, focus_handle: &FocusHandle) -> Div {
    let (background, text_color, border) = if active {
        (BUTTON_PRIMARY, TEXT_WHITE, BORDER_FOCUS)
    } else {
        (INPUT_BACKGROUND, TEXT_DIM, BORDER)
    };

    div()
        .track_focus(focus_handle)
        .flex()
        .items_center()
        .px(px(PADDING_INPUT_HORIZONTAL))
        .h(px(ELEMENT_HEIGHT))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(rgb(border))
        .bg(rgb(background))
        .text_color(rgb(text_color))
        .text_size(px(TEXT_SIZE_SMALL))
        .font_family(text.to_string())
        .cursor_pointer()
        .when(active, |element| {
            element
                .hover(|style| style.bg(rgb(BUTTON_HOVER)))
                .focus(|style| style.bg(rgb(BUTTON_HOVER)))
        })
        .when(!active, |element| {
            element
                .hover(|style| style.border_color(rgb(BORDER_FOCUS)))
                .focus(|style| style.border_color(rgb(BORDER_FOCUS)))
        })
        .child(text.to_string())
}

pub fn selector(text: &str, options_row: Div) -> Div {
    div()
        .flex()
        .flex_col()
        .gap(px(GAP_EXTRA_SMALL))
        .w_full()
        .child(label(text))
        .child(options_row)
}

pub fn selector_row() -> Div {
    div().flex().flex_row().flex_wrap().w_full().gap(px(GAP_SMALL))
}

pub fn button_action(text: &str, focus_handle: &FocusHandle) -> Div {
    div()
        .track_focus(focus_handle)
        .flex()
        .items_center()
        .justify_center()
        .px(px(PADDING_INPUT_HORIZONTAL))
        .h(px(ELEMENT_HEIGHT))
        .bg(rgb(BUTTON_FILLED))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(gpui::transparent_black())
        .cursor_pointer()
        .hover(|style| style.bg(rgb(BUTTON_FILLED_HOVER)))
        .focus(|style| {
            style
                .border_color(rgb(BORDER_FOCUS))
                .bg(rgb(BUTTON_FILLED_HOVER))
        })
        .text_color(rgb(TEXT_WHITE))
        .text_size(px(TEXT_SIZE_MEDIUM))
        .child(text.to_string())
}

pub fn button_ghost(text: &str, focus_handle: &FocusHandle) -> Div {
    div()
        .track_focus(focus_handle)
        .flex()
        .flex_shrink_0()
        .items_center()
        .justify_center()
        .px(px(PADDING_INPUT_HORIZONTAL))
        .h(px(ELEMENT_HEIGHT))
        .bg(rgb(INPUT_BACKGROUND))
        .border_1()
        .border_color(rgb(BORDER))
        .rounded(px(RADIUS))
        .cursor_pointer()
        .text_color(rgb(TEXT_PRIMARY))
        .text_size(px(TEXT_SIZE_MEDIUM))
        .hover(|style| style.border_color(rgb(BORDER_FOCUS)))
        .focus(|style| style.border_color(rgb(BORDER_FOCUS)))
        .child(text.to_string())
}

pub fn status_detail(text: String) -> Div {
    div()
        .text_size(px(TEXT_SIZE_EXTRA_SMALL))
        .text_color(rgb(TEXT_DIM))
        .child(text)
}

pub fn titlebar_title(text: &str) -> Div {
    div()
        .flex()
        .flex_1()
        .h_full()
        .items_center()
        .pl(px(PADDING_COLUMN))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(TEXT_DIM))
        .child(text.to_string())
}

pub fn titlebar_close() -> Stateful<Div> {
    div()
        .id("titlebar-close")
        .flex()
        .items_center()
        .px(px(PADDING_COLUMN))
        .h(px(TITLEBAR_HEIGHT))
        .text_size(px(TEXT_SIZE_SMALL))
        .text_color(rgb(TEXT_DIM))
        .cursor_pointer()
        .hover(|style| style.bg(rgb(COLOR_RED)).text_color(rgb(TEXT_WHITE)))
        .child("Exit")
}
