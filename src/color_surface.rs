use gpui::{
    Bounds, Div, Hsla, Pixels, Point, div, hsla, linear_color_stop, linear_gradient, prelude::*,
    px, relative, rgb, rgba,
};

use crate::{
    color::{Color, MAX_COLOR_ALPHA, MAX_COLOR_HUE, MAX_COLOR_SATURATION, MAX_COLOR_VALUE},
    theme::*,
};

// Pure hue at each sixth of the track, red to red.
const HUE_STOPS: [f32; 7] = [0.0, 60.0, 120.0, 180.0, 240.0, 300.0, 360.0];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DragTarget {
    Hue,
    Alpha,
    SaturationValue,
}

fn fraction(offset: Pixels, length: Pixels) -> f64 {
    if length <= px(0.0) {
        return 0.0;
    }
    f64::from((offset / length).clamp(0.0, 1.0))
}

pub fn hue_at(bounds: Bounds<Pixels>, position: Point<Pixels>) -> f64 {
    let horizontal = fraction(position.x - bounds.left(), bounds.size.width);
    (horizontal * MAX_COLOR_HUE).round()
}

pub fn alpha_at(bounds: Bounds<Pixels>, position: Point<Pixels>) -> f64 {
    let horizontal = fraction(position.x - bounds.left(), bounds.size.width);
    (horizontal * MAX_COLOR_ALPHA).round()
}

/// Saturation grows to the right and value grows upwards.
pub fn saturation_value_at(bounds: Bounds<Pixels>, position: Point<Pixels>) -> (f64, f64) {
    let horizontal = fraction(position.x - bounds.left(), bounds.size.width);
    let vertical = fraction(position.y - bounds.top(), bounds.size.height);
    (
        horizontal * MAX_COLOR_SATURATION,
        (1.0 - vertical) * MAX_COLOR_VALUE,
    )
}

fn pure_hue(degrees: f32) -> Hsla {
    hsla(degrees / 360.0, 1.0, 0.5, 1.0)
}

fn thumb(left: f64, top: f64, fill: impl Into<Hsla>) -> Div {
    let fill: Hsla = fill.into();
    div()
        .absolute()
        .left(relative(left as f32))
        .top(relative(top as f32))
        .ml(px(-THUMB_SIZE / 2.0))
        .mt(px(-THUMB_SIZE / 2.0))
        .size(px(THUMB_SIZE))
        .rounded(px(THUMB_SIZE / 2.0))
        .border_2()
        .border_color(rgb(TEXT_WHITE))
        .shadow_sm()
        .bg(fill)
}

fn track() -> Div {
    div()
        .relative()
        .w_full()
        .h(px(TRACK_HEIGHT))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(rgb(BORDER))
}

pub fn hue_track(color: &Color) -> Div {
    let segments = HUE_STOPS.windows(2).map(|stops| {
        div().flex_1().h_full().bg(linear_gradient(
            90.0,
            linear_color_stop(pure_hue(stops[0]), 0.0),
            linear_color_stop(pure_hue(stops[1]), 1.0),
        ))
    });
    let hue = color.hue();

    track()
        .child(
            div()
                .flex()
                .flex_row()
                .size_full()
                .rounded(px(RADIUS))
                .overflow_hidden()
                .children(segments),
        )
        .child(thumb(hue / MAX_COLOR_HUE, 0.5, pure_hue(hue as f32)))
}

pub fn alpha_track(color: &Color) -> Div {
    let clear = color.to_rgb_u32() << 8;
    let opaque = clear | 0xff;

    track()
        .bg(rgb(CHECKER_DARK))
        .child(
            div()
                .size_full()
                .rounded(px(RADIUS))
                .bg(linear_gradient(
                    90.0,
                    linear_color_stop(rgba(clear), 0.0),
                    linear_color_stop(rgba(opaque), 1.0),
                )),
        )
        .child(thumb(
            color.alpha() / MAX_COLOR_ALPHA,
            0.5,
            rgb(color.to_rgb_u32()),
        ))
}

pub fn saturation_value_area(color: &Color) -> Div {
    let white = 0xffffff00;
    let black = 0x00000000;

    div()
        .relative()
        .w(px(SURFACE_WIDTH))
        .h(px(SATURATION_VALUE_HEIGHT))
        .rounded(px(RADIUS))
        .border_1()
        .border_color(rgb(BORDER))
        .bg(pure_hue(color.hue() as f32))
        .child(
            div()
                .absolute()
                .inset_0()
                .rounded(px(RADIUS))
                .bg(linear_gradient(
                    90.0,
                    linear_color_stop(rgba(white | 0xff), 0.0),
                    linear_color_stop(rgba(white), 1.0),
                )),
        )
        .child(
            div()
                .absolute()
                .inset_0()
                .rounded(px(RADIUS))
                .bg(linear_gradient(
                    180.0,
                    linear_color_stop(rgba(black), 0.0),
                    linear_color_stop(rgba(black | 0xff), 1.0),
                )),
        )
        .child(thumb(
            color.saturation() / MAX_COLOR_SATURATION,
            1.0 - color.value() / MAX_COLOR_VALUE,
            rgb(color.to_rgb_u32()),
        ))
}
