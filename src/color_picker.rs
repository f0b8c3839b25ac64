use gpui::{
    App, Bounds, Context, Div, Entity, EventEmitter, FocusHandle, Focusable, MouseButton,
    MouseDownEvent, MouseMoveEvent, Pixels, Point, Subscription, Window, canvas, div, prelude::*,
    px,
};

use crate::{
    channel_input::{ChannelInput, ChannelInputEvent},
    color::Color,
    color_editor::{Channel, ColorEditor, ColorError, EditOutcome},
    color_surface::{
        DragTarget, alpha_at, alpha_track, hue_at, hue_track, saturation_value_area,
        saturation_value_at,
    },
    components::{field, swatch},
    configuration::ChannelLabels,
    theme::*,
};

#[derive(Clone, Default)]
pub struct ColorPickerOptions {
    pub color: Option<Color>,
    pub labels: ChannelLabels,
    pub alpha_hidden: bool,
}

pub enum ColorPickerEvent {
    Change(Color),
}

#[derive(Default)]
struct SurfaceBounds {
    hue: Option<Bounds<Pixels>>,
    alpha: Option<Bounds<Pixels>>,
    saturation_value: Option<Bounds<Pixels>>,
}

impl SurfaceBounds {
    fn get(&self, target: DragTarget) -> Option<Bounds<Pixels>> {
        match target {
            DragTarget::Hue => self.hue,
            DragTarget::Alpha => self.alpha,
            DragTarget::SaturationValue => self.saturation_value,
        }
    }

    fn set(&mut self, target: DragTarget, bounds: Bounds<Pixels>) {
        let slot = match target {
            DragTarget::Hue => &mut self.hue,
            DragTarget::Alpha => &mut self.alpha,
            DragTarget::SaturationValue => &mut self.saturation_value,
        };
        *slot = Some(bounds);
    }
}

/// Color editing view: saturation/value area, hue and alpha tracks, and one
/// text field per channel, all reading from a single [`ColorEditor`].
pub struct ColorPicker {
    editor: ColorEditor,
    labels: ChannelLabels,
    alpha_hidden: bool,
    inputs: Vec<(Channel, Entity<ChannelInput>)>,
    focus_handle: FocusHandle,
    drag: Option<DragTarget>,
    surface_bounds: SurfaceBounds,
    _subscriptions: Vec<Subscription>,
}

impl EventEmitter<ColorPickerEvent> for ColorPicker {}

impl ColorPicker {
    pub fn new(
        options: ColorPickerOptions,
        window: &mut Window,
        context: &mut App,
    ) -> Entity<Self> {
        context.new(|context| {
            let editor = ColorEditor::new(options.color);
            let mut inputs = Vec::new();
            let mut subscriptions = Vec::new();

            for channel in Channel::ALL {
                if options.alpha_hidden && channel == Channel::Alpha {
                    continue;
                }
                let input = ChannelInput::new(editor.display_value(channel), window, context);
                subscriptions.push(context.subscribe(
                    &input,
                    move |this: &mut Self, _, event: &ChannelInputEvent, context| {
                        this.on_channel_event(channel, event, context);
                    },
                ));
                inputs.push((channel, input));
            }

            Self {
                editor,
                labels: options.labels,
                alpha_hidden: options.alpha_hidden,
                inputs,
                focus_handle: context.focus_handle(),
                drag: None,
                surface_bounds: SurfaceBounds::default(),
                _subscriptions: subscriptions,
            }
        })
    }

    pub fn color(&self) -> &Color {
        self.editor.color()
    }

    /// Focus order of the channel fields, for keyboard traversal.
    pub fn channel_focus_handles(&self, context: &App) -> Vec<FocusHandle> {
        self.inputs
            .iter()
            .map(|(_, input)| input.read(context).focus_handle(context))
            .collect()
    }

    /// Parses and replaces the color from outside without emitting a change.
    pub fn set_color_str(
        &mut self,
        input: &str,
        context: &mut Context<Self>,
    ) -> Result<(), ColorError> {
        self.editor.set_color_str(input)?;
        self.sync_inputs(context);
        context.notify();
        Ok(())
    }

    fn on_channel_event(
        &mut self,
        channel: Channel,
        event: &ChannelInputEvent,
        context: &mut Context<Self>,
    ) {
        let outcome = match event {
            ChannelInputEvent::Changed(text) => match self.editor.edit_text(channel, text) {
                Ok(outcome) => outcome,
                Err(error) => {
                    log::debug!("[picker] {error}");
                    EditOutcome::Unchanged
                }
            },
            ChannelInputEvent::Blurred => {
                let owns_pending = self
                    .editor
                    .pending()
                    .is_some_and(|pending| pending.channel == channel);
                if !owns_pending {
                    return;
                }
                self.editor.blur()
            }
        };
        self.apply(outcome, context);
    }

    fn apply(&mut self, outcome: EditOutcome, context: &mut Context<Self>) {
        match outcome {
            EditOutcome::Changed(color) => {
                log::debug!("[picker] committed {color}");
                context.emit(ColorPickerEvent::Change(color));
            }
            EditOutcome::Reverted => log::debug!("[picker] dropped incomplete edit"),
            EditOutcome::Unchanged | EditOutcome::Pending => {}
        }
        self.sync_inputs(context);
        context.notify();
    }

    fn sync_inputs(&self, context: &mut Context<Self>) {
        for (channel, input) in &self.inputs {
            let text = self.editor.display_value(*channel);
            input.update(context, |input, context| input.set_text(text, context));
        }
    }

    fn start_drag(
        &mut self,
        target: DragTarget,
        event: &MouseDownEvent,
        window: &mut Window,
        context: &mut Context<Self>,
    ) {
        // a pending field edit is settled before the surface edit lands on top of it
        let settled = self.editor.blur();
        self.apply(settled, context);
        window.focus(&self.focus_handle, context);
        self.drag = Some(target);
        self.drag_to(event.position, context);
    }

    fn update_drag(&mut self, event: &MouseMoveEvent, context: &mut Context<Self>) {
        if self.drag.is_none() {
            return;
        }
        if event.pressed_button != Some(MouseButton::Left) {
            self.drag = None;
            return;
        }
        self.drag_to(event.position, context);
    }

    fn drag_to(&mut self, position: Point<Pixels>, context: &mut Context<Self>) {
        let Some(target) = self.drag else {
            return;
        };
        let Some(bounds) = self.surface_bounds.get(target) else {
            return;
        };
        let outcome = match target {
            DragTarget::Hue => self.editor.set_hue(hue_at(bounds, position)),
            DragTarget::Alpha => self.editor.set_alpha(alpha_at(bounds, position)),
            DragTarget::SaturationValue => {
                let (saturation, value) = saturation_value_at(bounds, position);
                self.editor.set_saturation_value(saturation, value)
            }
        };
        self.apply(outcome, context);
    }

    fn render_surface(
        &self,
        target: DragTarget,
        surface: Div,
        context: &mut Context<Self>,
    ) -> impl IntoElement {
        let picker = context.entity();
        surface
            .cursor_pointer()
            .child(
                canvas(
                    move |bounds, _, context| {
                        picker.update(context, |picker, _| {
                            picker.surface_bounds.set(target, bounds);
                        })
                    },
                    |_, _, _, _| {},
                )
                .absolute()
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                context.listener(move |this, event: &MouseDownEvent, window, context| {
                    this.start_drag(target, event, window, context);
                }),
            )
    }

    fn render_fields(&self) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .w(px(SURFACE_WIDTH))
            .gap(px(GAP_EXTRA_SMALL))
            .children(self.inputs.iter().map(|(channel, input)| {
                let field = field(self.labels.label(*channel), input);
                match channel {
                    Channel::Hex => field.flex_1(),
                    _ => field.w(px(CHANNEL_INPUT_WIDTH)).flex_shrink_0(),
                }
            }))
    }
}

impl Render for ColorPicker {
    fn render(&mut self, _window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let color = self.editor.color().clone();

        let mut tracks = div()
            .flex()
            .flex_col()
            .flex_1()
            .gap(px(GAP_SMALL))
            .child(self.render_surface(DragTarget::Hue, hue_track(&color), context));
        if !self.alpha_hidden {
            tracks = tracks.child(self.render_surface(
                DragTarget::Alpha,
                alpha_track(&color),
                context,
            ));
        }

        div()
            .key_context("ColorPicker")
            .track_focus(&self.focus_handle)
            .flex()
            .flex_col()
            .gap(px(GAP_SMALL))
            .on_mouse_move(context.listener(|this, event: &MouseMoveEvent, _, context| {
                this.update_drag(event, context);
            }))
            .on_mouse_up(
                MouseButton::Left,
                context.listener(|this, _, _, _| this.drag = None),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                context.listener(|this, _, _, _| this.drag = None),
            )
            .child(self.render_surface(
                DragTarget::SaturationValue,
                saturation_value_area(&color),
                context,
            ))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .w(px(SURFACE_WIDTH))
                    .gap(px(GAP_SMALL))
                    .child(tracks)
                    .child(swatch(&color, SWATCH_SIZE)),
            )
            .child(self.render_fields())
    }
}

impl Focusable for ColorPicker {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

#[cfg(test)]
mod tests {
    use gpui::{Subscription, TestAppContext, WindowHandle};

    use super::*;

    struct Host {
        picker: Entity<ColorPicker>,
        changes: Vec<Color>,
        _subscription: Subscription,
    }

    impl Render for Host {
        fn render(&mut self, _: &mut Window, _: &mut Context<Self>) -> impl IntoElement {
            self.picker.clone()
        }
    }

    fn host(cx: &mut TestAppContext, initial: &str) -> WindowHandle<Host> {
        let color = Color::parse(initial).unwrap();
        cx.add_window(move |window, cx| {
            let picker = ColorPicker::new(
                ColorPickerOptions {
                    color: Some(color),
                    ..Default::default()
                },
                window,
                cx,
            );
            let subscription = cx.subscribe(
                &picker,
                |host: &mut Host, _, event: &ColorPickerEvent, _| {
                    let ColorPickerEvent::Change(color) = event;
                    host.changes.push(color.clone());
                },
            );
            Host {
                picker,
                changes: Vec::new(),
                _subscription: subscription,
            }
        })
    }

    fn send(
        cx: &mut TestAppContext,
        window: WindowHandle<Host>,
        channel: Channel,
        event: ChannelInputEvent,
    ) {
        window
            .update(cx, |host, _, cx| {
                host.picker
                    .update(cx, |picker, cx| picker.on_channel_event(channel, &event, cx));
            })
            .unwrap();
    }

    fn changes(cx: &mut TestAppContext, window: WindowHandle<Host>) -> Vec<String> {
        window
            .update(cx, |host, _, _| {
                host.changes
                    .iter()
                    .map(|color| color.display().to_string())
                    .collect()
            })
            .unwrap()
    }

    #[gpui::test]
    fn committed_edit_emits_once(cx: &mut TestAppContext) {
        let window = host(cx, "#0078d4");
        send(cx, window, Channel::Red, ChannelInputEvent::Changed("255".into()));
        send(cx, window, Channel::Red, ChannelInputEvent::Changed("255".into()));
        assert_eq!(changes(cx, window), vec!["#ff78d4".to_string()]);
    }

    #[gpui::test]
    fn pending_and_rejected_edits_stay_silent(cx: &mut TestAppContext) {
        let window = host(cx, "rgba(0, 120, 212, 0.5)");
        send(cx, window, Channel::Red, ChannelInputEvent::Changed("1x".into()));
        send(cx, window, Channel::Alpha, ChannelInputEvent::Changed("1".into()));
        // red takes over the pending edit, so the alpha blur has nothing to settle
        send(cx, window, Channel::Red, ChannelInputEvent::Changed("300".into()));
        send(cx, window, Channel::Alpha, ChannelInputEvent::Blurred);
        assert!(changes(cx, window).is_empty());

        send(cx, window, Channel::Red, ChannelInputEvent::Blurred);
        send(cx, window, Channel::Alpha, ChannelInputEvent::Changed("1".into()));
        send(cx, window, Channel::Alpha, ChannelInputEvent::Blurred);
        assert_eq!(
            changes(cx, window),
            vec![
                "rgba(255, 120, 212, 0.5)".to_string(),
                "rgba(255, 120, 212, 0.01)".to_string(),
            ]
        );
    }

    #[gpui::test]
    fn external_color_never_emits(cx: &mut TestAppContext) {
        let window = host(cx, "#0078d4");
        let result = window
            .update(cx, |host, _, cx| {
                host.picker.update(cx, |picker, cx| {
                    picker.set_color_str("#323130", cx)?;
                    assert_eq!(picker.color().hex(), "323130");
                    picker.set_color_str("not a color", cx)
                })
            })
            .unwrap();
        assert_eq!(
            result,
            Err(ColorError::InvalidColorFormat("not a color".into()))
        );
        window
            .update(cx, |host, _, cx| {
                assert_eq!(host.picker.read(cx).color().hex(), "323130");
            })
            .unwrap();
        assert!(changes(cx, window).is_empty());
    }
}
