use std::ops::Range;

use gpui::{
    App, Bounds, ClipboardItem, Context, CursorStyle, ElementId, ElementInputHandler, Entity,
    EntityInputHandler, EventEmitter, FocusHandle, Focusable, GlobalElementId, LayoutId,
    MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, PaintQuad, Pixels, Point,
    ShapedLine, SharedString, Style, Subscription, TextAlign, TextRun, UTF16Selection, Window,
    actions, div, fill, point, prelude::*, px, relative, rgb, rgba,
};
use unicode_segmentation::*;

use crate::theme::*;

actions!(
    channel_input,
    [
        Backspace,
        Delete,
        Left,
        Right,
        SelectLeft,
        SelectRight,
        SelectAll,
        Home,
        End,
        Paste,
        Cut,
        Copy,
    ]
);

pub enum ChannelInputEvent {
    /// The text was edited by the user.
    Changed(SharedString),
    Blurred,
}

/// Single line field holding one color channel's text.
pub struct ChannelInput {
    focus_handle: FocusHandle,
    content: SharedString,
    selected_range: Range<usize>,
    selection_reversed: bool,
    marked_range: Option<Range<usize>>,
    last_layout: Option<ShapedLine>,
    last_bounds: Option<Bounds<Pixels>>,
    is_selecting: bool,
    /// Text and selection as they were before the last user edit.
    before_edit: Option<(SharedString, Range<usize>)>,
    _blur_subscription: Subscription,
}

impl EventEmitter<ChannelInputEvent> for ChannelInput {}

impl ChannelInput {
    pub fn new(text: String, window: &mut Window, context: &mut App) -> Entity<Self> {
        let content: SharedString = text.into();
        let length = content.len();
        context.new(|context| {
            let focus_handle = context.focus_handle();
            let blur_subscription = context.on_blur(&focus_handle, window, |_, _, context| {
                context.emit(ChannelInputEvent::Blurred);
            });
            Self {
                focus_handle,
                content,
                selected_range: length..length,
                selection_reversed: false,
                marked_range: None,
                last_layout: None,
                last_bounds: None,
                is_selecting: false,
                before_edit: None,
                _blur_subscription: blur_subscription,
            }
        })
    }

    /// Replaces the text without reporting it as a user edit.
    ///
    /// When the owner puts back the text from before the last edit (a
    /// rejected keystroke), the caret returns to where it was; otherwise it
    /// stays at its offset, clamped to the new text.
    pub fn set_text(&mut self, text: String, context: &mut Context<Self>) {
        let before_edit = self.before_edit.take();
        if self.content.as_ref() == text {
            return;
        }
        let selected_range = match before_edit {
            Some((previous, range)) if previous.as_ref() == text => range,
            _ => self.cursor_offset()..self.cursor_offset(),
        };
        self.content = text.into();
        let start = clamp_to_boundary(&self.content, selected_range.start);
        let end = clamp_to_boundary(&self.content, selected_range.end);
        self.selected_range = start..end;
        self.selection_reversed = false;
        self.marked_range = None;
        context.notify();
    }

    fn left(&mut self, _: &Left, _: &mut Window, context: &mut Context<Self>) {
        let offset = if self.selected_range.is_empty() {
            self.previous_boundary(self.cursor_offset())
        } else {
            self.selected_range.start
        };
        self.move_to(offset, context);
    }

    fn right(&mut self, _: &Right, _: &mut Window, context: &mut Context<Self>) {
        let offset = if self.selected_range.is_empty() {
            self.next_boundary(self.selected_range.end)
        } else {
            self.selected_range.end
        };
        self.move_to(offset, context);
    }

    fn select_left(&mut self, _: &SelectLeft, _: &mut Window, context: &mut Context<Self>) {
        self.select_to(self.previous_boundary(self.cursor_offset()), context);
    }

    fn select_right(&mut self, _: &SelectRight, _: &mut Window, context: &mut Context<Self>) {
        self.select_to(self.next_boundary(self.cursor_offset()), context);
    }

    fn select_all(&mut self, _: &SelectAll, _: &mut Window, context: &mut Context<Self>) {
        self.move_to(0, context);
        self.select_to(self.content.len(), context);
    }

    fn home(&mut self, _: &Home, _: &mut Window, context: &mut Context<Self>) {
        self.move_to(0, context);
    }

    fn end(&mut self, _: &End, _: &mut Window, context: &mut Context<Self>) {
        self.move_to(self.content.len(), context);
    }

    fn backspace(&mut self, _: &Backspace, window: &mut Window, context: &mut Context<Self>) {
        if self.selected_range.is_empty() {
            self.select_to(self.previous_boundary(self.cursor_offset()), context);
        }
        self.replace_text_in_range(None, "", window, context);
    }

    fn delete(&mut self, _: &Delete, window: &mut Window, context: &mut Context<Self>) {
        if self.selected_range.is_empty() {
            self.select_to(self.next_boundary(self.cursor_offset()), context);
        }
        self.replace_text_in_range(None, "", window, context);
    }

    fn paste(&mut self, _: &Paste, window: &mut Window, context: &mut Context<Self>) {
        if let Some(text) = context.read_from_clipboard().and_then(|item| item.text()) {
            // pasted colors often carry the leading '#'
            let clean = text.trim().trim_start_matches('#').to_string();
            self.replace_text_in_range(None, &clean, window, context);
        }
    }

    fn copy(&mut self, _: &Copy, _: &mut Window, context: &mut Context<Self>) {
        if let Some(selected) = self.selected_text() {
            context.write_to_clipboard(ClipboardItem::new_string(selected));
        }
    }

    fn cut(&mut self, _: &Cut, window: &mut Window, context: &mut Context<Self>) {
        if let Some(selected) = self.selected_text() {
            context.write_to_clipboard(ClipboardItem::new_string(selected));
            self.replace_text_in_range(None, "", window, context);
        }
    }

    fn selected_text(&self) -> Option<String> {
        (!self.selected_range.is_empty())
            .then(|| self.content[self.selected_range.clone()].to_string())
    }

    fn on_mouse_down(
        &mut self,
        event: &MouseDownEvent,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        self.is_selecting = true;
        let offset = self.index_for_mouse_position(event.position);
        if event.modifiers.shift {
            self.select_to(offset, context);
        } else {
            self.move_to(offset, context);
        }
    }

    fn on_mouse_up(&mut self, _: &MouseUpEvent, _: &mut Window, _: &mut Context<Self>) {
        self.is_selecting = false;
    }

    fn on_mouse_move(
        &mut self,
        event: &MouseMoveEvent,
        _: &mut Window,
        context: &mut Context<Self>,
    ) {
        if self.is_selecting {
            self.select_to(self.index_for_mouse_position(event.position), context);
        }
    }

    fn move_to(&mut self, offset: usize, context: &mut Context<Self>) {
        self.selected_range = offset..offset;
        context.notify();
    }

    fn cursor_offset(&self) -> usize {
        if self.selection_reversed {
            self.selected_range.start
        } else {
            self.selected_range.end
        }
    }

    fn index_for_mouse_position(&self, position: Point<Pixels>) -> usize {
        let (Some(bounds), Some(line)) = (self.last_bounds.as_ref(), self.last_layout.as_ref())
        else {
            return 0;
        };
        if self.content.is_empty() || position.y < bounds.top() {
            return 0;
        }
        if position.y > bounds.bottom() {
            return self.content.len();
        }
        line.closest_index_for_x(position.x - bounds.left())
    }

    fn select_to(&mut self, offset: usize, context: &mut Context<Self>) {
        if self.selection_reversed {
            self.selected_range.start = offset;
        } else {
            self.selected_range.end = offset;
        }
        if self.selected_range.end < self.selected_range.start {
            self.selection_reversed = !self.selection_reversed;
            self.selected_range = self.selected_range.end..self.selected_range.start;
        }
        context.notify();
    }

    fn offset_from_utf16(&self, offset: usize) -> usize {
        let mut utf8_offset = 0;
        let mut utf16_count = 0;
        for character in self.content.chars() {
            if utf16_count >= offset {
                break;
            }
            utf16_count += character.len_utf16();
            utf8_offset += character.len_utf8();
        }
        utf8_offset
    }

    fn offset_to_utf16(&self, offset: usize) -> usize {
        let mut utf16_offset = 0;
        let mut utf8_count = 0;
        for character in self.content.chars() {
            if utf8_count >= offset {
                break;
            }
            utf8_count += character.len_utf8();
            utf16_offset += character.len_utf16();
        }
        utf16_offset
    }

    fn range_to_utf16(&self, range: &Range<usize>) -> Range<usize> {
        self.offset_to_utf16(range.start)..self.offset_to_utf16(range.end)
    }

    fn range_from_utf16(&self, range_utf16: &Range<usize>) -> Range<usize> {
        self.offset_from_utf16(range_utf16.start)..self.offset_from_utf16(range_utf16.end)
    }

    fn previous_boundary(&self, offset: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .rev()
            .find_map(|(index, _)| (index < offset).then_some(index))
            .unwrap_or(0)
    }

    fn next_boundary(&self, offset: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .find_map(|(index, _)| (index > offset).then_some(index))
            .unwrap_or(self.content.len())
    }
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

impl EntityInputHandler for ChannelInput {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        actual_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<String> {
        let range = self.range_from_utf16(&range_utf16);
        actual_range.replace(self.range_to_utf16(&range));
        Some(self.content[range].to_string())
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        Some(UTF16Selection {
            range: self.range_to_utf16(&self.selected_range),
            reversed: self.selection_reversed,
        })
    }

    fn marked_text_range(
        &self,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<Range<usize>> {
        self.marked_range
            .as_ref()
            .map(|range| self.range_to_utf16(range))
    }

    fn unmark_text(&mut self, _window: &mut Window, _context: &mut Context<Self>) {
        self.marked_range = None;
    }

    fn replace_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        _: &mut Window,
        context: &mut Context<Self>,
    ) {
        let range = range_utf16
            .as_ref()
            .map(|range| self.range_from_utf16(range))
            .or(self.marked_range.clone())
            .unwrap_or(self.selected_range.clone());

        let clean: String = new_text
            .chars()
            .filter(|character| !character.is_control())
            .collect();

        self.before_edit = Some((self.content.clone(), self.selected_range.clone()));
        self.content =
            (self.content[0..range.start].to_owned() + &clean + &self.content[range.end..]).into();
        self.selected_range = range.start + clean.len()..range.start + clean.len();
        self.marked_range.take();
        context.emit(ChannelInputEvent::Changed(self.content.clone()));
        context.notify();
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        let range = range_utf16
            .as_ref()
            .map(|range| self.range_from_utf16(range))
            .or(self.marked_range.clone())
            .unwrap_or(self.selected_range.clone());

        self.content =
            (self.content[0..range.start].to_owned() + new_text + &self.content[range.end..])
                .into();
        self.marked_range =
            (!new_text.is_empty()).then(|| range.start..range.start + new_text.len());
        self.selected_range = new_selected_range_utf16
            .as_ref()
            .map(|range| self.range_from_utf16(range))
            .map(|new_range| new_range.start + range.start..new_range.end + range.end)
            .unwrap_or_else(|| range.start + new_text.len()..range.start + new_text.len());

        context.notify();
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        bounds: Bounds<Pixels>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let last_layout = self.last_layout.as_ref()?;
        let range = self.range_from_utf16(&range_utf16);
        Some(Bounds::from_corners(
            point(
                bounds.left() + last_layout.x_for_index(range.start),
                bounds.top(),
            ),
            point(
                bounds.left() + last_layout.x_for_index(range.end),
                bounds.bottom(),
            ),
        ))
    }

    fn character_index_for_point(
        &mut self,
        position: Point<Pixels>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<usize> {
        let line_point = self.last_bounds?.localize(&position)?;
        let last_layout = self.last_layout.as_ref()?;
        let index = last_layout.index_for_x(position.x - line_point.x)?;
        Some(self.offset_to_utf16(index))
    }
}

struct ChannelTextElement {
    input: Entity<ChannelInput>,
}

struct PrepaintState {
    line: Option<ShapedLine>,
    cursor: Option<PaintQuad>,
    selection: Option<PaintQuad>,
}

impl IntoElement for ChannelTextElement {
    type Element = Self;
    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for ChannelTextElement {
    type RequestLayoutState = ();
    type PrepaintState = PrepaintState;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        window: &mut Window,
        context: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let mut style = Style::default();
        style.size.width = relative(1.).into();
        style.size.height = window.line_height().into();
        (window.request_layout(style, [], context), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        context: &mut App,
    ) -> Self::PrepaintState {
        let input = self.input.read(context);
        let content = input.content.clone();
        let selected_range = input.selected_range.clone();
        let cursor = input.cursor_offset();
        let style = window.text_style();

        let run = TextRun {
            len: content.len(),
            font: style.font(),
            color: style.color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let runs = match input.marked_range.as_ref() {
            Some(marked_range) => [
                TextRun {
                    len: marked_range.start,
                    ..run.clone()
                },
                TextRun {
                    len: marked_range.end - marked_range.start,
                    underline: Some(gpui::UnderlineStyle {
                        color: Some(run.color),
                        thickness: px(1.0),
                        wavy: false,
                    }),
                    ..run.clone()
                },
                TextRun {
                    len: content.len() - marked_range.end,
                    ..run
                },
            ]
            .into_iter()
            .filter(|run| run.len > 0)
            .collect(),
            None => vec![run],
        };

        let font_size = style.font_size.to_pixels(window.rem_size());
        let line = window
            .text_system()
            .shape_line(content, font_size, &runs, None);

        let (selection, cursor) = if selected_range.is_empty() {
            let cursor_x = line.x_for_index(cursor);
            (
                None,
                Some(fill(
                    Bounds::new(
                        point(bounds.left() + cursor_x, bounds.top()),
                        gpui::size(px(CURSOR_WIDTH), bounds.bottom() - bounds.top()),
                    ),
                    rgb(BORDER_FOCUS),
                )),
            )
        } else {
            (
                Some(fill(
                    Bounds::from_corners(
                        point(
                            bounds.left() + line.x_for_index(selected_range.start),
                            bounds.top(),
                        ),
                        point(
                            bounds.left() + line.x_for_index(selected_range.end),
                            bounds.bottom(),
                        ),
                    ),
                    rgba(SELECTION),
                )),
                None,
            )
        };

        PrepaintState {
            line: Some(line),
            cursor,
            selection,
        }
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        context: &mut App,
    ) {
        let focus_handle = self.input.read(context).focus_handle.clone();
        window.handle_input(
            &focus_handle,
            ElementInputHandler::new(bounds, self.input.clone()),
            context,
        );
        if let Some(selection) = prepaint.selection.take() {
            window.paint_quad(selection);
        }
        let Some(line) = prepaint.line.take() else {
            return;
        };
        if let Err(error) = line.paint(
            bounds.origin,
            window.line_height(),
            TextAlign::Left,
            None,
            window,
            context,
        ) {
            log::warn!("[channel_input] failed to paint text: {error}");
        }
        if focus_handle.is_focused(window)
            && let Some(cursor) = prepaint.cursor.take()
        {
            window.paint_quad(cursor);
        }
        self.input.update(context, |input, _| {
            input.last_layout = Some(line);
            input.last_bounds = Some(bounds);
        });
    }
}

impl Render for ChannelInput {
    fn render(&mut self, window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let border = if self.focus_handle.is_focused(window) {
            BORDER_FOCUS
        } else {
            BORDER
        };

        div()
            .flex()
            .key_context("ChannelInput")
            .track_focus(&self.focus_handle(context))
            .cursor(CursorStyle::IBeam)
            .on_action(context.listener(Self::backspace))
            .on_action(context.listener(Self::delete))
            .on_action(context.listener(Self::left))
            .on_action(context.listener(Self::right))
            .on_action(context.listener(Self::select_left))
            .on_action(context.listener(Self::select_right))
            .on_action(context.listener(Self::select_all))
            .on_action(context.listener(Self::home))
            .on_action(context.listener(Self::end))
            .on_action(context.listener(Self::paste))
            .on_action(context.listener(Self::cut))
            .on_action(context.listener(Self::copy))
            .on_mouse_down(MouseButton::Left, context.listener(Self::on_mouse_down))
            .on_mouse_up(MouseButton::Left, context.listener(Self::on_mouse_up))
            .on_mouse_up_out(MouseButton::Left, context.listener(Self::on_mouse_up))
            .on_mouse_move(context.listener(Self::on_mouse_move))
            .text_color(rgb(TEXT_PRIMARY))
            .text_size(px(TEXT_SIZE_MEDIUM))
            .line_height(px(LINE_HEIGHT_MEDIUM))
            .child(
                div()
                    .h(px(ELEMENT_HEIGHT))
                    .w_full()
                    .px(px(PADDING_INPUT_HORIZONTAL))
                    .py(px(PADDING_INPUT_VERTICAL))
                    .bg(rgb(INPUT_BACKGROUND))
                    .border_1()
                    .border_color(rgb(border))
                    .rounded(px(RADIUS))
                    .child(ChannelTextElement {
                        input: context.entity().clone(),
                    }),
            )
    }
}

impl Focusable for ChannelInput {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

#[cfg(test)]
mod tests {
    use gpui::{Context, Entity, EntityInputHandler, Subscription, TestAppContext, Window};

    use super::*;

    /// Owner that answers every edit by writing `reply` back into the field.
    struct Owner {
        input: Entity<ChannelInput>,
        reply: String,
        _subscription: Subscription,
    }

    impl Render for Owner {
        fn render(&mut self, _: &mut Window, _: &mut Context<Self>) -> impl IntoElement {
            self.input.clone()
        }
    }

    fn type_at(
        cx: &mut TestAppContext,
        initial: &str,
        reply: &str,
        offset: usize,
        typed: &str,
    ) -> (String, Range<usize>) {
        let (initial, reply) = (initial.to_string(), reply.to_string());
        let window = cx.add_window(move |window, cx| {
            let input = ChannelInput::new(initial, window, cx);
            let subscription = cx.subscribe(
                &input,
                |this: &mut Owner, input, event: &ChannelInputEvent, cx| {
                    if let ChannelInputEvent::Changed(_) = event {
                        let reply = this.reply.clone();
                        input.update(cx, |input, cx| input.set_text(reply, cx));
                    }
                },
            );
            Owner {
                input,
                reply,
                _subscription: subscription,
            }
        });

        window
            .update(cx, |owner, window, cx| {
                owner.input.update(cx, |input, cx| {
                    input.move_to(offset, cx);
                    input.replace_text_in_range(None, typed, window, cx);
                });
            })
            .unwrap();
        window
            .update(cx, |owner, _, cx| {
                let input = owner.input.read(cx);
                (input.content.to_string(), input.selected_range.clone())
            })
            .unwrap()
    }

    #[gpui::test]
    fn restored_text_puts_caret_back(cx: &mut TestAppContext) {
        let (text, selection) = type_at(cx, "0078d4", "0078d4", 2, "x");
        assert_eq!(text, "0078d4");
        assert_eq!(selection, 2..2);
    }

    #[gpui::test]
    fn rewritten_text_clamps_caret(cx: &mut TestAppContext) {
        let (text, selection) = type_at(cx, "0078d4", "00", 6, "9");
        assert_eq!(text, "00");
        assert_eq!(selection, 2..2);
    }

    #[gpui::test]
    fn accepted_edit_keeps_caret_after_typed_text(cx: &mut TestAppContext) {
        let (text, selection) = type_at(cx, "12", "132", 1, "3");
        assert_eq!(text, "132");
        assert_eq!(selection, 2..2);
    }

    #[test]
    fn boundary_clamp_steps_back_inside_characters() {
        assert_eq!(clamp_to_boundary("abc", 10), 3);
        assert_eq!(clamp_to_boundary("a\u{e9}", 2), 1);
        assert_eq!(clamp_to_boundary("", 4), 0);
    }
}
