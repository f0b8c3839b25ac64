use std::time::Duration;

use gpui::{
    App, ClipboardItem, Context, CursorStyle, Entity, FocusHandle, Focusable, MouseButton,
    Subscription, Window, actions, div, prelude::*, px, rgb, rgba,
};

use crate::{
    color_editor::ColorError,
    color_picker::{ColorPicker, ColorPickerEvent, ColorPickerOptions},
    components::*,
    configuration::DesignerConfiguration,
    debounce::Debounce,
    palette::{BaseColors, BaseSlot, ContrastCheck, DesignTheme, FONT_FAMILIES, MINIMUM_CONTRAST},
    theme::*,
};

actions!(
    theming_designer,
    [
        FocusNext,
        FocusPrevious,
        ExportTheme,
        ResetColors,
        Quit
    ]
);

const THEME_REFRESH_DELAY: Duration = Duration::from_millis(20);

const PREVIEW_HEADLINE: &str = "Theming designer";
const PREVIEW_BODY: &str = "The quick brown fox jumps over the lazy dog. Body text, links and \
                            buttons below are drawn with the colors and font picked on the left.";

pub struct ThemingDesigner {
    pickers: Vec<(BaseSlot, Entity<ColorPicker>)>,
    colors: BaseColors,
    font: &'static str,
    theme: DesignTheme,
    theme_refresh: Debounce,
    status_detail: String,
    focus_handle: FocusHandle,
    font_focus_handles: Vec<FocusHandle>,
    export_focus_handle: FocusHandle,
    reset_focus_handle: FocusHandle,
    _subscriptions: Vec<Subscription>,
}

impl ThemingDesigner {
    pub fn new(
        configuration: &DesignerConfiguration,
        window: &mut Window,
        context: &mut Context<Self>,
    ) -> Self {
        let colors = BaseColors {
            primary: configuration.color(BaseSlot::Primary),
            foreground: configuration.color(BaseSlot::Foreground),
            background: configuration.color(BaseSlot::Background),
        };
        let font = configuration.font();

        let mut pickers = Vec::new();
        let mut subscriptions = Vec::new();
        for slot in BaseSlot::ALL {
            let picker = ColorPicker::new(
                ColorPickerOptions {
                    color: Some(colors.get(slot).clone()),
                    labels: configuration.labels.clone(),
                    alpha_hidden: configuration.alpha_hidden,
                },
                window,
                context,
            );
            subscriptions.push(context.subscribe(
                &picker,
                move |this: &mut Self, _, event: &ColorPickerEvent, context| {
                    this.on_picker_event(slot, event, context);
                },
            ));
            pickers.push((slot, picker));
        }

        log::info!(
            "[designer] primary={}, text={}, background={}, font={font}",
            colors.primary,
            colors.foreground,
            colors.background,
        );

        Self {
            pickers,
            theme: DesignTheme::new(&colors, font),
            colors,
            font,
            theme_refresh: Debounce::new(THEME_REFRESH_DELAY),
            status_detail: String::new(),
            focus_handle: context.focus_handle(),
            font_focus_handles: FONT_FAMILIES
                .iter()
                .map(|_| context.focus_handle())
                .collect(),
            export_focus_handle: context.focus_handle(),
            reset_focus_handle: context.focus_handle(),
            _subscriptions: subscriptions,
        }
    }

    fn on_picker_event(
        &mut self,
        slot: BaseSlot,
        event: &ColorPickerEvent,
        context: &mut Context<Self>,
    ) {
        let ColorPickerEvent::Change(color) = event;
        log::debug!("[designer] {} changed to {color}", slot.label());
        self.colors.set(slot, color.clone());
        self.schedule_theme_refresh(context);
        context.notify();
    }

    fn schedule_theme_refresh(&mut self, context: &mut Context<Self>) {
        self.theme_refresh.schedule(context, |this, context| {
            this.refresh_theme();
            context.notify();
        });
    }

    fn refresh_theme(&mut self) {
        self.theme = DesignTheme::new(&self.colors, self.font);
        log::debug!(
            "[designer] theme refreshed (inverted={}, font={})",
            self.theme.is_inverted,
            self.theme.font_family,
        );
    }

    fn select_font(&mut self, index: usize, context: &mut Context<Self>) {
        let Some(&family) = FONT_FAMILIES.get(index) else {
            return;
        };
        if family == self.font {
            return;
        }
        log::info!("[designer] font: {family}");
        self.font = family;
        self.schedule_theme_refresh(context);
        context.notify();
    }

    fn export_theme(
        &mut self,
        _: &ExportTheme,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        // export what is on screen now, not what the pending refresh would show
        self.theme_refresh.cancel();
        self.refresh_theme();

        match self.theme.to_json() {
            Ok(json) => {
                context.write_to_clipboard(ClipboardItem::new_string(json));
                log::info!("[designer] theme exported to clipboard");
                self.status_detail = "Theme JSON copied to the clipboard".into();
            }
            Err(error) => {
                log::warn!("[designer] {error}");
                self.status_detail = error;
            }
        }
        context.notify();
    }

    fn reset_colors(
        &mut self,
        _: &ResetColors,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        log::info!("[designer] colors reset to defaults");
        for (slot, picker) in &self.pickers {
            let reset = picker.update(context, |picker, context| {
                picker.set_color_str(slot.default_color(), context)?;
                Ok::<_, ColorError>(picker.color().clone())
            });
            match reset {
                Ok(color) => self.colors.set(*slot, color),
                Err(error) => log::warn!("[designer] {} not reset: {error}", slot.label()),
            }
        }
        self.status_detail.clear();
        self.schedule_theme_refresh(context);
        context.notify();
    }

    fn focusable_entries(&self, context: &App) -> Vec<FocusHandle> {
        let mut entries: Vec<FocusHandle> = self
            .pickers
            .iter()
            .flat_map(|(_, picker)| picker.read(context).channel_focus_handles(context))
            .collect();
        entries.extend(self.font_focus_handles.iter().cloned());
        entries.push(self.export_focus_handle.clone());
        entries.push(self.reset_focus_handle.clone());
        entries
    }

    fn focus_next(&mut self, _: &FocusNext, window: &mut Window, context: &mut Context<Self>) {
        let entries = self.focusable_entries(context);
        let next = entries
            .iter()
            .position(|handle| handle.is_focused(window))
            .map_or(0, |current| (current + 1) % entries.len());
        window.focus(&entries[next], context);
    }

    fn focus_previous(
        &mut self,
        _: &FocusPrevious,
        window: &mut Window,
        context: &mut Context<Self>,
    ) {
        let entries = self.focusable_entries(context);
        let previous = match entries.iter().position(|handle| handle.is_focused(window)) {
            Some(0) | None => entries.len() - 1,
            Some(current) => current - 1,
        };
        window.focus(&entries[previous], context);
    }

    fn quit(&mut self, _: &Quit, _window: &mut Window, context: &mut Context<Self>) {
        log::info!("[quit] shutting down");
        context.quit();
    }
}

impl Render for ThemingDesigner {
    fn render(&mut self, _window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        div()
            .key_context("ThemingDesigner")
            .track_focus(&self.focus_handle(context))
            .on_action(context.listener(Self::focus_next))
            .on_action(context.listener(Self::focus_previous))
            .on_action(context.listener(Self::export_theme))
            .on_action(context.listener(Self::reset_colors))
            .on_action(context.listener(Self::quit))
            .flex()
            .flex_col()
            .size_full()
            .bg(rgb(SURFACE))
            .child(self.render_titlebar(context))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .flex_1()
                    .overflow_hidden()
                    .child(
                        div()
                            .id("pickers-scroll")
                            .flex()
                            .flex_col()
                            .w(px(LEFT_COLUMN_WIDTH))
                            .flex_shrink_0()
                            .overflow_y_scroll()
                            .border_r_1()
                            .border_color(rgb(BORDER))
                            .px(px(PADDING_COLUMN))
                            .pb(px(PADDING_COLUMN))
                            .pt(px(PADDING_COLUMN_TOP))
                            .gap(px(GAP_LARGE))
                            .children(self.pickers.iter().map(|(slot, picker)| {
                                div()
                                    .flex()
                                    .flex_col()
                                    .gap(px(GAP_EXTRA_SMALL))
                                    .child(label(slot.label()))
                                    .child(picker.clone())
                            }))
                            .child(self.render_font_selector(context)),
                    )
                    .child(
                        div()
                            .id("preview-scroll")
                            .flex()
                            .flex_col()
                            .flex_1()
                            .overflow_y_scroll()
                            .px(px(PADDING_COLUMN))
                            .pb(px(PADDING_COLUMN))
                            .pt(px(PADDING_COLUMN_TOP))
                            .gap(px(GAP_MEDIUM))
                            .child(label("Preview"))
                            .child(self.render_preview())
                            .child(label("Base colors"))
                            .child(self.render_slot_swatches())
                            .child(label(&format!(
                                "Accessibility (minimum contrast {MINIMUM_CONTRAST}:1)"
                            )))
                            .child(self.render_contrast_report())
                            .child(self.render_actions(context)),
                    ),
            )
    }
}

impl ThemingDesigner {
    fn render_titlebar(&self, context: &mut Context<Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .w_full()
            .h(px(TITLEBAR_HEIGHT))
            .bg(rgb(TITLEBAR_BACKGROUND))
            .border_b_1()
            .border_color(rgb(BORDER))
            .child(
                titlebar_title("Theming Designer")
                    .cursor(CursorStyle::default())
                    .on_mouse_down(
                        MouseButton::Left,
                        context.listener(|_, _, window, _| window.start_window_move()),
                    ),
            )
            .child(titlebar_close().on_mouse_up(
                MouseButton::Left,
                context.listener(|this, _, window, context| this.quit(&Quit, window, context)),
            ))
    }

    fn render_font_selector(&self, context: &mut Context<Self>) -> impl IntoElement {
        selector(
            "Font",
            selector_row().children(FONT_FAMILIES.iter().enumerate().map(|(index, family)| {
                selector_option(
                    family,
                    *family == self.font,
                    &self.font_focus_handles[index],
                )
                .on_mouse_up(
                    MouseButton::Left,
                    context.listener(move |this, _, _, context| this.select_font(index, context)),
                )
            })),
        )
    }

    fn render_preview(&self) -> impl IntoElement {
        let theme = &self.theme;
        let primary = rgba(theme.primary_color.to_rgba_u32());
        let foreground = rgba(theme.foreground_color.to_rgba_u32());

        div()
            .flex()
            .flex_col()
            .gap(px(GAP_MEDIUM))
            .p(px(PADDING_COLUMN))
            .rounded(px(RADIUS))
            .border_1()
            .border_color(rgb(if theme.is_inverted {
                BORDER_STRONG
            } else {
                BORDER
            }))
            .bg(rgba(theme.background_color.to_rgba_u32()))
            .text_color(foreground)
            .font_family(theme.font_family.clone())
            .child(
                div()
                    .text_size(px(TEXT_SIZE_LARGE))
                    .child(PREVIEW_HEADLINE),
            )
            .child(
                div()
                    .text_size(px(TEXT_SIZE_MEDIUM))
                    .line_height(px(LINE_HEIGHT_MEDIUM))
                    .child(PREVIEW_BODY),
            )
            .child(
                div()
                    .text_size(px(TEXT_SIZE_MEDIUM))
                    .text_color(primary)
                    .child("A link in the primary color"),
            )
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap(px(GAP_SMALL))
                    .text_size(px(TEXT_SIZE_MEDIUM))
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .px(px(PADDING_INPUT_HORIZONTAL))
                            .h(px(ELEMENT_HEIGHT))
                            .rounded(px(RADIUS))
                            .bg(primary)
                            .text_color(rgb(TEXT_WHITE))
                            .child("Primary button"),
                    )
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .px(px(PADDING_INPUT_HORIZONTAL))
                            .h(px(ELEMENT_HEIGHT))
                            .rounded(px(RADIUS))
                            .border_1()
                            .border_color(foreground)
                            .child("Default button"),
                    ),
            )
    }

    fn render_slot_swatches(&self) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .gap(px(GAP_MEDIUM))
            .children(BaseSlot::ALL.into_iter().map(|slot| {
                let color = self.theme.slot(slot);
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap(px(GAP_SMALL))
                    .p(px(GAP_SMALL))
                    .rounded(px(RADIUS))
                    .bg(rgb(PANEL_BACKGROUND))
                    .border_1()
                    .border_color(rgb(BORDER))
                    .child(swatch(color, SWATCH_LARGE))
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .child(label(slot.label()))
                            .child(status_detail(color.display().to_string())),
                    )
            }))
            .child(status_detail(if self.theme.is_inverted {
                "Dark background: inverted theme".into()
            } else {
                "Light background".into()
            }))
    }

    fn render_contrast_report(&self) -> impl IntoElement {
        div()
            .flex()
            .flex_col()
            .gap(px(GAP_EXTRA_SMALL))
            .children(
                self.theme
                    .contrast_report()
                    .into_iter()
                    .map(|check| contrast_row(&check)),
            )
    }

    fn render_actions(&self, context: &mut Context<Self>) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .gap(px(GAP_SMALL))
            .child(
                button_action("Export theme", &self.export_focus_handle).on_mouse_up(
                    MouseButton::Left,
                    context.listener(|this, _, window, context| {
                        this.export_theme(&ExportTheme, window, context);
                    }),
                ),
            )
            .child(
                button_ghost("Reset to defaults", &self.reset_focus_handle).on_mouse_up(
                    MouseButton::Left,
                    context.listener(|this, _, window, context| {
                        this.reset_colors(&ResetColors, window, context);
                    }),
                ),
            )
            .child(status_detail(self.status_detail.clone()))
    }
}

fn contrast_row(check: &ContrastCheck) -> impl IntoElement + use<> {
    div()
        .flex()
        .flex_row()
        .items_center()
        .gap(px(GAP_SMALL))
        .h(px(ELEMENT_HEIGHT))
        .px(px(GAP_SMALL))
        .rounded(px(RADIUS))
        .bg(rgb(PANEL_BACKGROUND))
        .border_1()
        .border_color(rgb(BORDER))
        .child(
            div()
                .flex()
                .items_center()
                .justify_center()
                .w(px(SWATCH_SIZE))
                .rounded(px(RADIUS))
                .bg(rgb(check.background.to_rgb_u32()))
                .text_color(rgb(check.foreground.to_rgb_u32()))
                .text_size(px(TEXT_SIZE_SMALL))
                .child("Aa"),
        )
        .child(div().flex_1().child(label(check.label)))
        .child(status_detail(format!("{:.2}:1", check.ratio)))
        .child(verdict(check.passes()))
}

impl Focusable for ThemingDesigner {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}
