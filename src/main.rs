mod channel_input;
mod color;
mod color_editor;
mod color_picker;
mod color_surface;
mod components;
mod configuration;
mod debounce;
mod designer;
mod palette;
mod theme;

use std::path::PathBuf;

use gpui::{
    Application, Bounds, Focusable, KeyBinding, WindowBackgroundAppearance, WindowBounds,
    WindowOptions, prelude::*, px, size,
};

use crate::{
    channel_input::{
        Backspace, Copy, Cut, Delete, End, Home, Left, Paste, Right, SelectAll, SelectLeft,
        SelectRight,
    },
    configuration::DesignerConfiguration,
    designer::{ExportTheme, FocusNext, FocusPrevious, Quit, ResetColors, ThemingDesigner},
    theme::{WINDOW_HEIGHT, WINDOW_WIDTH},
};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("theming_designer=info"),
    )
    .init();

    log::info!(
        "theming-designer v{} starting (RUST_LOG={})",
        env!("CARGO_PKG_VERSION"),
        std::env::var("RUST_LOG").unwrap_or_else(|_| "<default: info>".into()),
    );

    let configuration_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(DesignerConfiguration::file_path);
    log::info!(
        "[startup] configuration path: {}",
        configuration_path.display()
    );
    let configuration = DesignerConfiguration::load(&configuration_path);

    Application::new().run(move |context| {
        let bounds = Bounds::centered(None, size(px(WINDOW_WIDTH), px(WINDOW_HEIGHT)), context);

        bind_keys(context);

        let window = context.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: None,
                window_background: WindowBackgroundAppearance::Opaque,
                ..Default::default()
            },
            |window, context| {
                context.new(|context| ThemingDesigner::new(&configuration, window, context))
            },
        );

        match window {
            Ok(window) => {
                if let Err(error) = window.update(context, |view, window, context| {
                    let handle = view.focus_handle(context);
                    window.focus(&handle, context);
                    context.activate(true);
                }) {
                    log::error!("[startup] failed to initialize designer window: {error}");
                    context.quit();
                    return;
                }

                context.on_action(|_: &Quit, context| context.quit());
            }
            Err(error) => {
                log::error!("[startup] failed to open designer window: {error}");
                context.quit();
            }
        }
    });
}

fn bind_keys(context: &mut gpui::App) {
    context.bind_keys([
        KeyBinding::new("backspace", Backspace, Some("ChannelInput")),
        KeyBinding::new("delete", Delete, Some("ChannelInput")),
        KeyBinding::new("left", Left, Some("ChannelInput")),
        KeyBinding::new("right", Right, Some("ChannelInput")),
        KeyBinding::new("shift-left", SelectLeft, Some("ChannelInput")),
        KeyBinding::new("shift-right", SelectRight, Some("ChannelInput")),
        KeyBinding::new("home", Home, Some("ChannelInput")),
        KeyBinding::new("end", End, Some("ChannelInput")),
        KeyBinding::new("cmd-a", SelectAll, Some("ChannelInput")),
        KeyBinding::new("cmd-v", Paste, Some("ChannelInput")),
        KeyBinding::new("cmd-c", Copy, Some("ChannelInput")),
        KeyBinding::new("cmd-x", Cut, Some("ChannelInput")),
        KeyBinding::new("ctrl-a", SelectAll, Some("ChannelInput")),
        KeyBinding::new("ctrl-v", Paste, Some("ChannelInput")),
        KeyBinding::new("ctrl-c", Copy, Some("ChannelInput")),
        KeyBinding::new("ctrl-x", Cut, Some("ChannelInput")),
    ]);

    context.bind_keys([
        KeyBinding::new("tab", FocusNext, Some("ThemingDesigner")),
        KeyBinding::new("shift-tab", FocusPrevious, Some("ThemingDesigner")),
        KeyBinding::new("cmd-e", ExportTheme, Some("ThemingDesigner")),
        KeyBinding::new("ctrl-e", ExportTheme, Some("ThemingDesigner")),
        KeyBinding::new("cmd-r", ResetColors, Some("ThemingDesigner")),
        KeyBinding::new("ctrl-r", ResetColors, Some("ThemingDesigner")),
        KeyBinding::new("cmd-q", Quit, Some("ThemingDesigner")),
        KeyBinding::new("ctrl-q", Quit, Some("ThemingDesigner")),
    ]);
}
