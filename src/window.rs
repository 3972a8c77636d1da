use tauri::{
    AppHandle, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Wry,
    webview::NewWindowResponse,
};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;

use crate::{config::WindowConfig, error::AppError, protocol};

/// The label of the single chat window.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Where a link clicked in the chat window should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// The link stays inside the app.
    App,

    /// The link is handed to the system browser.
    External,
}

impl LinkTarget {
    /// Classifies `url` by whether it points into the asset bundle.
    pub fn of(url: &Url) -> Self {
        if protocol::is_app_url(url) {
            LinkTarget::App
        } else {
            LinkTarget::External
        }
    }
}

/// Opens `url` in the system browser.
fn open_externally(app: &AppHandle<Wry>, url: &Url) {
    tracing::debug!(%url, "opening external link in the browser");

    if let Err(err) = app.opener().open_url(url.as_str(), None::<&str>) {
        tracing::warn!(%url, error = %err, "failed to open external link");
    }
}

/// Opens the main chat window.
///
/// Links that leave the asset bundle are opened in the system browser, whether they
/// navigate the window or ask for a new one (`target="_blank"`). The app never opens a
/// second window.
///
/// # Arguments
///
/// * `app` - The app handle.
/// * `config` - The window config.
pub fn open_main_window(
    app: &AppHandle<Wry>,
    config: &WindowConfig,
) -> Result<WebviewWindow<Wry>, AppError> {
    config.validate()?;

    let url = protocol::app_url(&config.url)?;
    tracing::info!(%url, width = config.width, height = config.height, "opening main window");

    let navigation_handle = app.clone();
    let new_window_handle = app.clone();
    let builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::CustomProtocol(url))
        .title(&config.title)
        .inner_size(config.width, config.height)
        .on_navigation(move |url| match LinkTarget::of(url) {
            LinkTarget::App => true,

            LinkTarget::External => {
                open_externally(&navigation_handle, url);

                false
            }
        })
        .on_new_window(move |url, _features| {
            match LinkTarget::of(&url) {
                LinkTarget::App => tracing::debug!(%url, "ignoring request for a second app window"),

                LinkTarget::External => open_externally(&new_window_handle, &url),
            }

            NewWindowResponse::Deny
        });

    #[cfg(target_os = "macos")]
    let builder = builder.title_bar_style(tauri::TitleBarStyle::Visible);

    builder.build().map_err(|e| AppError::TauriError(e))
}

/// Shows an error dialog for a failure the app can't recover from, then exits.
///
/// The dialog doesn't block, so the event loop keeps running until it is dismissed.
///
/// # Arguments
///
/// * `app` - The app handle.
/// * `message` - The error to show.
/// * `exit_code` - The code to exit with once the dialog closes.
pub fn show_fatal_error(app: &AppHandle<Wry>, message: &str, exit_code: i32) {
    let exit_handle = app.clone();

    app.dialog()
        .message(format!("Inventa Chat failed to start: {}", message))
        .kind(MessageDialogKind::Error)
        .title("Error")
        .show(move |_| exit_handle.exit(exit_code));
}
