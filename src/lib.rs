use tauri::{App, Manager, RunEvent};

use crate::{assets::AssetBundle, config::HostConfig, error::AppError};

/// The static frontend bundle embedded into the binary.
pub mod assets;

/// Host configuration.
pub mod config;

/// Error types and utilities.
pub mod error;

/// Logging setup.
pub mod logging;

/// The custom URI scheme that serves the asset bundle to the webview.
pub mod protocol;

/// The main chat window.
pub mod window;

/// The application's name.
pub const APP_NAME: &str = "Inventa Chat";

/// The application's description.
pub const APP_DESCRIPTION: &str = "Cross-platform OpenAI API compatible chat application";

/// The process exit code for a failed run.
pub const FATAL_EXIT_CODE: u8 = 1;

/// Maps the result of [`run`] to the process exit code, logging any failure.
pub fn exit_code(result: &Result<(), AppError>) -> u8 {
    match result {
        Ok(()) => 0,

        Err(err) => fatal_exit_code(err),
    }
}

/// Logs a fatal error and returns the exit code the process should end with.
pub fn fatal_exit_code(error: &AppError) -> u8 {
    tracing::error!(error = %error, "{APP_NAME} exited with a fatal error");

    FATAL_EXIT_CODE
}

/// What to do once the app's startup work has finished.
#[derive(Debug)]
enum SetupOutcome {
    /// The main window is open; keep the config around for the run loop.
    Ready(HostConfig),

    /// Startup failed; show `message` and exit with `code`.
    Fatal { code: u8, message: String },
}

impl SetupOutcome {
    fn from_result(result: Result<HostConfig, AppError>) -> Self {
        match result {
            Ok(config) => SetupOutcome::Ready(config),

            Err(err) => SetupOutcome::Fatal {
                code: fatal_exit_code(&err),
                message: err.to_string(),
            },
        }
    }
}

/// Loads the host config and opens the main window.
fn open_main_window(app: &App) -> Result<HostConfig, AppError> {
    let config_dir = app
        .path()
        .app_config_dir()
        .map_err(|e| AppError::TauriError(e))?;
    let config = HostConfig::load(&config_dir)?;

    window::open_main_window(app.handle(), &config.window)?;

    Ok(config)
}

/// Whether the app should keep running after an exit request.
///
/// Only the implicit request raised when the last window closes (`code` is `None`) can be
/// refused, and only on macOS when the config opts out of terminating.
///
/// # Arguments
///
/// * `code` - The exit code of the request, `None` when the last window was closed.
/// * `config` - The host config, if setup got far enough to load it.
pub fn should_stay_resident(code: Option<i32>, config: Option<&HostConfig>) -> bool {
    code.is_none()
        && cfg!(target_os = "macos")
        && config.is_some_and(|config| !config.mac.terminate_after_last_window_closed)
}

/// Runs the `tauri` app.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() -> Result<(), AppError> {
    tracing::info!("starting {APP_NAME}: {APP_DESCRIPTION}");

    let bundle = AssetBundle::embedded();

    // Build the application.
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_http::init())
        .register_uri_scheme_protocol(protocol::ASSET_SCHEME, move |_ctx, request| {
            protocol::handle_request(&bundle, &request)
        })
        .setup(|app| {
            // Setup runs inside the event loop, where an `Err` would panic instead of
            // reaching the caller, so failures end the app through `exit`.
            match SetupOutcome::from_result(open_main_window(app)) {
                SetupOutcome::Ready(config) => {
                    app.manage(config);
                }

                SetupOutcome::Fatal { code, message } => {
                    window::show_fatal_error(app.handle(), &message, i32::from(code));
                }
            }

            Ok(())
        })
        .build(tauri::generate_context!())
        .map_err(|e| AppError::TauriError(e))?;

    // Run the app.
    app.run(|app_handle, event| match event {
        RunEvent::ExitRequested { code, api, .. } => {
            let config = app_handle.try_state::<HostConfig>();

            if should_stay_resident(code, config.as_deref()) {
                tracing::debug!("last window closed, staying resident");
                api.prevent_exit();
            }
        }

        RunEvent::Exit => {
            tracing::info!("{APP_NAME} exiting");
        }

        _ => {}
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident_config() -> HostConfig {
        HostConfig::from_yaml("mac:\n  terminateAfterLastWindowClosed: false\n").unwrap()
    }

    #[test]
    fn success_exits_cleanly() {
        assert_eq!(exit_code(&Ok(())), 0);
    }

    #[test]
    fn run_failure_exits_non_zero() {
        let result = Err(AppError::GenericError("event loop failed".to_string()));

        assert_eq!(exit_code(&result), FATAL_EXIT_CODE);
        assert_ne!(FATAL_EXIT_CODE, 0);
    }

    #[test]
    fn invalid_window_config_ends_setup_with_the_fatal_exit_code() {
        let loaded = HostConfig::from_yaml("window:\n  height: -1\n");

        match SetupOutcome::from_result(loaded) {
            SetupOutcome::Fatal { code, message } => {
                assert_eq!(code, FATAL_EXIT_CODE);
                assert!(message.contains("Invalid window configuration"), "{message}");
            }

            SetupOutcome::Ready(config) => panic!("setup should have failed: {config:?}"),
        }
    }

    #[test]
    fn valid_config_keeps_setup_running() {
        let outcome = SetupOutcome::from_result(Ok(HostConfig::default()));

        assert!(matches!(outcome, SetupOutcome::Ready(config) if config == HostConfig::default()));
    }

    #[test]
    fn closing_the_last_window_quits_by_default() {
        assert!(!should_stay_resident(None, Some(&HostConfig::default())));
    }

    #[test]
    fn closing_the_last_window_quits_without_a_config() {
        assert!(!should_stay_resident(None, None));
    }

    #[test]
    fn opting_out_keeps_the_app_resident_on_macos_only() {
        assert_eq!(
            should_stay_resident(None, Some(&resident_config())),
            cfg!(target_os = "macos")
        );
    }

    #[test]
    fn explicit_exits_are_never_prevented() {
        let config = resident_config();

        assert!(!should_stay_resident(Some(0), Some(&config)));
        assert!(!should_stay_resident(Some(i32::from(FATAL_EXIT_CODE)), Some(&config)));
    }
}
