// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process::ExitCode;

/// The application's entrypoint.
fn main() -> ExitCode {
    inventa_chat_lib::logging::init();

    let result = inventa_chat_lib::run();

    ExitCode::from(inventa_chat_lib::exit_code(&result))
}
