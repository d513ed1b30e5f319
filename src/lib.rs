mod clipper;
mod commands;
mod tools;
mod validator;

use commands::{default_formats, download_and_trim, get_video_info, validate_url, AppSession};
use tools::get_tools_status;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppSession::new())
        .invoke_handler(tauri::generate_handler![
            validate_url,
            default_formats,
            get_video_info,
            download_and_trim,
            get_tools_status,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
