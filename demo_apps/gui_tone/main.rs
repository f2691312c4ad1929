//! egui control panel over a wgpu surface, with a 440 Hz tone behind the
//! "Enable Audio" button.
//!
//! Set `GLINT_NO_AUDIO=1` to run the GUI without opening an audio device.

use std::process::ExitCode;

use glint::App;
use glint::settings::AppSettings;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = if std::env::var_os("GLINT_NO_AUDIO").is_some() {
        AppSettings::gui_demo()
    } else {
        AppSettings::tone_demo()
    };

    match App::new().with_settings(settings).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
