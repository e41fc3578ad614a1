//! Stderr message prefix, colored unless `NO_COLOR` is set.

use owo_colors::OwoColorize;

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}
