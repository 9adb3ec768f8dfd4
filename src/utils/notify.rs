// src/utils/notify.rs

//! User-facing notifications.
//!
//! Success and failure messages go to the terminal with a timestamp and are
//! mirrored to the `log` facade.

use chrono::Local;

/// Notification style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Success,
    Failure,
}

impl Style {
    fn as_str(&self) -> &'static str {
        match self {
            Style::Success => "OK",
            Style::Failure => "FAIL",
        }
    }
}

/// Render a notification line without timestamp.
pub fn render(style: Style, title: &str, message: Option<&str>) -> String {
    match message.filter(|m| !m.is_empty()) {
        Some(message) => format!("[{}] {}: {}", style.as_str(), title, message),
        None => format!("[{}] {}", style.as_str(), title),
    }
}

fn stamp(line: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{timestamp}] {line}")
}

/// Report a successful action.
pub fn success(title: &str, message: Option<&str>) {
    let line = render(Style::Success, title, message);
    log::info!("{line}");
    println!("{}", stamp(&line));
}

/// Report a failed action.
pub fn fail(title: &str, message: Option<&str>) {
    let line = render(Style::Failure, title, message);
    log::error!("{line}");
    eprintln!("{}", stamp(&line));
}
