use std::io::{self, Write};

use authsession_core::session::SessionStatus;
use authsession_core::Frontend;

/// Prints notices and navigation to stdout.
pub struct TerminalFrontend;

impl TerminalFrontend {
    pub fn new() -> Self {
        Self
    }
}

impl Frontend for TerminalFrontend {
    fn notify(&self, message: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", message);
    }

    fn navigate(&self, path: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", navigation_line(path));
    }
}

fn navigation_line(path: &str) -> String {
    format!("-> {}", path)
}

fn presence(present: bool) -> &'static str {
    if present {
        "stored"
    } else {
        "not stored"
    }
}

pub fn status_lines(status: &SessionStatus) -> [String; 2] {
    [
        format!("access token:  {}", presence(status.has_access_token)),
        format!("refresh token: {}", presence(status.has_refresh_token)),
    ]
}

pub fn print_status(status: &SessionStatus) {
    for line in status_lines(status) {
        println!("{}", line);
    }
}
