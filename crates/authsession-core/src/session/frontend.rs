use std::sync::Mutex;

/// The user-facing side of the session handlers.
///
/// `notify` shows a notice the user has to acknowledge, `navigate` moves the
/// user to another view. Both are fire-and-forget: the handlers never wait on
/// or inspect what the front end did with them.
pub trait Frontend: Send + Sync {
    fn notify(&self, message: &str);

    fn navigate(&self, path: &str);
}

/// Something the handlers asked the front end to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendEvent {
    Notice(String),
    Navigation(String),
}

/// Front end that records events instead of showing them.
/// Used by headless callers and tests.
#[derive(Debug, Default)]
pub struct RecordingFrontend {
    events: Mutex<Vec<FrontendEvent>>,
}

impl RecordingFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FrontendEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FrontendEvent::Notice(m) => Some(m),
                FrontendEvent::Navigation(_) => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FrontendEvent::Navigation(p) => Some(p),
                FrontendEvent::Notice(_) => None,
            })
            .collect()
    }

    fn push(&self, event: FrontendEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl Frontend for RecordingFrontend {
    fn notify(&self, message: &str) {
        self.push(FrontendEvent::Notice(message.to_string()));
    }

    fn navigate(&self, path: &str) {
        self.push(FrontendEvent::Navigation(path.to_string()));
    }
}
