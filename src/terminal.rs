use std::cell::RefCell;

use tracing::{debug, warn};
use url::Url;

use crate::{
    page::{Navigator, ResultSlot},
    view::{ResultView, Tone},
};

/// Keeps only the latest view; intermediate messages go to the debug log.
#[derive(Debug, Default)]
pub struct TerminalSlot {
    last: RefCell<Option<ResultView>>,
}

impl TerminalSlot {
    #[must_use]
    pub fn last(&self) -> Option<ResultView> {
        self.last.borrow().clone()
    }

    /// Success goes to stdout, errors to stderr.
    pub fn print(&self) {
        match self.last() {
            Some(ResultView {
                text,
                tone: Tone::Success,
            }) => println!("{text}"),
            Some(ResultView {
                text,
                tone: Tone::Error,
            }) => eprintln!("{text}"),
            None => {}
        }
    }
}

impl ResultSlot for TerminalSlot {
    fn show(&self, view: &ResultView) {
        debug!(text = view.text, tone = ?view.tone, "Display updated");
        *self.last.borrow_mut() = Some(view.clone());
    }

    fn text(&self) -> String {
        self.last().map(|view| view.text).unwrap_or_default()
    }
}

/// Records where the browser would have gone instead of going there.
#[derive(Debug)]
pub struct TerminalNavigator {
    base_url: Url,
    target: RefCell<Option<Url>>,
}

impl TerminalNavigator {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            target: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<Url> {
        self.target.borrow().clone()
    }
}

impl Navigator for TerminalNavigator {
    // Relative to the base so a service mounted under a path prefix keeps it
    fn navigate(&self, path: &str) {
        match self.base_url.join(path.trim_start_matches('/')) {
            Ok(url) => *self.target.borrow_mut() = Some(url),
            Err(err) => warn!(path, ?err, "Cannot build navigation target"),
        }
    }
}
