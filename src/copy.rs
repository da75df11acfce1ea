use std::{cell::RefCell, rc::Rc, time::Duration};

use tracing::{debug, instrument, warn};

use crate::{
    page::{ButtonLabel, Clipboard, ResultSlot, Timer},
    view::ShortenViewModel,
};

pub const COPY_LABEL: &str = "Copy";
pub const NO_LINK_LABEL: &str = "No link";
pub const COPIED_LABEL: &str = "Copied";
pub const FAILED_LABEL: &str = "Failed";

pub const NO_LINK_REVERT: Duration = Duration::from_millis(1200);
pub const COPY_REVERT: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    NoLink,
    Copied,
    Failed,
}

pub struct CopyFlow {
    model: Rc<RefCell<ShortenViewModel>>,
    slot: Rc<dyn ResultSlot>,
    clipboard: Rc<dyn Clipboard>,
    button: Rc<dyn ButtonLabel>,
    timer: Rc<dyn Timer>,
}

impl CopyFlow {
    pub fn new(
        model: Rc<RefCell<ShortenViewModel>>,
        slot: Rc<dyn ResultSlot>,
        clipboard: Rc<dyn Clipboard>,
        button: Rc<dyn ButtonLabel>,
        timer: Rc<dyn Timer>,
    ) -> Self {
        Self {
            model,
            slot,
            clipboard,
            button,
            timer,
        }
    }

    /// Copies the displayed short URL, but only once a shorten attempt has
    /// succeeded. The button label reports the outcome and falls back to
    /// [`COPY_LABEL`] after a delay.
    #[instrument(skip(self))]
    pub async fn copy(&self) -> CopyOutcome {
        let text = self.slot.text();
        if text.is_empty() || !self.model.borrow().is_short_url_ready() {
            debug!("Nothing copyable on display");
            let _revert = RevertLabel::new(self, NO_LINK_REVERT);
            self.button.set_label(NO_LINK_LABEL);
            return CopyOutcome::NoLink;
        }

        let _revert = RevertLabel::new(self, COPY_REVERT);
        match self.clipboard.write_text(&text).await {
            Ok(()) => {
                self.button.set_label(COPIED_LABEL);
                CopyOutcome::Copied
            }
            Err(err) => {
                warn!(?err, "Clipboard write failed");
                self.button.set_label(FAILED_LABEL);
                CopyOutcome::Failed
            }
        }
    }
}

/// Schedules the label reset when dropped, so every exit from
/// [`CopyFlow::copy`] (including a dropped future) ends with the button
/// reading [`COPY_LABEL`] again.
struct RevertLabel {
    button: Rc<dyn ButtonLabel>,
    timer: Rc<dyn Timer>,
    delay: Duration,
}

impl RevertLabel {
    fn new(flow: &CopyFlow, delay: Duration) -> Self {
        Self {
            button: Rc::clone(&flow.button),
            timer: Rc::clone(&flow.timer),
            delay,
        }
    }
}

impl Drop for RevertLabel {
    fn drop(&mut self) {
        let button = Rc::clone(&self.button);
        self.timer
            .after(self.delay, Box::new(move || button.set_label(COPY_LABEL)));
    }
}
