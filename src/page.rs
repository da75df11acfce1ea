use std::time::Duration;

use async_trait::async_trait;

use crate::view::ResultView;

/// A text element that shows a flow's outcome.
pub trait ResultSlot {
    fn show(&self, view: &ResultView);

    /// What the element currently displays, placeholder text included.
    fn text(&self) -> String;
}

pub trait Navigator {
    /// Sends the page to `path`, relative to the service origin.
    fn navigate(&self, path: &str);
}

pub trait ButtonLabel {
    fn set_label(&self, label: &str);
}

#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Deferred callbacks. Scheduled tasks cannot be cancelled.
pub trait Timer {
    fn after(&self, delay: Duration, task: Box<dyn FnOnce()>);
}
