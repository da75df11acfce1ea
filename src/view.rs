/// Whether a displayed message reports success or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    /// CSS color the page paints the message with.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Success => "#141213",
            Self::Error => "#b42318",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultView {
    pub text: String,
    pub tone: Tone,
}

impl ResultView {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

/// State owned by the shorten form.
///
/// `short_url_ready` is the only thing that allows the copy button to act; it
/// is raised by [`Self::mark_ready`] and dropped by every other transition.
#[derive(Debug, Default)]
pub struct ShortenViewModel {
    short_url_ready: bool,
}

impl ShortenViewModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn reset(&mut self) {
        self.short_url_ready = false;
    }

    /// The in-flight message; the previous short URL is no longer copyable.
    pub fn pending(&mut self, message: &str) -> ResultView {
        self.reset();
        ResultView::success(message)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> ResultView {
        self.reset();
        ResultView::error(message)
    }

    pub fn mark_ready(&mut self, short_url: impl Into<String>) -> ResultView {
        self.short_url_ready = true;
        ResultView::success(short_url)
    }

    #[must_use]
    pub const fn is_short_url_ready(&self) -> bool {
        self.short_url_ready
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_starts_not_ready() {
        let model = ShortenViewModel::new();
        assert!(!model.is_short_url_ready());
    }

    #[test]
    fn test_ready_only_after_mark_ready() {
        let mut model = ShortenViewModel::new();

        assert_eq!(model.pending("Working..."), ResultView::success("Working..."));
        assert!(!model.is_short_url_ready());

        let shown = model.mark_ready("https://s.example/abc");
        assert_eq!(shown, ResultView::success("https://s.example/abc"));
        assert!(model.is_short_url_ready());
    }

    #[test]
    fn test_every_other_transition_drops_readiness() {
        let mut model = ShortenViewModel::new();
        model.mark_ready("https://s.example/abc");
        model.pending("Working...");
        assert!(!model.is_short_url_ready());

        model.mark_ready("https://s.example/abc");
        let shown = model.fail("Network error");
        assert_eq!(shown.tone, Tone::Error);
        assert!(!model.is_short_url_ready());

        model.mark_ready("https://s.example/abc");
        model.reset();
        assert!(!model.is_short_url_ready());
    }

    #[test]
    fn test_tone_colors() {
        assert_eq!(Tone::Success.color(), "#141213");
        assert_eq!(Tone::Error.color(), "#b42318");
    }
}
