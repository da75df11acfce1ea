use std::{cell::RefCell, rc::Rc, sync::Arc};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    client::{ApiError, ShortenerApi},
    page::{Navigator, ResultSlot},
    validate::{self, ValidationError},
    view::{ResultView, ShortenViewModel},
};

pub const WORKING_MESSAGE: &str = "Working...";
pub const CHECKING_MESSAGE: &str = "Checking...";
pub const SHORTEN_FALLBACK: &str = "Failed to shorten";
pub const RESOLVE_FALLBACK: &str = "Code not found";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Each call is an independent attempt. Overlapping calls are neither
/// de-duplicated nor cancelled; whichever response arrives last owns the display.
pub struct ShortenFlow {
    api: Arc<dyn ShortenerApi>,
    model: Rc<RefCell<ShortenViewModel>>,
    slot: Rc<dyn ResultSlot>,
}

impl ShortenFlow {
    pub fn new(api: Arc<dyn ShortenerApi>, slot: Rc<dyn ResultSlot>) -> Self {
        Self {
            api,
            model: Rc::new(RefCell::new(ShortenViewModel::new())),
            slot,
        }
    }

    /// The form state, shared with whoever needs to know if the short URL is copyable.
    #[must_use]
    pub fn model(&self) -> Rc<RefCell<ShortenViewModel>> {
        Rc::clone(&self.model)
    }

    /// Validates the raw field values and asks the service for a short URL.
    ///
    /// The display is updated on every path; the return value only reports
    /// what happened.
    ///
    /// # Errors
    /// Will return [`Err`] if validation fails or the service call does.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        raw_url: &str,
        raw_custom_code: Option<&str>,
    ) -> Result<String, FlowError> {
        let request = match validate::shorten_request(raw_url, raw_custom_code) {
            Ok(request) => request,
            Err(err) => {
                info!(%err, "Shorten input rejected");
                self.render(|model| model.fail(err.to_string()));
                return Err(err.into());
            }
        };

        self.render(|model| model.pending(WORKING_MESSAGE));

        match self.api.shorten(&request).await {
            Ok(response) => {
                info!(
                    short_url = response.short_url,
                    short_code = ?response.short_code,
                    "Shortened URL"
                );
                self.render(|model| model.mark_ready(response.short_url.clone()));
                Ok(response.short_url)
            }
            Err(err) => {
                warn!(?err, "Shorten request failed");
                self.render(|model| model.fail(err.user_message(SHORTEN_FALLBACK)));
                Err(err.into())
            }
        }
    }

    // NOTE: the model borrow ends before the slot runs so a slot may read the model
    fn render(&self, transition: impl FnOnce(&mut ShortenViewModel) -> ResultView) {
        let view = transition(&mut self.model.borrow_mut());
        self.slot.show(&view);
    }
}

pub struct ResolveFlow {
    api: Arc<dyn ShortenerApi>,
    slot: Rc<dyn ResultSlot>,
    navigator: Rc<dyn Navigator>,
}

impl ResolveFlow {
    pub fn new(
        api: Arc<dyn ShortenerApi>,
        slot: Rc<dyn ResultSlot>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            slot,
            navigator,
        }
    }

    /// Looks the code up and, when it exists, hands navigation to the
    /// service's own redirect route for that code.
    ///
    /// # Errors
    /// Will return [`Err`] if the code is blank or the lookup fails.
    #[instrument(skip(self))]
    pub async fn submit(&self, raw_code: &str) -> Result<String, FlowError> {
        let code = match validate::resolve_code(raw_code) {
            Ok(code) => code,
            Err(err) => {
                self.slot.show(&ResultView::error(err.to_string()));
                return Err(err.into());
            }
        };

        self.slot.show(&ResultView::success(CHECKING_MESSAGE));

        match self.api.resolve(code).await {
            Ok(response) => {
                info!(code, url = response.url, "Resolved code");
                self.slot
                    .show(&ResultView::success(format!("Redirecting to {}", response.url)));
                self.navigator.navigate(&short_link_path(code));
                Ok(response.url)
            }
            Err(err) => {
                warn!(?err, code, "Resolve request failed");
                self.slot
                    .show(&ResultView::error(err.user_message(RESOLVE_FALLBACK)));
                Err(err.into())
            }
        }
    }
}

/// Path of the service route that redirects `code` to its target.
#[must_use]
pub fn short_link_path(code: &str) -> String {
    format!("/{}", urlencoding::encode(code))
}
