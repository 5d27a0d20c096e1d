//! Summary card state machine.
//!
//! One `WidgetController` exists per page view. It owns the card's state; the
//! host page and the network are reached only through [`HostPage`] and
//! [`SummaryApi`].

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::page::{ArticleContext, HostPage};
use super::skeleton::{LOADING_HTML, SKELETON_HTML};
use super::state::{PageEvent, WidgetAction, WidgetState};
use super::transport::SummaryApi;
use super::{
    ARTICLE_CONTAINER_ID, CARD_ELEMENT_ID, HOME_HREF, INTRO_TEXT, POST_ANCHOR_ID, RELATED_TEXT,
    SUMMARY_ERROR_TEXT,
};
use crate::errors::WidgetError;
use crate::theme::action_ids;

pub struct WidgetController<P, A> {
    page: P,
    api: A,
    state: Mutex<WidgetState>,
    initializing: AtomicBool,
}

/// Clears the re-entrancy flag even if initialization is abandoned mid-await.
struct InitGuard<'a>(&'a AtomicBool);

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P: HostPage, A: SummaryApi> WidgetController<P, A> {
    pub fn new(page: P, api: A) -> Self {
        Self {
            page,
            api,
            state: Mutex::new(WidgetState::Absent),
            initializing: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> WidgetState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: WidgetState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *state;
        debug!(from = %previous, to = %next, "Widget state transition");
        *state = next;
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Inserts the card and drives it to `Loading` and beyond.
    ///
    /// Returns `Ok(true)` when this call created the card, `Ok(false)` when it
    /// was a no-op because a card exists or another initialization is running.
    ///
    /// # Errors
    ///
    /// `AnchorMissing` when the page lacks an anchor (nothing is touched), or
    /// `TemplateFetchFailed` when the template could not be loaded (the
    /// skeleton stays). Summary failures are reflected in the state, not here.
    pub async fn initialize(&self) -> Result<bool, WidgetError> {
        if self.initializing.swap(true, Ordering::AcqRel) {
            debug!("Initialization already in progress");
            return Ok(false);
        }
        let _guard = InitGuard(&self.initializing);

        if self.state() != WidgetState::Absent || self.page.card_exists() {
            debug!("Summary card already present");
            return Ok(false);
        }

        if !self.page.has_article_container() {
            return Err(WidgetError::AnchorMissing(ARTICLE_CONTAINER_ID.to_string()));
        }
        if !self.page.has_post_anchor() {
            return Err(WidgetError::AnchorMissing(POST_ANCHOR_ID.to_string()));
        }

        self.page.insert_card(SKELETON_HTML);
        self.set_state(WidgetState::Skeleton);
        debug!(element = CARD_ELEMENT_ID, anchor = POST_ANCHOR_ID, "Inserted card skeleton");

        let card = match self.api.fetch_template().await {
            Ok(card) => card,
            Err(e) => {
                // The skeleton stays in the DOM, so later triggers see a card and stop.
                error!(error = %e, "Failed to load card template, keeping skeleton");
                self.set_state(WidgetState::Absent);
                return Err(e);
            }
        };

        self.page.set_card_html(&card);
        let actions: Vec<WidgetAction> = action_ids(&card)
            .iter()
            .filter_map(|id| WidgetAction::from_id(id))
            .collect();
        self.page.bind_actions(&actions);
        self.set_state(WidgetState::Loading);

        let _ = self.fetch_summary().await;
        Ok(true)
    }

    /// Re-issues the summary request from `Populated` or `Failed`.
    ///
    /// A request already in flight makes this a no-op, as does calling it
    /// before the card has rendered.
    ///
    /// # Errors
    ///
    /// Returns the failure that moved the card to `Failed`.
    pub async fn request_summary(&self) -> Result<(), WidgetError> {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match *state {
                WidgetState::Populated | WidgetState::Failed => *state = WidgetState::Loading,
                WidgetState::Loading => {
                    debug!("Summary request already in flight");
                    return Ok(());
                }
                current @ (WidgetState::Absent | WidgetState::Skeleton) => {
                    debug!(state = %current, "Card not rendered, ignoring summary request");
                    return Ok(());
                }
            }
        }
        self.fetch_summary().await
    }

    async fn fetch_summary(&self) -> Result<(), WidgetError> {
        let request = ArticleContext::capture(&self.page)
            .ok_or_else(|| WidgetError::AnchorMissing(ARTICLE_CONTAINER_ID.to_string()))
            .and_then(ArticleContext::into_request);

        let request = match request {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Not sending summary request");
                self.fail();
                return Err(e);
            }
        };

        self.page.set_summary_html(LOADING_HTML);

        match self.api.request_summary(&request).await {
            Ok(summary) => {
                self.page.set_summary_text(&summary);
                self.set_state(WidgetState::Populated);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Summary request failed");
                self.fail();
                Err(e)
            }
        }
    }

    fn fail(&self) {
        self.page.set_summary_text(SUMMARY_ERROR_TEXT);
        self.set_state(WidgetState::Failed);
    }

    pub async fn handle_action(&self, action: WidgetAction) {
        debug!(action = action.id(), "Card button clicked");
        match action {
            WidgetAction::Intro => self.page.set_summary_text(INTRO_TEXT),
            WidgetAction::Regenerate => {
                let _ = self.request_summary().await;
            }
            WidgetAction::Related => self.page.set_summary_text(RELATED_TEXT),
            WidgetAction::Home => self.page.navigate(HOME_HREF),
        }
    }

    pub async fn dispatch(&self, event: PageEvent) {
        match event {
            PageEvent::Ready | PageEvent::Mutated => match self.initialize().await {
                Ok(_) => {}
                Err(WidgetError::AnchorMissing(anchor)) => {
                    debug!(anchor = %anchor, "Anchor missing, widget not initialized");
                }
                Err(e) => warn!(error = %e, "Widget initialization stopped"),
            },
            PageEvent::Action(id) => match WidgetAction::from_id(&id) {
                Some(action) => self.handle_action(action).await,
                None => debug!(action = %id, "Ignoring unrecognized card action"),
            },
            PageEvent::Unload => {}
        }
    }

    /// Consumes page events until `Unload` or until the sender is dropped.
    ///
    /// Handlers run concurrently, interleaving at their network awaits the way
    /// browser callbacks do. `Unload` abandons in-flight work; a closed channel
    /// lets it finish.
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<PageEvent>) {
        let mut pending = FuturesUnordered::new();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(PageEvent::Unload) => {
                        info!(state = %self.state(), "Page unloading, dropping widget");
                        return;
                    }
                    Some(event) => pending.push(self.dispatch(event)),
                    None => break,
                },
                Some(()) = pending.next(), if !pending.is_empty() => {}
            }
        }

        while pending.next().await.is_some() {}
    }
}
