use super::state::WidgetAction;
use crate::core::models::SummaryRequest;
use crate::errors::WidgetError;

/// The host page as the widget sees it.
///
/// Implementations wrap whatever DOM they run against (a browser binding, a
/// headless renderer, a test double). Methods take `&self`; DOM handles are
/// interior-mutable by nature.
pub trait HostPage: Send + Sync {
    /// Element holding the rendered article, with id
    /// [`ARTICLE_CONTAINER_ID`](super::ARTICLE_CONTAINER_ID).
    fn has_article_container(&self) -> bool;

    /// Element the card is inserted into as first child, with id
    /// [`POST_ANCHOR_ID`](super::POST_ANCHOR_ID).
    fn has_post_anchor(&self) -> bool;

    /// Whether a card element with id [`CARD_ELEMENT_ID`](super::CARD_ELEMENT_ID)
    /// is already in the DOM.
    fn card_exists(&self) -> bool;

    /// Create the card element under the post anchor with the given markup.
    fn insert_card(&self, html: &str);

    /// Replace the card's inner markup.
    fn set_card_html(&self, html: &str);

    /// Attach click handlers for the given actions found in the card.
    fn bind_actions(&self, actions: &[WidgetAction]);

    /// Replace the content of the card's `data-summary` element with markup.
    fn set_summary_html(&self, html: &str);

    /// Replace the content of the card's `data-summary` element with plain text.
    fn set_summary_text(&self, text: &str);

    /// Full visible text of the article container, if it still exists.
    fn article_text(&self) -> Option<String>;

    /// Canonical URL of the page.
    fn canonical_url(&self) -> String;

    /// `title` attribute of the
    /// [`LAST_UPDATED_SELECTOR`](super::LAST_UPDATED_SELECTOR) element, if present.
    fn last_updated(&self) -> Option<String>;

    fn navigate(&self, href: &str);
}

/// Snapshot of the article at the moment a summary is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleContext {
    pub article_text: String,
    pub article_url: String,
    pub last_updated: Option<String>,
}

impl ArticleContext {
    #[must_use]
    pub fn capture<P: HostPage + ?Sized>(page: &P) -> Option<Self> {
        Some(Self {
            article_text: page.article_text()?,
            article_url: page.canonical_url(),
            last_updated: page.last_updated(),
        })
    }

    /// Builds the wire request. Refuses to build one without a timestamp.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError::MetadataMissing` when `last_updated` is absent.
    pub fn into_request(self) -> Result<SummaryRequest, WidgetError> {
        let last_updated = self
            .last_updated
            .filter(|s| !s.trim().is_empty())
            .ok_or(WidgetError::MetadataMissing)?;
        Ok(SummaryRequest {
            message: self.article_text,
            last_updated,
            article_url: self.article_url,
        })
    }
}
