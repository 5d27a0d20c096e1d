//! In-page summary card controller

pub mod controller;
pub mod page;
pub mod skeleton;
pub mod state;
pub mod transport;

pub use controller::WidgetController;
pub use page::{ArticleContext, HostPage};
pub use state::{PageEvent, WidgetAction, WidgetState};
pub use transport::{HttpSummaryApi, SummaryApi};

/// `id` of the injected card element.
pub const CARD_ELEMENT_ID: &str = "ai-article-summary";
/// `id` of the element whose text is summarized.
pub const ARTICLE_CONTAINER_ID: &str = "article-container";
/// `id` of the element the card is inserted into.
pub const POST_ANCHOR_ID: &str = "post";
/// Element whose `title` attribute holds the last-updated timestamp.
pub const LAST_UPDATED_SELECTOR: &str = ".post-meta-date-updated";

/// Shown when a summary cannot be produced.
pub const SUMMARY_ERROR_TEXT: &str = "生成摘要时发生错误，请稍后重试。";
pub const INTRO_TEXT: &str = "我是一个AI生成的摘要示例。";
pub const RELATED_TEXT: &str = "暂不支持";
pub const HOME_HREF: &str = "/";
