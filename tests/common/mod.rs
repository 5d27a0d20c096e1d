#![allow(dead_code)]

use ai_summary::core::models::SummaryRequest;
use ai_summary::errors::WidgetError;
use ai_summary::widget::{HostPage, SummaryApi, WidgetAction};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const CARD_TEMPLATE: &str = r#"<div class="card-header">
  <button data-action="regenerate">↻</button>
</div>
<div class="summary" data-summary></div>
<button data-action="intro">介绍自己</button>
<button data-action="related">推荐相关文章</button>
<button data-action="home">前往主页</button>
<button data-action="share">分享</button>"#;

// ============================================================================
// Host page double
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct PageDom {
    pub has_article: bool,
    pub has_post: bool,
    pub article_text: String,
    pub url: String,
    pub last_updated: Option<String>,
    /// Every card element ever inserted, with its current markup.
    pub cards: Vec<String>,
    /// Every value written to the summary region, in order.
    pub summary_history: Vec<String>,
    pub bound: Vec<WidgetAction>,
    pub navigations: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakePage {
    pub dom: Mutex<PageDom>,
}

impl FakePage {
    pub fn blog_post() -> Self {
        Self {
            dom: Mutex::new(PageDom {
                has_article: true,
                has_post: true,
                article_text: "今天我们讨论 Rust 的所有权模型。".to_string(),
                url: "https://blog.example/archives/ownership/".to_string(),
                last_updated: Some("2024-05-01 10:00:00".to_string()),
                ..PageDom::default()
            }),
        }
    }

    pub fn without_article(self) -> Self {
        self.dom.lock().unwrap().has_article = false;
        self
    }

    pub fn without_post(self) -> Self {
        self.dom.lock().unwrap().has_post = false;
        self
    }

    pub fn without_last_updated(self) -> Self {
        self.dom.lock().unwrap().last_updated = None;
        self
    }

    pub fn snapshot(&self) -> PageDom {
        self.dom.lock().unwrap().clone()
    }

    pub fn set_article_text(&self, text: &str) {
        self.dom.lock().unwrap().article_text = text.to_string();
    }

    pub fn summary(&self) -> Option<String> {
        self.dom.lock().unwrap().summary_history.last().cloned()
    }
}

impl HostPage for FakePage {
    fn has_article_container(&self) -> bool {
        self.dom.lock().unwrap().has_article
    }

    fn has_post_anchor(&self) -> bool {
        self.dom.lock().unwrap().has_post
    }

    fn card_exists(&self) -> bool {
        !self.dom.lock().unwrap().cards.is_empty()
    }

    fn insert_card(&self, html: &str) {
        self.dom.lock().unwrap().cards.push(html.to_string());
    }

    fn set_card_html(&self, html: &str) {
        if let Some(card) = self.dom.lock().unwrap().cards.last_mut() {
            *card = html.to_string();
        }
    }

    fn bind_actions(&self, actions: &[WidgetAction]) {
        self.dom.lock().unwrap().bound = actions.to_vec();
    }

    fn set_summary_html(&self, html: &str) {
        self.dom.lock().unwrap().summary_history.push(html.to_string());
    }

    fn set_summary_text(&self, text: &str) {
        self.dom.lock().unwrap().summary_history.push(text.to_string());
    }

    fn article_text(&self) -> Option<String> {
        let dom = self.dom.lock().unwrap();
        dom.has_article.then(|| dom.article_text.clone())
    }

    fn canonical_url(&self) -> String {
        self.dom.lock().unwrap().url.clone()
    }

    fn last_updated(&self) -> Option<String> {
        self.dom.lock().unwrap().last_updated.clone()
    }

    fn navigate(&self, href: &str) {
        self.dom.lock().unwrap().navigations.push(href.to_string());
    }
}

// ============================================================================
// Network double
// ============================================================================

pub struct FakeApi {
    template: Result<String, WidgetError>,
    summaries: Mutex<VecDeque<Result<String, WidgetError>>>,
    pub template_calls: AtomicUsize,
    pub summary_calls: AtomicUsize,
    pub requests: Mutex<Vec<SummaryRequest>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            template: Ok(CARD_TEMPLATE.to_string()),
            summaries: Mutex::new(VecDeque::new()),
            template_calls: AtomicUsize::new(0),
            summary_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_template() -> Self {
        Self {
            template: Err(WidgetError::TemplateFetchFailed("connection refused".to_string())),
            ..Self::new()
        }
    }

    /// Queues summary outcomes; once drained every call succeeds with "默认摘要".
    pub fn with_summaries(self, outcomes: Vec<Result<String, WidgetError>>) -> Self {
        *self.summaries.lock().unwrap() = outcomes.into();
        self
    }

    pub fn template_calls(&self) -> usize {
        self.template_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummaryApi for FakeApi {
    async fn fetch_template(&self) -> Result<String, WidgetError> {
        self.template_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.template.clone()
    }

    async fn request_summary(&self, request: &SummaryRequest) -> Result<String, WidgetError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        self.summaries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("默认摘要".to_string()))
    }
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// Serves `app` on an ephemeral localhost port.
pub async fn spawn(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
