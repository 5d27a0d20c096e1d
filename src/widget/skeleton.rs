/// Placeholder markup shown while the real card template is fetched.
pub const SKELETON_HTML: &str = r#"<div class="card skeleton-theme">
    <div class="card-header">
        <div class="card-title skeleton-text">
            <div class="skeleton-icon"></div>
            <div class="skeleton-title-text"></div>
        </div>
        <div class="skeleton-button"></div>
    </div>
    <div class="card-body">
        <div class="summary">
            <div class="skeleton-line"></div>
            <div class="skeleton-line"></div>
            <div class="skeleton-line"></div>
        </div>
        <div class="button-group">
            <div class="skeleton-button"></div>
            <div class="skeleton-button"></div>
            <div class="skeleton-button"></div>
            <div class="skeleton-button"></div>
        </div>
    </div>
</div>
<style>
    @keyframes skeleton-loading {
        0% { background-position: 100% 50%; }
        100% { background-position: 0 50%; }
    }
    .skeleton-theme {
        background: linear-gradient(90deg, #f0f0f0 25%, #e0e0e0 50%, #f0f0f0 75%);
        background-size: 200% 100%;
        animation: skeleton-loading 1.5s infinite;
    }
    .skeleton-line { height: 16px; margin-bottom: 8px; background-color: #e0e0e0; border-radius: 4px; }
    .skeleton-line:last-child { width: 60%; }
    .skeleton-button { width: 80px; height: 30px; background-color: #e0e0e0; border-radius: 4px; }
    .button-group { display: grid; grid-template-columns: 1fr 1fr; gap: 8px; }
</style>"#;

/// Summary-region markup while a request is in flight.
pub const LOADING_HTML: &str = r#"<span class="loading"></span>正在生成AI摘要..."#;
