/// Default persona instruction sent as the system message. It caps the summary
/// at 100 characters.
pub const DEFAULT_SYSTEM_CONTENT: &str = "你是一个博客总结助手，用于自动生成博客的读者感兴趣的文章摘要，摘要只介绍最关键内容，不超100字。";

/// Maximum length allowed for an operator-supplied system instruction
pub const MAX_SYSTEM_CONTENT_LENGTH: usize = 2000;

/// Validates a replacement system instruction submitted through the admin API.
/// Returns the trimmed instruction or a message suitable for the operator.
pub fn sanitize_system_content(content: &str) -> Result<String, String> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err("System content must not be empty".to_string());
    }

    if trimmed.chars().count() > MAX_SYSTEM_CONTENT_LENGTH {
        return Err(format!(
            "System content exceeds maximum length of {} characters",
            MAX_SYSTEM_CONTENT_LENGTH
        ));
    }

    // Newlines are fine in a persona; other control characters are not.
    if trimmed.chars().any(|c| c.is_control() && c != '\n' && c != '\t') {
        return Err("System content contains control characters".to_string());
    }

    Ok(trimmed.to_string())
}
