use crate::domain::ports::PageContext;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

// 屬性值的結尾引號必須與開頭相同，內容才可以包含另一種引號
static META_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta\s+[^>]*?name\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*?content\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>"#,
    )
    .expect("meta tag pattern is valid")
});

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity pattern is valid")
});

/// 解碼 HTML 字元實體 (具名的常見實體與數字實體)，無法辨識者保留原樣
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = match &caps[1] {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                entity => entity.strip_prefix('#').and_then(|number| {
                    let code = match number.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                        None => number.parse().ok()?,
                    };
                    char::from_u32(code)
                }),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn quoted<'h>(caps: &Captures<'h>, double: usize, single: usize) -> &'h str {
    caps.get(double)
        .or_else(|| caps.get(single))
        .map_or("", |m| m.as_str())
}

/// 直接提供數值的頁面上下文 (CLI 參數、測試)
#[derive(Debug, Clone, Default)]
pub struct StaticPageContext {
    path: String,
    meta: HashMap<String, String>,
    title: String,
}

impl StaticPageContext {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn with_meta(mut self, name: &str, content: &str) -> Self {
        self.meta.insert(name.to_string(), content.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

impl PageContext for StaticPageContext {
    fn path(&self) -> &str {
        &self.path
    }

    fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    fn document_title(&self) -> &str {
        &self.title
    }
}

/// 從已渲染 HTML 的 `<meta>` 與 `<title>` 讀取的頁面上下文
///
/// 只辨識 `name="..." content="..."` 的屬性順序；屬性值與標題會解碼字元實體。
#[derive(Debug, Clone)]
pub struct HtmlPageContext {
    inner: StaticPageContext,
}

impl HtmlPageContext {
    pub fn parse(path: &str, html: &str) -> Self {
        let mut inner = StaticPageContext::new(path);

        for caps in META_TAG.captures_iter(html) {
            // 重複的 meta 以第一個為準
            inner
                .meta
                .entry(decode_entities(quoted(&caps, 1, 2)))
                .or_insert_with(|| decode_entities(quoted(&caps, 3, 4)));
        }

        if let Some(caps) = TITLE_TAG.captures(html) {
            inner.title = decode_entities(caps[1].trim());
        }

        tracing::debug!(
            "Parsed {} meta entries from HTML for {}",
            inner.meta.len(),
            path
        );
        Self { inner }
    }
}

impl PageContext for HtmlPageContext {
    fn path(&self) -> &str {
        self.inner.path()
    }

    fn meta(&self, name: &str) -> Option<&str> {
        self.inner.meta(name)
    }

    fn document_title(&self) -> &str {
        self.inner.document_title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PageMeta;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>AI Guardrails Guide | Mission Control</title>
    <meta charset="utf-8">
    <meta name="page-tags" content="ai, security, ethics">
    <meta name="page-category" content="guide">
    <meta name="page-tags" content="ignored">
</head>
<body><div id="related-posts"></div></body>
</html>"#;

    #[test]
    fn test_html_context_reads_meta() {
        let context = HtmlPageContext::parse("/resources/ai-guardrails.html", PAGE);
        assert_eq!(context.meta("page-tags"), Some("ai, security, ethics"));
        assert_eq!(context.meta("page-category"), Some("guide"));
        assert_eq!(context.meta("page-series"), None);
        assert_eq!(context.document_title(), "AI Guardrails Guide | Mission Control");
    }

    #[test]
    fn test_html_context_feeds_page_meta() {
        let context = HtmlPageContext::parse("/resources/ai-guardrails.html", PAGE);
        let meta = PageMeta::from_context(&context);
        assert_eq!(meta.tags, vec!["ai", "security", "ethics"]);
        assert_eq!(meta.title, "AI Guardrails Guide");
    }

    #[test]
    fn test_html_without_meta_is_unknown_page() {
        let context = HtmlPageContext::parse("/demos/", "<html><body></body></html>");
        let meta = PageMeta::from_context(&context);
        assert!(meta.tags.is_empty());
        assert_eq!(meta.title, "");
        assert_eq!(meta.id, "demos");
    }

    #[test]
    fn test_html_entities_are_decoded() {
        let html = r#"<title>Tips &amp; Tricks &#8211; AI | Mission Control</title>
            <meta name="page-tags" content="R&amp;D, ai, &quot;quoted&quot;">"#;
        let meta = PageMeta::from_context(&HtmlPageContext::parse("/resources/tips.html", html));
        assert_eq!(meta.tags, vec!["R&D", "ai", "\"quoted\""]);
        assert_eq!(meta.title, "Tips & Tricks \u{2013} AI");
    }

    #[test]
    fn test_attribute_value_keeps_other_quote_kind() {
        let html = r#"<meta name="page-series" content="Founder's Notes">
            <meta name='page-category' content='the "ops" guide'>"#;
        let context = HtmlPageContext::parse("/resources/notes.html", html);
        assert_eq!(context.meta("page-series"), Some("Founder's Notes"));
        assert_eq!(context.meta("page-category"), Some("the \"ops\" guide"));
    }

    #[test]
    fn test_unknown_entities_left_as_is() {
        assert_eq!(decode_entities("a &bogus; b &amp;lt;"), "a &bogus; b &lt;");
        assert_eq!(decode_entities("&#x41;&#66;&#xFFFFFFFF;"), "AB&#xFFFFFFFF;");
    }
}
