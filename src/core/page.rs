use crate::domain::model::PageMeta;
use crate::domain::ports::PageContext;

pub const TAGS_META: &str = "page-tags";
pub const CATEGORY_META: &str = "page-category";
pub const SERIES_META: &str = "page-series";

const HOME: &str = "home";

/// 移除結尾的 `.htm`/`.html` (不分大小寫)
pub fn strip_html_extension(segment: &str) -> &str {
    let lower = segment.to_ascii_lowercase();
    if lower.ends_with(".html") {
        &segment[..segment.len() - 5]
    } else if lower.ends_with(".htm") {
        &segment[..segment.len() - 4]
    } else {
        segment
    }
}

/// 判斷「是否為目前頁面」用的路徑：先去副檔名，再去掉一個結尾斜線
pub fn normalize_path(path: &str) -> &str {
    let stripped = strip_html_extension(path);
    stripped.strip_suffix('/').unwrap_or(stripped)
}

pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// 逗號分隔的標籤；逐一 trim，空白項目捨棄
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl PageMeta {
    /// 只由 URL 路徑推得的 metadata：沒有標籤與標註的「未知」頁面
    pub fn from_path(path: &str) -> Self {
        let segments = path_segments(path);
        let section = segments.first().copied().unwrap_or(HOME).to_string();
        let id = segments
            .last()
            .map(|last| strip_html_extension(last))
            .filter(|id| !id.is_empty())
            .unwrap_or(HOME)
            .to_string();

        Self {
            id,
            section,
            path: path.to_string(),
            tags: Vec::new(),
            category: None,
            series: None,
            title: String::new(),
        }
    }

    pub fn from_context<C: PageContext + ?Sized>(context: &C) -> Self {
        let mut meta = Self::from_path(context.path());
        meta.tags = context.meta(TAGS_META).map(parse_tags).unwrap_or_default();
        meta.category = context.meta(CATEGORY_META).map(str::to_string);
        meta.series = context.meta(SERIES_META).map(str::to_string);
        meta.title = context
            .document_title()
            .split('|')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        tracing::debug!(
            "Page meta: id={} section={} tags={:?}",
            meta.id,
            meta.section,
            meta.tags
        );
        meta
    }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn normalized_path(&self) -> &str {
        normalize_path(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::page_context::StaticPageContext;

    #[test]
    fn test_from_path_resource_page() {
        let meta = PageMeta::from_path("/resources/ai-guardrails.html");
        assert_eq!(meta.id, "ai-guardrails");
        assert_eq!(meta.section, "resources");
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn test_from_path_root() {
        let meta = PageMeta::from_path("/");
        assert_eq!(meta.id, "home");
        assert_eq!(meta.section, "home");
    }

    #[test]
    fn test_from_path_uppercase_extension() {
        let meta = PageMeta::from_path("/how-we-work.HTM");
        assert_eq!(meta.id, "how-we-work");
        assert_eq!(meta.section, "how-we-work.HTM");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/services/system-audit.html"), "/services/system-audit");
        assert_eq!(normalize_path("/services/"), "/services");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("/demos/index.Html"), "/demos/index");
    }

    #[test]
    fn test_parse_tags_trims_and_drops_blanks() {
        assert_eq!(parse_tags("clickup, automation ,workflow"), vec!["clickup", "automation", "workflow"]);
        assert!(parse_tags("").is_empty());
        assert_eq!(parse_tags("ai,,crm"), vec!["ai", "crm"]);
    }

    #[test]
    fn test_from_context_reads_meta_and_title() {
        let context = StaticPageContext::new("/freebies/commission-tracker.html")
            .with_meta(TAGS_META, "commission, finance")
            .with_meta(CATEGORY_META, "template")
            .with_title("Commission Tracker | Mission Control");

        let meta = PageMeta::from_context(&context);
        assert_eq!(meta.id, "commission-tracker");
        assert_eq!(meta.tags, vec!["commission", "finance"]);
        assert_eq!(meta.category.as_deref(), Some("template"));
        assert_eq!(meta.series, None);
        assert_eq!(meta.title, "Commission Tracker");
    }
}
