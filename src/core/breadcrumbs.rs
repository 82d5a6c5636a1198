use crate::core::page::{path_segments, strip_html_extension};
use crate::domain::model::Breadcrumb;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbSettings {
    pub home_url: String,
    pub home_label: String,
    pub separator: String,
    /// 建立路徑時略過的片段 (不分大小寫)
    pub exclude_paths: Vec<String>,
    pub max_segment_length: usize,
    pub max_total_segments: usize,
    /// 以路徑片段為鍵的顯示名稱，覆蓋在內建對照表之上
    pub mappings: HashMap<String, String>,
}

impl Default for BreadcrumbSettings {
    fn default() -> Self {
        Self {
            home_url: "/".to_string(),
            home_label: "🏠 Home".to_string(),
            separator: "›".to_string(),
            exclude_paths: vec!["index.html".to_string(), String::new()],
            max_segment_length: 25,
            max_total_segments: 4,
            mappings: HashMap::new(),
        }
    }
}

const BUILTIN_MAPPINGS: &[(&str, &str)] = &[
    ("services", "Services"),
    ("resources", "Resources"),
    ("freebies", "Free Tools"),
    ("demos", "Live Demos"),
    ("admin", "Admin"),
    ("how-we-work", "How We Work"),
    ("privacy", "Privacy Policy"),
    ("clickup-business-hub", "Business Hub"),
    ("system-audit", "System Audit"),
    ("clickup-setup", "ClickUp Setup"),
    ("ai-workflow-design", "AI Workflows"),
    ("ai-guardrails", "AI Guardrails"),
    ("data-risk-checklist", "Data Risk Checklist"),
    ("data-security-guide", "Security Guide"),
    ("pinchy-pact", "Pinchy Pact"),
    ("recommended-solutions", "Recommended Tools"),
    ("commission-tracker", "Commission Tracker"),
    ("subscription-audit", "Subscription Audit"),
    ("ai-readiness-checklist", "AI Readiness"),
];

/// 路徑在網站中的位置，給只需要區塊資訊的元件使用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContextSummary {
    pub page: String,
    pub section: Option<String>,
    pub segments: Vec<String>,
    pub is_service_page: bool,
    pub is_resource_page: bool,
    pub is_freebie_page: bool,
}

#[derive(Debug, Clone)]
pub struct BreadcrumbBuilder {
    settings: BreadcrumbSettings,
    mappings: HashMap<String, String>,
}

impl Default for BreadcrumbBuilder {
    fn default() -> Self {
        Self::new(BreadcrumbSettings::default())
    }
}

impl BreadcrumbBuilder {
    pub fn new(settings: BreadcrumbSettings) -> Self {
        let mut mappings: HashMap<String, String> = BUILTIN_MAPPINGS
            .iter()
            .map(|(segment, label)| (segment.to_string(), label.to_string()))
            .collect();
        mappings.extend(settings.mappings.clone());
        Self { settings, mappings }
    }

    pub fn settings(&self) -> &BreadcrumbSettings {
        &self.settings
    }

    pub fn add_mapping(&mut self, segment: &str, label: &str) {
        self.mappings.insert(segment.to_string(), label.to_string());
    }

    /// 路徑片段的顯示名稱
    pub fn format_segment(&self, segment: &str) -> String {
        if let Some(label) = self.mappings.get(segment) {
            return label.clone();
        }

        strip_html_extension(segment)
            .replace(['-', '_'], " ")
            .split(' ')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn truncate(&self, label: &str) -> String {
        let max = self.settings.max_segment_length;
        if label.chars().count() <= max {
            return label.to_string();
        }
        let kept: String = label.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }

    fn kept_segments<'p>(&self, path: &'p str) -> Vec<&'p str> {
        path_segments(path)
            .into_iter()
            .filter(|segment| {
                let lower = segment.to_lowercase();
                !self
                    .settings
                    .exclude_paths
                    .iter()
                    .any(|excluded| excluded.to_lowercase() == lower)
            })
            .collect()
    }

    /// `path` 的完整路徑，第一個為首頁
    pub fn build(&self, path: &str) -> Vec<Breadcrumb> {
        let segments = self.kept_segments(path);
        let mut crumbs = Vec::with_capacity(segments.len() + 1);

        crumbs.push(Breadcrumb {
            label: self.settings.home_label.clone(),
            url: self.settings.home_url.clone(),
            is_home: true,
            is_last: segments.is_empty(),
            raw: String::new(),
        });

        let mut accumulated = String::new();
        for (index, segment) in segments.iter().enumerate() {
            accumulated.push('/');
            accumulated.push_str(segment);

            let clean = strip_html_extension(segment);
            crumbs.push(Breadcrumb {
                label: self.truncate(&self.format_segment(clean)),
                url: accumulated.clone(),
                is_home: false,
                is_last: index == segments.len() - 1,
                raw: clean.to_string(),
            });
        }

        crumbs
    }

    /// 實際顯示的路徑：超過 `max_total_segments` 時只保留首頁、上一層與目前頁面
    pub fn display_trail(&self, path: &str) -> Vec<Breadcrumb> {
        let mut crumbs = self.build(path);
        if crumbs.len() > self.settings.max_total_segments && crumbs.len() >= 3 {
            let last = crumbs.len() - 1;
            let parent = crumbs.swap_remove(last - 1);
            let current = crumbs.pop();
            crumbs.truncate(1);
            crumbs.push(parent);
            crumbs.extend(current);
        }
        crumbs
    }

    /// 純文字輸出，例如 `🏠 Home › Resources › AI Guardrails`
    pub fn render_text(&self, path: &str) -> String {
        let separator = format!(" {} ", self.settings.separator);
        self.display_trail(path)
            .iter()
            .map(|crumb| crumb.label.as_str())
            .collect::<Vec<_>>()
            .join(&separator)
    }

    pub fn current_context(&self, path: &str) -> PageContextSummary {
        let segments = self.kept_segments(path);
        let page = segments
            .last()
            .map(|last| strip_html_extension(last).to_string())
            .unwrap_or_else(|| "home".to_string());
        let section = segments.first().map(|s| s.to_string());
        let in_section = |name: &str| section.as_deref() == Some(name);

        PageContextSummary {
            is_service_page: in_section("services"),
            is_resource_page: in_section("resources"),
            is_freebie_page: in_section("freebies"),
            page,
            section,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}
