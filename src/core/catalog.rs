use crate::domain::model::{ContentRecord, Section};
use crate::utils::error::{Result, SiteError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 依區塊分組、保留順序的網站內容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    services: Vec<ContentRecord>,
    #[serde(default)]
    resources: Vec<ContentRecord>,
    #[serde(default)]
    freebies: Vec<ContentRecord>,
    #[serde(default)]
    pages: Vec<ContentRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("Loading catalog from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析目錄
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut catalog: Catalog = toml::from_str(content).map_err(|e| SiteError::CatalogError {
            message: format!("TOML parsing error: {}", e),
        })?;

        // pages 依 order 排序，未設定者保持原位於最後
        catalog
            .pages
            .sort_by_key(|page| page.order.unwrap_or(u32::MAX));

        tracing::debug!(
            "Catalog loaded: {} services, {} resources, {} freebies, {} pages",
            catalog.services.len(),
            catalog.resources.len(),
            catalog.freebies.len(),
            catalog.pages.len()
        );
        Ok(catalog)
    }

    /// 區塊內依目錄順序的紀錄
    pub fn section(&self, section: Section) -> &[ContentRecord] {
        match section {
            Section::Services => &self.services,
            Section::Resources => &self.resources,
            Section::Freebies => &self.freebies,
            Section::Pages => &self.pages,
        }
    }

    /// 以區塊名稱查詢，未知名稱回傳空 slice
    pub fn section_named(&self, name: &str) -> &[ContentRecord] {
        Section::parse(name)
            .map(|section| self.section(section))
            .unwrap_or(&[])
    }

    pub fn find_by_id(&self, section: Section, id: &str) -> Option<&ContentRecord> {
        self.section(section).iter().find(|record| record.id == id)
    }

    /// 查詢服務，供麵包屑交叉連結使用
    pub fn service_info(&self, slug: &str) -> Option<&ContentRecord> {
        self.find_by_id(Section::Services, slug)
    }

    /// 回傳在 `section` 末端加上 `record` 的新目錄；順序與 id 唯一性由呼叫端負責
    pub fn with_content(mut self, section: Section, record: ContentRecord) -> Self {
        tracing::debug!("Appending '{}' to {}", record.id, section);
        self.section_mut(section).push(record);
        self
    }

    pub fn len(&self) -> usize {
        Section::ALL.iter().map(|s| self.section(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<ContentRecord> {
        match section {
            Section::Services => &mut self.services,
            Section::Resources => &mut self.resources,
            Section::Freebies => &mut self.freebies,
            Section::Pages => &mut self.pages,
        }
    }

    /// 網站內建內容
    pub fn builtin() -> Self {
        let services = vec![
            ContentRecord::new(
                "clickup-business-hub",
                "ClickUp Business Hub",
                "/services/clickup-business-hub.html",
            )
            .with_description("Complete business operating system with AI-powered workflows for luxury travel advisors.")
            .with_tags(&["clickup", "crm", "workflow", "automation", "ai", "business-system"])
            .with_category("premium")
            .with_price("$1,297+")
            .with_related(&["clickup-setup", "system-audit", "ai-workflow-design"]),
            ContentRecord::new("system-audit", "System Audit", "/services/system-audit.html")
                .with_description("Comprehensive analysis of your current tools, workflows, and opportunities for AI integration.")
                .with_tags(&["audit", "analysis", "optimization", "review"])
                .with_category("diagnostic")
                .with_price("$497")
                .with_related(&["clickup-business-hub", "clickup-setup"]),
            ContentRecord::new("clickup-setup", "ClickUp Setup", "/services/clickup-setup.html")
                .with_description("Professional ClickUp workspace configuration tailored to your travel business.")
                .with_tags(&["clickup", "setup", "configuration", "crm"])
                .with_category("implementation")
                .with_price("$797")
                .with_related(&["clickup-business-hub", "system-audit"]),
            ContentRecord::new(
                "ai-workflow-design",
                "AI Workflow Design",
                "/services/ai-workflow-design.html",
            )
            .with_description("Custom AI-powered automation workflows that integrate with your existing systems.")
            .with_tags(&["ai", "automation", "workflow", "n8n", "make", "zapier"])
            .with_category("automation")
            .with_price("$997")
            .with_related(&["clickup-business-hub", "system-audit"]),
        ];

        let resources = vec![
            ContentRecord::new("ai-guardrails", "AI Guardrails Guide", "/resources/ai-guardrails.html")
                .with_description("Essential frameworks for implementing AI safely in your travel business.")
                .with_tags(&["ai", "security", "ethics", "guidelines"])
                .with_category("guide")
                .with_read_time("8 min")
                .with_related_services(&["ai-workflow-design", "clickup-business-hub"]),
            ContentRecord::new(
                "data-risk-checklist",
                "Data Risk Checklist",
                "/resources/data-risk-checklist.html",
            )
            .with_description("Protect your client data with this comprehensive security checklist.")
            .with_tags(&["security", "data", "privacy", "compliance"])
            .with_category("checklist")
            .with_read_time("5 min")
            .with_related_services(&["system-audit"]),
            ContentRecord::new(
                "data-security-guide",
                "Data Security Guide",
                "/resources/data-security-guide.html",
            )
            .with_description("Best practices for securing sensitive travel client information.")
            .with_tags(&["security", "data", "privacy", "best-practices"])
            .with_category("guide")
            .with_read_time("12 min")
            .with_related_services(&["system-audit", "clickup-business-hub"]),
            ContentRecord::new(
                "recommended-solutions",
                "Recommended Tools",
                "/resources/recommended-solutions.html",
            )
            .with_description("Curated tech stack recommendations for luxury travel advisors.")
            .with_tags(&["tools", "software", "recommendations", "stack"])
            .with_category("resource")
            .with_read_time("6 min")
            .with_related_services(&["system-audit", "clickup-setup"]),
            ContentRecord::new("pinchy-pact", "The Pinchy Pact", "/resources/pinchy-pact.html")
                .with_description("Our ethical commitment to responsible AI implementation.")
                .with_tags(&["ethics", "ai", "commitment", "values"])
                .with_category("manifesto")
                .with_read_time("4 min")
                .with_related_services(&["ai-workflow-design"]),
        ];

        let freebies = vec![
            ContentRecord::new(
                "commission-tracker",
                "Commission Tracker",
                "/freebies/commission-tracker.html",
            )
            .with_description("Free spreadsheet template to track your travel commissions.")
            .with_tags(&["commission", "finance", "tracking", "template"])
            .with_category("template")
            .with_related_services(&["clickup-business-hub"]),
            ContentRecord::new(
                "subscription-audit",
                "Subscription Audit",
                "/freebies/subscription-audit.html",
            )
            .with_description("Audit your monthly software subscriptions and find savings.")
            .with_tags(&["audit", "expenses", "subscriptions", "savings"])
            .with_category("worksheet")
            .with_related_services(&["system-audit"]),
            ContentRecord::new(
                "ai-readiness-checklist",
                "AI Readiness Checklist",
                "/freebies/ai-readiness-checklist.html",
            )
            .with_description("Assess if your business is ready for AI implementation.")
            .with_tags(&["ai", "readiness", "assessment", "checklist"])
            .with_category("checklist")
            .with_related_services(&["ai-workflow-design", "system-audit"]),
        ];

        let pages = vec![
            ContentRecord::new("home", "Home", "/").with_order(0),
            ContentRecord::new("how-we-work", "How We Work", "/how-we-work.html").with_order(1),
            ContentRecord::new("services", "Services", "/services/").with_order(2),
            ContentRecord::new("resources", "Resources", "/resources/").with_order(3),
            ContentRecord::new("freebies", "Free Tools", "/freebies/").with_order(4),
            ContentRecord::new("demos", "Demos", "/demos/").with_order(5),
        ];

        Self {
            services,
            resources,
            freebies,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.section(Section::Services).len(), 4);
        assert_eq!(catalog.section(Section::Resources).len(), 5);
        assert_eq!(catalog.section(Section::Freebies).len(), 3);
        assert_eq!(catalog.section(Section::Pages).len(), 6);
        assert_eq!(catalog.len(), 18);
    }

    #[test]
    fn test_unknown_section_is_empty() {
        let catalog = Catalog::builtin();
        assert!(catalog.section_named("blog").is_empty());
        assert_eq!(catalog.section_named("freebies").len(), 3);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::builtin();
        let audit = catalog.find_by_id(Section::Services, "system-audit").unwrap();
        assert_eq!(audit.price.as_deref(), Some("$497"));
        assert!(catalog.find_by_id(Section::Resources, "system-audit").is_none());
        assert_eq!(
            catalog.service_info("clickup-setup").map(|s| s.title.as_str()),
            Some("ClickUp Setup")
        );
    }

    #[test]
    fn test_with_content_appends_without_uniqueness_check() {
        let record = ContentRecord::new("system-audit", "Duplicate", "/services/dup.html");
        let catalog = Catalog::builtin().with_content(Section::Services, record);
        let services = catalog.section(Section::Services);
        assert_eq!(services.len(), 5);
        assert_eq!(services[4].title, "Duplicate");
        // 查詢時仍以第一筆為準
        assert_eq!(
            catalog.find_by_id(Section::Services, "system-audit").unwrap().title,
            "System Audit"
        );
    }

    #[test]
    fn test_from_toml_sorts_pages_by_order() {
        let toml_content = r#"
[[services]]
id = "system-audit"
title = "System Audit"
url = "/services/system-audit.html"
tags = ["audit", "review"]

[[resources]]
id = "ai-guardrails"
title = "AI Guardrails Guide"
url = "/resources/ai-guardrails.html"
tags = ["ai"]
relatedServices = ["system-audit"]

[[pages]]
id = "demos"
title = "Demos"
url = "/demos/"
order = 2

[[pages]]
id = "home"
title = "Home"
url = "/"
order = 0

[[pages]]
id = "contact"
title = "Contact"
url = "/contact.html"
"#;
        let catalog = Catalog::from_toml_str(toml_content).unwrap();
        let ids: Vec<&str> = catalog
            .section(Section::Pages)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["home", "demos", "contact"]);
        assert!(catalog.section(Section::Freebies).is_empty());
        assert_eq!(
            catalog.find_by_id(Section::Resources, "ai-guardrails").unwrap().related_services,
            Some(vec!["system-audit".to_string()])
        );
    }

    #[test]
    fn test_from_toml_rejects_missing_fields() {
        let err = Catalog::from_toml_str("[[services]]\nid = \"x\"\n").unwrap_err();
        assert!(matches!(err, SiteError::CatalogError { .. }));
    }
}
