use crate::core::catalog::Catalog;
use crate::core::navigator::{self, NavStrategy};
use crate::core::page::normalize_path;
use crate::core::similarity;
use crate::domain::model::{ContentRecord, PageMeta, PrevNext, Ranked, Scope, Section};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub max_related_posts: usize,
    pub max_related_services: usize,
    pub enable_nav: bool,
    pub enable_services: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_related_posts: 3,
            max_related_services: 2,
            enable_nav: true,
            enable_services: true,
        }
    }
}

/// 挑選交叉連結服務的方式，依序嘗試
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStrategy {
    /// 頁面自己手動指定的 `related_services`
    ExplicitCuration,
    /// 與所有服務比對標籤相似度
    TagSimilarity,
}

impl ServiceStrategy {
    pub const ORDER: [ServiceStrategy; 2] =
        [ServiceStrategy::ExplicitCuration, ServiceStrategy::TagSimilarity];
}

/// 以持有的目錄回答「這一頁還該連到哪裡」
#[derive(Debug, Clone, Default)]
pub struct RelevanceResolver {
    catalog: Catalog,
    settings: ResolverSettings,
}

impl RelevanceResolver {
    pub fn new(catalog: Catalog, settings: ResolverSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// 回傳目錄在 `section` 加上 `record` 後的 resolver
    pub fn with_content(self, section: Section, record: ContentRecord) -> Self {
        Self {
            catalog: self.catalog.with_content(section, record),
            settings: self.settings,
        }
    }

    pub fn with_settings(self, settings: ResolverSettings) -> Self {
        Self {
            catalog: self.catalog,
            settings,
        }
    }

    /// 依標籤相似度排序的目錄紀錄
    ///
    /// 不含目前頁面；同分保留目錄順序，全部為 0 分時仍回傳至多 `max_related_posts` 筆
    pub fn find_related_content(&self, meta: &PageMeta, scope: Scope) -> Vec<Ranked<'_>> {
        let current_path = meta.normalized_path();

        let mut ranked: Vec<Ranked<'_>> = scope
            .sections()
            .iter()
            .flat_map(|&section| {
                self.catalog
                    .section(section)
                    .iter()
                    .map(move |record| (section, record))
            })
            .filter(|(_, record)| normalize_path(&record.url) != current_path)
            .map(|(section, record)| Ranked {
                record,
                section,
                score: similarity::score(&meta.tags, &record.tags),
            })
            .collect();

        sort_by_score(&mut ranked);
        ranked.truncate(self.settings.max_related_posts);

        tracing::debug!(
            "Related content for {} ({:?}): {:?}",
            meta.path,
            scope,
            ranked.iter().map(|r| &r.record.id).collect::<Vec<_>>()
        );
        ranked
    }

    /// 目前頁面要交叉連結的服務
    pub fn find_related_services(&self, meta: &PageMeta) -> Vec<&ContentRecord> {
        ServiceStrategy::ORDER
            .iter()
            .find_map(|strategy| {
                let resolved = self.apply_service_strategy(*strategy, meta);
                if resolved.is_some() {
                    tracing::debug!("Related services for {} via {:?}", meta.id, strategy);
                }
                resolved
            })
            .unwrap_or_default()
    }

    fn apply_service_strategy(
        &self,
        strategy: ServiceStrategy,
        meta: &PageMeta,
    ) -> Option<Vec<&ContentRecord>> {
        match strategy {
            ServiceStrategy::ExplicitCuration => {
                let curated = [Section::Resources, Section::Freebies]
                    .iter()
                    .find_map(|&section| self.catalog.find_by_id(section, &meta.id))?
                    .related_services
                    .as_ref()?;
                // 一旦有明確清單就不再退回相似度排序，即使全部無法解析
                Some(self.resolve_ids(Section::Services, curated))
            }
            ServiceStrategy::TagSimilarity => {
                let mut ranked: Vec<Ranked<'_>> = self
                    .catalog
                    .section(Section::Services)
                    .iter()
                    .map(|record| Ranked {
                        record,
                        section: Section::Services,
                        score: similarity::score(&meta.tags, &record.tags),
                    })
                    .collect();
                sort_by_score(&mut ranked);
                Some(
                    ranked
                        .into_iter()
                        .take(self.settings.max_related_services)
                        .map(|r| r.record)
                        .collect(),
                )
            }
        }
    }

    /// 目前紀錄自己的 `related` 清單，在同一區塊內解析
    pub fn find_curated_related(&self, meta: &PageMeta) -> Vec<&ContentRecord> {
        let Some(section) = Section::parse(&meta.section).filter(Section::is_content) else {
            return Vec::new();
        };

        self.catalog
            .find_by_id(section, &meta.id)
            .and_then(|record| record.related.as_ref())
            .map(|ids| self.resolve_ids(section, ids))
            .unwrap_or_default()
    }

    pub fn find_prev_next(&self, meta: &PageMeta) -> PrevNext<'_> {
        navigator::find_prev_next(&self.catalog, meta, &NavStrategy::ORDER)
    }

    /// 依清單順序解析 id，找不到的直接略過
    fn resolve_ids<'a>(&'a self, section: Section, ids: &[String]) -> Vec<&'a ContentRecord> {
        ids.iter()
            .filter_map(|id| {
                let found = self.catalog.find_by_id(section, id);
                if found.is_none() {
                    tracing::debug!("Dropping unresolvable {} reference '{}'", section, id);
                }
                found
            })
            .collect()
    }
}

/// 依分數遞減；`sort_by` 為穩定排序，同分保留目錄順序
fn sort_by_score(ranked: &mut [Ranked<'_>]) {
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> RelevanceResolver {
        RelevanceResolver::new(Catalog::builtin(), ResolverSettings::default())
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a ContentRecord>) -> Vec<&'a str> {
        records.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_related_content_excludes_current_page() {
        let resolver = resolver().with_settings(ResolverSettings {
            max_related_posts: 100,
            ..ResolverSettings::default()
        });
        let meta = PageMeta::from_path("/resources/ai-guardrails.html")
            .with_tags(&["ai", "security", "ethics", "guidelines"]);

        let related = resolver.find_related_content(&meta, Scope::All);
        assert_eq!(related.len(), 11);
        assert!(related.iter().all(|r| r.record.id != "ai-guardrails"));
    }

    #[test]
    fn test_related_content_excludes_extensionless_path() {
        let meta = PageMeta::from_path("/services/system-audit/").with_tags(&["audit"]);
        let resolver = resolver();
        let related = resolver.find_related_content(&meta, Scope::Services);
        assert!(related.iter().all(|r| r.record.id != "system-audit"));
        assert_eq!(related.len(), 3);
    }

    #[test]
    fn test_related_content_sorted_and_truncated() {
        let meta = PageMeta::from_path("/resources/data-risk-checklist.html")
            .with_tags(&["security", "data", "privacy", "compliance"]);

        let resolver = resolver();

        let related = resolver.find_related_content(&meta, Scope::All);
        assert_eq!(related.len(), 3);
        assert_eq!(related[0].record.id, "data-security-guide");
        assert_eq!(related[0].score, 3.0 / 5.0);
        assert!(related.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(related[0].kind(), "resource");
    }

    #[test]
    fn test_related_content_all_zero_keeps_catalog_order() {
        let meta = PageMeta::from_path("/demos/");
        let resolver = resolver();
        let related = resolver.find_related_content(&meta, Scope::All);
        assert_eq!(
            ids(related.iter().map(|r| r.record)),
            vec!["clickup-business-hub", "system-audit", "clickup-setup"]
        );
        assert!(related.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_related_content_ties_keep_catalog_order() {
        // 只有 "ai" 時，四個標籤的紀錄得 1/4，六個標籤的服務得 1/6
        let meta = PageMeta::from_path("/").with_tags(&["ai"]);
        let resolver = resolver().with_settings(ResolverSettings {
            max_related_posts: 10,
            ..ResolverSettings::default()
        });
        let related = resolver.find_related_content(&meta, Scope::All);
        assert_eq!(
            ids(related.iter().take(5).map(|r| r.record)),
            vec![
                "ai-guardrails",
                "pinchy-pact",
                "ai-readiness-checklist",
                "clickup-business-hub",
                "ai-workflow-design"
            ]
        );
    }

    #[test]
    fn test_related_services_explicit_curation_wins() {
        let meta = PageMeta::from_path("/resources/data-risk-checklist.html")
            .with_tags(&["clickup", "crm", "workflow"]);
        let resolver = resolver();
        let services = resolver.find_related_services(&meta);
        assert_eq!(ids(services), vec!["system-audit"]);
    }

    #[test]
    fn test_related_services_explicit_list_not_truncated() {
        let catalog = Catalog::builtin().with_content(
            Section::Freebies,
            ContentRecord::new("bundle", "Bundle", "/freebies/bundle.html").with_related_services(
                &["system-audit", "clickup-setup", "ai-workflow-design"],
            ),
        );
        let resolver = RelevanceResolver::new(catalog, ResolverSettings::default());
        let services = resolver.find_related_services(&PageMeta::from_path("/freebies/bundle.html"));
        assert_eq!(
            ids(services),
            vec!["system-audit", "clickup-setup", "ai-workflow-design"]
        );
    }

    #[test]
    fn test_related_services_explicit_but_unresolvable_yields_nothing() {
        let catalog = Catalog::builtin().with_content(
            Section::Resources,
            ContentRecord::new("orphan", "Orphan", "/resources/orphan.html")
                .with_tags(&["ai", "automation", "workflow"])
                .with_related_services(&["retired-service"]),
        );
        let resolver = RelevanceResolver::new(catalog, ResolverSettings::default());
        let meta = PageMeta::from_path("/resources/orphan.html")
            .with_tags(&["ai", "automation", "workflow"]);
        assert!(resolver.find_related_services(&meta).is_empty());
    }

    #[test]
    fn test_related_services_falls_back_to_similarity() {
        let meta = PageMeta::from_path("/demos/clickup.html").with_tags(&["clickup", "setup", "crm"]);
        let resolver = resolver();
        let services = resolver.find_related_services(&meta);
        assert_eq!(ids(services), vec!["clickup-setup", "clickup-business-hub"]);
    }

    #[test]
    fn test_related_services_service_page_uses_similarity() {
        // 服務紀錄只有 `related`，沒有 `related_services`
        let meta = PageMeta::from_path("/services/system-audit.html").with_tags(&["audit"]);
        let resolver = resolver();
        let services = resolver.find_related_services(&meta);
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].id, "system-audit");
    }

    #[test]
    fn test_curated_related_drops_unknown_ids() {
        let catalog = Catalog::builtin().with_content(
            Section::Services,
            ContentRecord::new("new-service", "New", "/services/new-service.html")
                .with_related(&["missing", "clickup-setup"]),
        );
        let resolver = RelevanceResolver::new(catalog, ResolverSettings::default());

        let related =
            resolver.find_curated_related(&PageMeta::from_path("/services/new-service.html"));
        assert_eq!(ids(related), vec!["clickup-setup"]);

        let related = resolver
            .find_curated_related(&PageMeta::from_path("/services/clickup-business-hub.html"));
        assert_eq!(
            ids(related),
            vec!["clickup-setup", "system-audit", "ai-workflow-design"]
        );

        assert!(resolver.find_curated_related(&PageMeta::from_path("/")).is_empty());
    }

    #[test]
    fn test_appended_content_is_visible() {
        let meta = PageMeta::from_path("/resources/ai-guardrails.html").with_tags(&["quantum"]);
        let record = ContentRecord::new("quantum-primer", "Quantum Primer", "/resources/quantum-primer.html")
            .with_tags(&["quantum"]);

        let resolver = resolver().with_content(Section::Resources, record);
        let related = resolver.find_related_content(&meta, Scope::Resources);
        assert_eq!(related[0].record.id, "quantum-primer");
        assert_eq!(related[0].score, 1.0);
    }
}
