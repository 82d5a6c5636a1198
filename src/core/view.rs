use crate::core::resolver::RelevanceResolver;
use crate::domain::model::{ContentRecord, PageMeta, PrevNext, Ranked, Scope, Section};
use serde::Serialize;

/// 相關內容元件在單一頁面上顯示的全部資料
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    pub meta: PageMeta,
    pub related: Vec<Ranked<'a>>,
    /// 目前紀錄自己的 `related` 清單，沒有時為空
    pub curated: Vec<&'a ContentRecord>,
    pub navigation: Option<PrevNext<'a>>,
    pub services: Option<Vec<&'a ContentRecord>>,
}

impl<'a> PageView<'a> {
    /// 導覽只在啟用時產生；服務交叉連結需啟用且頁面屬於 resources 或 freebies
    pub fn assemble(resolver: &'a RelevanceResolver, meta: PageMeta) -> Self {
        let settings = resolver.settings();
        let related = resolver.find_related_content(&meta, Scope::All);
        let curated = resolver.find_curated_related(&meta);

        let navigation = settings
            .enable_nav
            .then(|| resolver.find_prev_next(&meta));

        let cross_links = matches!(
            Section::parse(&meta.section),
            Some(Section::Resources | Section::Freebies)
        );
        let services = (settings.enable_services && cross_links)
            .then(|| resolver.find_related_services(&meta));

        Self {
            meta,
            related,
            curated,
            navigation,
            services,
        }
    }
}
