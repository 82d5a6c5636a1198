use crate::core::catalog::Catalog;
use crate::domain::model::{ContentRecord, PageMeta, PrevNext, Section};

/// 頁面可能所屬的順序，依序嘗試
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStrategy {
    /// 在頁面所屬內容區塊內的前後項
    Section,
    /// 在全站頁面流程中的前後項
    GlobalPages,
}

impl NavStrategy {
    pub const ORDER: [NavStrategy; 2] = [NavStrategy::Section, NavStrategy::GlobalPages];
}

/// 目前頁面的上一筆與下一筆，只看順序不計分
pub fn find_prev_next<'a>(
    catalog: &'a Catalog,
    meta: &PageMeta,
    strategies: &[NavStrategy],
) -> PrevNext<'a> {
    strategies
        .iter()
        .find_map(|strategy| apply(*strategy, catalog, meta))
        .unwrap_or_default()
}

fn apply<'a>(strategy: NavStrategy, catalog: &'a Catalog, meta: &PageMeta) -> Option<PrevNext<'a>> {
    match strategy {
        NavStrategy::Section => {
            let section = Section::parse(&meta.section).filter(Section::is_content)?;
            let records = catalog.section(section);
            let index = records.iter().position(|r| r.id == meta.id)?;
            tracing::debug!("Navigation for {} within {}", meta.id, section);
            Some(neighbors(records, index, Some(section)))
        }
        NavStrategy::GlobalPages => {
            let pages = catalog.section(Section::Pages);
            let index = pages
                .iter()
                .position(|p| p.id == meta.id || p.url == meta.path)?;
            tracing::debug!("Navigation for {} within global pages", meta.id);
            Some(neighbors(pages, index, None))
        }
    }
}

fn neighbors(records: &[ContentRecord], index: usize, section: Option<Section>) -> PrevNext<'_> {
    PrevNext {
        prev: index.checked_sub(1).and_then(|i| records.get(i)),
        next: records.get(index + 1),
        section,
    }
}
