pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SiteConfig;

pub use adapters::page_context::{HtmlPageContext, StaticPageContext};
pub use adapters::storage::{CookieJar, FallbackStore, FileStore, MemoryStore};
pub use crate::core::{
    breadcrumbs::BreadcrumbBuilder, catalog::Catalog, consent::ConsentManager,
    resolver::RelevanceResolver, resolver::ResolverSettings, view::PageView,
};
pub use domain::model::{ContentRecord, PageMeta, Scope, Section};
pub use utils::error::{Result, SiteError};
