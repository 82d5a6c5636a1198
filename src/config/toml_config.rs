use crate::core::breadcrumbs::BreadcrumbSettings;
use crate::core::catalog::Catalog;
use crate::core::consent::ConsentSettings;
use crate::core::resolver::ResolverSettings;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_site_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// consent cookie 最長保存一百年
pub const MAX_CONSENT_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub related: ResolverSettings,
    pub breadcrumbs: BreadcrumbSettings,
    pub consent: ConsentSettings,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 取代內建內容的 TOML 目錄檔
    pub path: Option<String>,
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITE_CATALOG})，未設定者保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 載入目錄：有設定路徑就讀檔，否則使用內建內容
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog.path {
            Some(path) => Catalog::from_file(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("related.max_related_posts", self.related.max_related_posts, 1)?;
        validate_positive_number(
            "related.max_related_services",
            self.related.max_related_services,
            1,
        )?;

        validate_site_path("breadcrumbs.home_url", &self.breadcrumbs.home_url)?;
        // 至少要能放下 "..." 之外的一個字元
        validate_positive_number(
            "breadcrumbs.max_segment_length",
            self.breadcrumbs.max_segment_length,
            4,
        )?;
        validate_positive_number(
            "breadcrumbs.max_total_segments",
            self.breadcrumbs.max_total_segments,
            3,
        )?;

        validate_non_empty_string("consent.storage_key", &self.consent.storage_key)?;
        validate_non_empty_string("consent.version", &self.consent.version)?;
        validate_range(
            "consent.duration_days",
            self.consent.duration_days,
            1,
            MAX_CONSENT_DAYS,
        )?;
        validate_site_path("consent.privacy_policy_url", &self.consent.privacy_policy_url)?;
        validate_path("consent.store_path", &self.consent.store_path)?;

        if let Some(path) = &self.catalog.path {
            validate_path("catalog.path", path)?;
        }

        Ok(())
    }
}
