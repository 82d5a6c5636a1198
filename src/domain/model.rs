use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 網站目錄中的一筆內容 (service、resource、freebie 或 page)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, alias = "readTime", skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    /// 同一區塊內手動指定的相關 id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<String>>,
    /// 手動指定的服務 id；只要有設定就不再用相似度排序
    #[serde(
        default,
        alias = "relatedServices",
        skip_serializing_if = "Option::is_none"
    )]
    pub related_services: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl ContentRecord {
    pub fn new(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            url: url.to_string(),
            tags: Vec::new(),
            category: None,
            price: None,
            read_time: None,
            related: None,
            related_services: None,
            order: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_price(mut self, price: &str) -> Self {
        self.price = Some(price.to_string());
        self
    }

    pub fn with_read_time(mut self, read_time: &str) -> Self {
        self.read_time = Some(read_time.to_string());
        self
    }

    pub fn with_related(mut self, ids: &[&str]) -> Self {
        self.related = Some(ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn with_related_services(mut self, ids: &[&str]) -> Self {
        self.related_services = Some(ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Services,
    Resources,
    Freebies,
    Pages,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Services,
        Section::Resources,
        Section::Freebies,
        Section::Pages,
    ];

    /// 參與相關度排序的區塊
    pub const CONTENT: [Section; 3] = [Section::Services, Section::Resources, Section::Freebies];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Services => "services",
            Section::Resources => "resources",
            Section::Freebies => "freebies",
            Section::Pages => "pages",
        }
    }

    /// 區塊內單筆紀錄的單數名稱 ("service"、"resource" 等)
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Services => "service",
            Section::Resources => "resource",
            Section::Freebies => "freebie",
            Section::Pages => "page",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    pub fn is_content(&self) -> bool {
        !matches!(self, Section::Pages)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 相關內容查詢要從哪些區塊取候選
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Services,
    Resources,
    Freebies,
}

impl Scope {
    pub fn sections(&self) -> &'static [Section] {
        match self {
            Scope::All => &Section::CONTENT,
            Scope::Services => &[Section::Services],
            Scope::Resources => &[Section::Resources],
            Scope::Freebies => &[Section::Freebies],
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Scope::All),
            "services" => Ok(Scope::Services),
            "resources" => Ok(Scope::Resources),
            "freebies" => Ok(Scope::Freebies),
            other => Err(format!(
                "unknown scope '{}', expected all, services, resources or freebies",
                other
            )),
        }
    }
}

/// 目前頁面的 metadata，每次渲染重新計算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub id: String,
    pub section: String,
    pub path: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub series: Option<String>,
    pub title: String,
}

/// 目錄紀錄與其對目前頁面的相關度
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<'a> {
    pub record: &'a ContentRecord,
    pub section: Section,
    pub score: f64,
}

impl Ranked<'_> {
    pub fn kind(&self) -> &'static str {
        self.section.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrevNext<'a> {
    pub prev: Option<&'a ContentRecord>,
    pub next: Option<&'a ContentRecord>,
    pub section: Option<Section>,
}

impl PrevNext<'_> {
    pub fn is_empty(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
    pub is_home: bool,
    pub is_last: bool,
    /// 去掉副檔名的路徑片段；首頁為空字串
    pub raw: String,
}

/// 已儲存的 cookie 同意選擇
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub accepted: bool,
    pub timestamp: String,
    pub version: String,
}
