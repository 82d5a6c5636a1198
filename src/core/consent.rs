use crate::core::page::path_segments;
use crate::domain::model::ConsentRecord;
use crate::domain::ports::ConsentStore;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentSettings {
    pub storage_key: String,
    /// 備援 cookie 的到期天數
    pub duration_days: u32,
    pub privacy_policy_url: String,
    pub version: String,
    /// CLI 存放偏好檔的位置
    pub store_path: String,
}

impl Default for ConsentSettings {
    fn default() -> Self {
        Self {
            storage_key: "cookie-consent-preference".to_string(),
            duration_days: 365,
            privacy_policy_url: "/privacy.html".to_string(),
            version: "1.0".to_string(),
            store_path: ".site-widgets/consent.json".to_string(),
        }
    }
}

/// 建立在盡力而為儲存之上的 cookie 同意偏好
#[derive(Debug)]
pub struct ConsentManager<S: ConsentStore> {
    store: S,
    settings: ConsentSettings,
}

impl<S: ConsentStore> ConsentManager<S> {
    pub fn new(store: S, settings: ConsentSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ConsentSettings {
        &self.settings
    }

    /// 已儲存的選擇；沒有或讀不到時為 `None`
    pub fn status(&self) -> Option<ConsentRecord> {
        match self.store.get(&self.settings.storage_key) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Could not read consent preference: {}", e);
                None
            }
        }
    }

    pub fn has_choice(&self) -> bool {
        self.status().is_some()
    }

    pub fn should_show_banner(&self) -> bool {
        !self.has_choice()
    }

    /// 記錄使用者的選擇；寫入為盡力而為，即使沒有儲存成功也會回傳紀錄
    pub fn record_choice(&mut self, accepted: bool, now: DateTime<Utc>) -> ConsentRecord {
        let record = ConsentRecord {
            accepted,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: self.settings.version.clone(),
        };

        if let Err(e) = self.store.set(
            &self.settings.storage_key,
            &record,
            self.settings.duration_days,
        ) {
            tracing::warn!("Could not persist consent preference: {}", e);
        } else {
            tracing::info!("Consent recorded: accepted={}", accepted);
        }
        record
    }

    pub fn reset(&mut self) {
        if let Err(e) = self.store.remove(&self.settings.storage_key) {
            tracing::warn!("Could not clear consent preference: {}", e);
        }
    }

    /// 從 `path` 到隱私權政策頁的相對連結
    pub fn privacy_policy_href(&self, path: &str) -> String {
        let file = self.settings.privacy_policy_url.trim_start_matches('/');
        let depth = path_segments(path).len();
        if depth > 0 {
            format!("{}{}", "../".repeat(depth - 1), file)
        } else {
            file.to_string()
        }
    }
}
