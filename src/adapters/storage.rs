use crate::domain::model::ConsentRecord;
use crate::domain::ports::ConsentStore;
use crate::utils::error::{Result, SiteError};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

static SET_COOKIE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^=;\s]+)=([^;]*);\s*expires=([^;]+)").expect("set-cookie pattern is valid")
});

/// JSON 鍵值檔案，主要儲存
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl ConsentStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<ConsentRecord>> {
        match self.read_all()?.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    // 本地儲存不過期，忽略 days
    fn set(&mut self, key: &str, record: &ConsentRecord, _days: u32) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), serde_json::to_value(record)?);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cookie {
    name: String,
    /// 百分比編碼的 JSON
    value: String,
    expires: DateTime<Utc>,
}

impl Cookie {
    fn set_cookie_line(&self) -> String {
        format!(
            "{}={}; expires={}; path=/; SameSite=Lax",
            self.name,
            self.value,
            self.expires.format(COOKIE_DATE_FORMAT)
        )
    }

    fn parse_line(line: &str) -> Option<Self> {
        let caps = SET_COOKIE_LINE.captures(line.trim())?;
        let expires = NaiveDateTime::parse_from_str(caps[3].trim(), COOKIE_DATE_FORMAT)
            .ok()?
            .and_utc();
        Some(Self {
            name: caps[1].to_string(),
            value: caps[2].to_string(),
            expires,
        })
    }
}

/// 每個 cookie 各自到期的 cookie 字串儲存，備援儲存
///
/// cookie 存在記憶體中；有指定檔案時會以 `Set-Cookie` 行寫入
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
    file: Option<PathBuf>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 `path` 保存的 cookie jar，無法解析的行略過
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let cookies = if path.exists() {
            fs::read_to_string(&path)?
                .lines()
                .filter_map(Cookie::parse_line)
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            cookies,
            file: Some(path),
        })
    }

    /// `now` 時間點的 `document.cookie`：未過期的 `name=value`
    pub fn header_at(&self, now: DateTime<Utc>) -> String {
        self.cookies
            .iter()
            .filter(|c| c.expires > now)
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `key` 的 `Set-Cookie` 行
    pub fn set_cookie_line(&self, key: &str) -> Option<String> {
        self.cookies
            .iter()
            .find(|c| c.name == key)
            .map(Cookie::set_cookie_line)
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<ConsentRecord>> {
        let pattern = Regex::new(&format!("(^| ){}=([^;]+)", regex::escape(key)))
            .map_err(|e| SiteError::storage(e.to_string()))?;
        let header = self.header_at(now);
        let Some(caps) = pattern.captures(&header) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&decode_component(&caps[2]))?))
    }

    pub fn set_at(
        &mut self,
        key: &str,
        record: &ConsentRecord,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let expires = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                SiteError::storage(format!("cookie expiry {} days from now is out of range", days))
            })?;
        let json = serde_json::to_string(record)?;
        let cookie = Cookie {
            name: key.to_string(),
            value: url::form_urlencoded::byte_serialize(json.as_bytes()).collect(),
            expires,
        };
        self.cookies.retain(|c| c.name != key);
        self.cookies.push(cookie);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lines: Vec<String> = self.cookies.iter().map(Cookie::set_cookie_line).collect();
        fs::write(path, lines.join("\n"))?;
        Ok(())
    }
}

/// 解碼單一百分比編碼字串；寫入時已跳脫 `&` 與 `=`
fn decode_component(raw: &str) -> String {
    url::form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

impl ConsentStore for CookieJar {
    fn get(&self, key: &str) -> Result<Option<ConsentRecord>> {
        self.get_at(key, Utc::now())
    }

    fn set(&mut self, key: &str, record: &ConsentRecord, days: u32) -> Result<()> {
        self.set_at(key, record, days, Utc::now())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.cookies.retain(|c| c.name != key);
        self.persist()
    }
}

/// 行程內儲存；unavailable 時每次呼叫都失敗，如同被停用的瀏覽器儲存
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, ConsentRecord>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(SiteError::storage("memory store is unavailable"))
        }
    }
}

impl ConsentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<ConsentRecord>> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, record: &ConsentRecord, _days: u32) -> Result<()> {
        self.check()?;
        self.entries.insert(key.to_string(), record.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

/// 主要儲存失敗時改用備援儲存
#[derive(Debug, Clone)]
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: ConsentStore, S: ConsentStore> FallbackStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

impl<P: ConsentStore, S: ConsentStore> ConsentStore for FallbackStore<P, S> {
    /// 主要儲存沒有資料時也查備援，主要儲存故障期間的選擇會寫在那裡
    fn get(&self, key: &str) -> Result<Option<ConsentRecord>> {
        match self.primary.get(key) {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => Ok(self.secondary.get(key).unwrap_or_else(|e| {
                tracing::debug!("Fallback store read failed: {}", e);
                None
            })),
            Err(e) => {
                tracing::warn!("Primary store read failed ({}), using fallback", e);
                self.secondary.get(key)
            }
        }
    }

    fn set(&mut self, key: &str, record: &ConsentRecord, days: u32) -> Result<()> {
        if let Err(e) = self.primary.set(key, record, days) {
            tracing::warn!("Primary store write failed ({}), using fallback", e);
            return self.secondary.set(key, record, days);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if let Err(e) = self.primary.remove(key) {
            tracing::warn!("Primary store remove failed: {}", e);
        }
        self.secondary.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn record(accepted: bool) -> ConsentRecord {
        ConsentRecord {
            accepted,
            timestamp: "2026-10-19T08:30:00.000Z".to_string(),
            version: "1.0".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_file_store_round_trip_and_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested/consent.json"));

        assert_eq!(store.get("pref").unwrap(), None);
        store.set("pref", &record(true), 365).unwrap();
        store.set("other", &record(false), 365).unwrap();
        assert_eq!(store.get("pref").unwrap(), Some(record(true)));

        store.remove("pref").unwrap();
        assert_eq!(store.get("pref").unwrap(), None);
        assert_eq!(store.get("other").unwrap(), Some(record(false)));
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consent.json");
        fs::write(&path, "{not json").unwrap();
        assert!(FileStore::new(path).get("pref").is_err());
    }

    #[test]
    fn test_cookie_jar_encodes_and_expires() {
        let mut jar = CookieJar::new();
        jar.set_at("cookie-consent-preference", &record(true), 365, now())
            .unwrap();

        let line = jar.set_cookie_line("cookie-consent-preference").unwrap();
        assert!(line.starts_with("cookie-consent-preference=%7B"));
        assert!(line.contains("; expires=Tue, 19 Oct 2027 08:30:00 GMT; path=/; SameSite=Lax"));

        assert_eq!(
            jar.get_at("cookie-consent-preference", now()).unwrap(),
            Some(record(true))
        );
        let later = now() + Duration::days(366);
        assert_eq!(jar.get_at("cookie-consent-preference", later).unwrap(), None);
        assert_eq!(jar.header_at(later), "");
    }

    #[test]
    fn test_cookie_jar_out_of_range_expiry_is_an_error() {
        let mut jar = CookieJar::new();
        let err = jar
            .set_at("pref", &record(true), u32::MAX, now())
            .unwrap_err();
        assert!(matches!(err, SiteError::StorageError { .. }));
        assert_eq!(jar.set_cookie_line("pref"), None);
    }

    #[test]
    fn test_cookie_jar_key_must_match_whole_name() {
        let mut jar = CookieJar::new();
        jar.set_at("xpref", &record(true), 1, now()).unwrap();
        assert_eq!(jar.get_at("pref", now()).unwrap(), None);
    }

    #[test]
    fn test_cookie_jar_persists_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cookies.txt");

        let mut jar = CookieJar::open(&path).unwrap();
        jar.set("pref", &record(false), 30).unwrap();

        let reopened = CookieJar::open(&path).unwrap();
        assert_eq!(reopened.get("pref").unwrap(), Some(record(false)));
    }

    #[test]
    fn test_fallback_store_uses_secondary_when_primary_fails() {
        let mut store = FallbackStore::new(MemoryStore::unavailable(), MemoryStore::new());
        store.set("pref", &record(true), 365).unwrap();
        assert_eq!(store.get("pref").unwrap(), Some(record(true)));
        assert_eq!(store.secondary().get("pref").unwrap(), Some(record(true)));

        store.remove("pref").unwrap();
        assert_eq!(store.get("pref").unwrap(), None);
    }

    #[test]
    fn test_fallback_store_prefers_primary() {
        let mut store = FallbackStore::new(MemoryStore::new(), MemoryStore::new());
        store.set("pref", &record(false), 365).unwrap();
        assert_eq!(store.primary().get("pref").unwrap(), Some(record(false)));
        assert_eq!(store.secondary().get("pref").unwrap(), None);
    }

    #[test]
    fn test_fallback_store_primary_miss_reads_secondary() {
        let mut secondary = MemoryStore::new();
        secondary.set("pref", &record(true), 365).unwrap();
        let store = FallbackStore::new(MemoryStore::new(), secondary);
        assert_eq!(store.get("pref").unwrap(), Some(record(true)));

        let store = FallbackStore::new(MemoryStore::new(), MemoryStore::unavailable());
        assert_eq!(store.get("pref").unwrap(), None);
    }
}
