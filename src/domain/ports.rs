use crate::domain::model::ConsentRecord;
use crate::utils::error::Result;

/// 目前頁面的路徑與內嵌 meta 來源
pub trait PageContext {
    fn path(&self) -> &str;
    /// 取得具名 meta 的值，例如 `page-tags`
    fn meta(&self, name: &str) -> Option<&str>;
    fn document_title(&self) -> &str;
}

/// 同意偏好的鍵值儲存
pub trait ConsentStore {
    fn get(&self, key: &str) -> Result<Option<ConsentRecord>>;
    /// `days` 為到期天數，只對支援到期的儲存有效
    fn set(&mut self, key: &str, record: &ConsentRecord, days: u32) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}
