// Adapters 層：domain ports 的具體實作 (頁面上下文、同意偏好儲存)

pub mod page_context;
pub mod storage;
