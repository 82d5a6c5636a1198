// Domain 層：核心模型與 ports (介面)，除 std/serde 外不依賴其他套件

pub mod model;
pub mod ports;
