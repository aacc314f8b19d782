//! 时间工具函数
//!
//! 存储层只接收 `i64` Unix millis。

use chrono::{DateTime, Utc};

/// 当前时间 (Unix millis)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → RFC 3339 字符串 (日志用)，超出范围时返回 None
pub fn millis_to_rfc3339(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.to_rfc3339())
}
