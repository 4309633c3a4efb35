//! 通用工具函数

use chrono::Utc;
use uuid::Uuid;

/// 生成唯一的预测记录标识符
pub fn generate_prediction_id() -> String {
    format!(
        "pred-{}-{}",
        Utc::now().timestamp(),
        Uuid::new_v4().simple()
    )
}

/// 验证预测记录标识符格式
pub fn is_valid_prediction_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some("pred"), Some(ts), Some(suffix))
            if ts.chars().all(|c| c.is_ascii_digit())
                && suffix.len() == 32
                && suffix.chars().all(|c| c.is_ascii_hexdigit())
    )
}
