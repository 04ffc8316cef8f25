use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 短码到目标地址的映射，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    pub fn new(code: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
            created_at: Utc::now(),
        }
    }
}
