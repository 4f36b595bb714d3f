//! User - 当前用户
//!
//! 尚无登录功能，请求初始化时使用配置中的默认用户。

use serde::{Deserialize, Serialize};

/// 用户标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> UserId {
        self.id
    }
}
