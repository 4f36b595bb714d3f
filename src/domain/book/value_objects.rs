//! Book Context - Value Objects

use serde::{Deserialize, Serialize};

/// 书籍唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(i64);

impl BookId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节标识
///
/// 章节标识同时是章节在书中的位置（从 1 开始），
/// 插入/删除章节时后续章节会整体 +1/-1。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterId(u32);

impl ChapterId {
    pub const FIRST: ChapterId = ChapterId(1);

    pub fn new(order: u32) -> Option<Self> {
        (order >= 1).then_some(Self(order))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub(crate) fn shift_up(&mut self) {
        self.0 += 1;
    }

    pub(crate) fn shift_down(&mut self) {
        self.0 = self.0.saturating_sub(1).max(1);
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 段落标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(i64);

impl SectionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 快照标识（快照创建时间，Unix 秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(i64);

impl SnapshotId {
    pub fn new(created: i64) -> Self {
        Self(created)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 段落类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// 章节标题
    Title,
    /// 正文段落
    Content,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Title => "title",
            SectionKind::Content => "content",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "title" => Some(SectionKind::Title),
            "content" => Some(SectionKind::Content),
            _ => None,
        }
    }
}
