//! Book Context - Entities

use serde::{Deserialize, Serialize};

use super::{ChapterId, SectionId, SectionKind};

/// 段落 - 最小编辑单位（标题或正文）
///
/// 不变量:
/// - order 在章节内有序（由客户端维护连续性，服务端不强制）
/// - content 为原始 HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    kind: SectionKind,
    order: u32,
    content: String,
}

impl Section {
    pub fn new(id: SectionId, kind: SectionKind, order: u32, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            order,
            content: content.into(),
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_title(&self) -> bool {
        self.kind == SectionKind::Title
    }
}

/// 章节 - 有序的段落集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    sections: Vec<Section>,
}

impl Chapter {
    pub fn new(id: ChapterId) -> Self {
        Self {
            id,
            sections: Vec::new(),
        }
    }

    pub fn with_sections(id: ChapterId, sections: Vec<Section>) -> Self {
        Self { id, sections }
    }

    pub fn id(&self) -> ChapterId {
        self.id
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// 章节标题（第一个标题段落的内容）
    pub fn title(&self) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.is_title())
            .map(|s| s.content())
    }
}

/// 在位置 `at` 插入章节前，将所有 >= at 的章节标识 +1
pub fn shift_for_insert<'a>(ids: impl IntoIterator<Item = &'a mut ChapterId>, at: ChapterId) {
    for id in ids {
        if *id >= at {
            id.shift_up();
        }
    }
}

/// 删除位置 `at` 的章节后，将所有 > at 的章节标识 -1
pub fn shift_for_delete<'a>(ids: impl IntoIterator<Item = &'a mut ChapterId>, at: ChapterId) {
    for id in ids {
        if *id > at {
            id.shift_down();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u32]) -> Vec<ChapterId> {
        values.iter().map(|v| ChapterId::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_chapter_title_is_first_title_section() {
        let mut chapter = Chapter::new(ChapterId::FIRST);
        chapter.push_section(Section::new(SectionId::new(1), SectionKind::Content, 1, "<p>x</p>"));
        chapter.push_section(Section::new(SectionId::new(2), SectionKind::Title, 2, "Opening"));

        assert_eq!(chapter.title(), Some("Opening"));
    }

    #[test]
    fn test_shift_for_insert() {
        let mut chapters = ids(&[1, 2, 3]);
        shift_for_insert(chapters.iter_mut(), ChapterId::new(2).unwrap());
        assert_eq!(chapters, ids(&[1, 3, 4]));
    }

    #[test]
    fn test_shift_for_delete() {
        let mut chapters = ids(&[1, 3, 4]);
        shift_for_delete(chapters.iter_mut(), ChapterId::new(2).unwrap());
        assert_eq!(chapters, ids(&[1, 2, 3]));
    }
}
