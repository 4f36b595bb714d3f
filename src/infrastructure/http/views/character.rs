//! 角色查看（模态框内容）

use askama::Template;

use super::ViewHelper;
use crate::application::ports::EntityRecord;

pub struct CharacterView;

#[derive(Template)]
#[template(path = "character.html")]
struct CharacterTemplate<'a> {
    id: i64,
    name: &'a str,
    kind: &'a str,
    paragraphs: Vec<&'a str>,
}

impl<'e> ViewHelper<&'e EntityRecord> for CharacterView {
    fn render(&self, entity: &'e EntityRecord) -> Result<String, askama::Error> {
        CharacterTemplate {
            id: entity.id,
            name: &entity.name,
            kind: &entity.kind,
            paragraphs: entity
                .description
                .lines()
                .filter(|line| !line.trim().is_empty())
                .collect(),
        }
        .render()
    }
}
