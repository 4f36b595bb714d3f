//! 提示信息片段

use askama::Template;

use super::ViewHelper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

pub struct Notice {
    pub kind: NoticeKind,
}

impl Notice {
    pub fn success() -> Self {
        Self {
            kind: NoticeKind::Success,
        }
    }

    pub fn error() -> Self {
        Self {
            kind: NoticeKind::Error,
        }
    }
}

#[derive(Template)]
#[template(path = "notice.html")]
struct NoticeTemplate<'a> {
    kind: &'static str,
    message: &'a str,
}

impl<'m> ViewHelper<&'m str> for Notice {
    fn render(&self, message: &'m str) -> Result<String, askama::Error> {
        NoticeTemplate {
            kind: self.kind.as_str(),
            message,
        }
        .render()
    }
}
