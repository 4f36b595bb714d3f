//! 页面布局（非 AJAX 请求）

use std::time::Duration;

use askama::Template;

use super::{url, ViewHelper};

/// 页面布局
pub struct Layout<'a> {
    pub title: &'a str,
    pub url_root: &'a str,
    pub app_status: &'a str,
    /// 开启后在页脚输出本次请求到渲染为止的耗时
    pub app_profile: bool,
    pub elapsed: Duration,
    pub book_id: Option<i64>,
}

struct Nav {
    book_id: i64,
    edit: String,
    view: String,
    snapshots: String,
    settings: String,
}

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate<'a> {
    title: &'a str,
    app_status: &'a str,
    url_root: &'a str,
    css: String,
    js: String,
    nav: Option<Nav>,
    content: &'a str,
    render_ms: Option<u128>,
}

impl<'a, 'c> ViewHelper<&'c str> for Layout<'a> {
    fn render(&self, content: &'c str) -> Result<String, askama::Error> {
        let link = |path: String| url(self.url_root, &path);
        let nav = self.book_id.map(|id| Nav {
            book_id: id,
            edit: link(format!("/book/edit?id={}", id)),
            view: link(format!("/book/view?id={}", id)),
            snapshots: link(format!("/snapshot?id={}", id)),
            settings: link(format!("/settings?id={}", id)),
        });

        LayoutTemplate {
            title: self.title,
            app_status: self.app_status,
            url_root: self.url_root,
            css: url(self.url_root, "/assets/css/webbook.css"),
            js: url(self.url_root, "/assets/js/webbook.js"),
            nav,
            content,
            render_ms: self.app_profile.then(|| self.elapsed.as_millis()),
        }
        .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(app_profile: bool) -> Layout<'static> {
        Layout {
            title: "My <book>",
            url_root: "/wb",
            app_status: "production",
            app_profile,
            elapsed: Duration::from_millis(12),
            book_id: Some(3),
        }
    }

    #[test]
    fn test_layout_wraps_content() {
        let html = layout(false).render("<p>body</p>").unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>My &lt;book&gt;</title>"));
        assert!(html.contains(r#"<main id="content"><p>body</p></main>"#));
        assert!(html.contains(r#"href="/wb/book/edit?id=3""#));
        assert!(html.contains(r#"data-bookid="3""#));
        assert!(!html.contains("profiler"));
    }

    #[test]
    fn test_profile_outputs_render_time() {
        let html = layout(true).render("").unwrap();

        assert!(html.contains(r#"<div id="profiler" data-enabled="1">Rendered in 12 ms</div>"#));
    }

    #[test]
    fn test_layout_without_book_has_no_nav() {
        let html = Layout {
            book_id: None,
            ..layout(false)
        }
        .render("")
        .unwrap();

        assert!(!html.contains("site-nav"));
        assert!(!html.contains("data-bookid"));
    }
}
