//! 错误页（非 AJAX 请求失败时）

use askama::Template;

use super::{url, ViewHelper};

pub struct ErrorPage<'a> {
    pub url_root: &'a str,
    pub default_book_id: i64,
}

#[derive(Template)]
#[template(path = "error_page.html")]
struct ErrorPageTemplate<'a> {
    status: u16,
    message: &'a str,
    home: String,
}

impl<'a, 'm> ViewHelper<(u16, &'m str)> for ErrorPage<'a> {
    fn render(&self, (status, message): (u16, &'m str)) -> Result<String, askama::Error> {
        ErrorPageTemplate {
            status,
            message,
            home: url(
                self.url_root,
                &format!("/book/edit?id={}", self.default_book_id),
            ),
        }
        .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page() {
        let page = ErrorPage {
            url_root: "",
            default_book_id: 1,
        };

        let html = page.render((404, "Book <9> not found")).unwrap();

        assert!(html.contains("<h1>404</h1>"));
        assert!(html.contains("Book &lt;9&gt; not found"));
        assert!(html.contains(r#"href="/book/edit?id=1""#));
    }
}
