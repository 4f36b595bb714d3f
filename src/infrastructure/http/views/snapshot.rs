//! 快照概览

use askama::Template;
use chrono::{DateTime, Utc};
use url::form_urlencoded::Serializer;

use super::{url, ViewHelper};
use crate::domain::book::{Book, BookId, Snapshot};

/// 快照概览
///
/// 没有快照时输出专门的空状态片段，而不是空字符串；
/// 否则按输入顺序每个快照输出一行。
pub struct SnapshotOverview<'a> {
    /// 当前书籍（来自请求级存储）
    pub book_id: BookId,
    pub url_root: &'a str,
    /// 请求时间，用于 "x ago"
    pub now: DateTime<Utc>,
}

struct SnapshotItem {
    id: i64,
    date: String,
    ago: String,
    href: String,
}

#[derive(Template)]
#[template(path = "snapshot_overview.html")]
struct SnapshotOverviewTemplate {
    items: Vec<SnapshotItem>,
}

impl<'a> SnapshotOverview<'a> {
    /// 快照只读页地址
    pub fn snapshot_url(&self, snapshot: &Snapshot) -> String {
        let query = Serializer::new(String::new())
            .append_pair("id", &self.book_id.to_string())
            .append_pair("snapshot", &snapshot.id().to_string())
            .finish();
        url(self.url_root, &format!("/book/view?{}", query))
    }

    fn item(&self, snapshot: &Snapshot) -> SnapshotItem {
        let created = snapshot.created_at();
        SnapshotItem {
            id: snapshot.id().value(),
            date: format_date(created),
            ago: format_ago(created, self.now),
            href: self.snapshot_url(snapshot),
        }
    }
}

impl<'a, 's> ViewHelper<&'s [Snapshot]> for SnapshotOverview<'a> {
    fn render(&self, snapshots: &'s [Snapshot]) -> Result<String, askama::Error> {
        SnapshotOverviewTemplate {
            items: snapshots.iter().map(|snapshot| self.item(snapshot)).collect(),
        }
        .render()
    }
}

/// 快照页：创建表单 + 概览表格
pub struct SnapshotPage<'a> {
    pub url_root: &'a str,
    pub now: DateTime<Utc>,
}

#[derive(Template)]
#[template(path = "snapshot_page.html")]
struct SnapshotPageTemplate<'a> {
    title: &'a str,
    book_id: i64,
    action: String,
    rows: String,
}

impl<'a, 'b, 's> ViewHelper<(&'b Book, &'s [Snapshot])> for SnapshotPage<'a> {
    fn render(
        &self,
        (book, snapshots): (&'b Book, &'s [Snapshot]),
    ) -> Result<String, askama::Error> {
        let rows = SnapshotOverview {
            book_id: book.id(),
            url_root: self.url_root,
            now: self.now,
        }
        .render(snapshots)?;

        SnapshotPageTemplate {
            title: book.title(),
            book_id: book.id().value(),
            action: url(self.url_root, "/snapshot/create"),
            rows,
        }
        .render()
    }
}

/// 快照日期
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d %B %Y, %H:%M").to_string()
}

/// 相对时间
pub fn format_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let (value, unit) = match seconds {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 2_592_000 => (s / 86_400, "day"),
        s if s < 31_536_000 => (s / 2_592_000, "month"),
        s => (s / 31_536_000, "year"),
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::SnapshotId;

    fn overview(now: i64) -> SnapshotOverview<'static> {
        SnapshotOverview {
            book_id: BookId::new(4),
            url_root: "",
            now: DateTime::<Utc>::from_timestamp(now, 0).unwrap(),
        }
    }

    #[test]
    fn test_zero_snapshots_renders_empty_fragment() {
        let none: Vec<Snapshot> = Vec::new();
        let html = overview(0).render(none.as_slice()).unwrap();

        assert!(!html.is_empty());
        assert!(html.contains("snapshot-empty"));
        assert!(!html.contains("snapshot-item"));
    }

    #[test]
    fn test_three_snapshots_render_three_items_in_order() {
        let snapshots: Vec<Snapshot> = [1_700_000_000, 1_690_000_000, 1_680_000_000]
            .into_iter()
            .map(|created| Snapshot::new(BookId::new(4), SnapshotId::new(created)))
            .collect();

        let html = overview(1_700_000_000 + 7_200).render(snapshots.as_slice()).unwrap();

        assert_eq!(html.matches(r#"class="snapshot-item""#).count(), 3);
        assert!(!html.contains("snapshot-empty"));

        let mut last = 0;
        for snapshot in &snapshots {
            let href = format!("/book/view?id=4&amp;snapshot={}", snapshot.id());
            let position = html.find(&href).unwrap();
            assert!(position >= last);
            last = position;

            assert!(html.contains(&format_date(snapshot.created_at())));
        }
        assert!(html.contains("2 hours ago"));
    }

    #[test]
    fn test_snapshot_url_respects_root() {
        let overview = SnapshotOverview {
            book_id: BookId::new(1),
            url_root: "/webbook",
            now: Utc::now(),
        };
        let snapshot = Snapshot::new(BookId::new(1), SnapshotId::new(99));

        assert_eq!(overview.snapshot_url(&snapshot), "/webbook/book/view?id=1&snapshot=99");
    }

    #[test]
    fn test_page_posts_create_form() {
        let book = Book::assemble(BookId::new(4), "Dune & Co", None, Vec::new());
        let page = SnapshotPage {
            url_root: "/wb",
            now: Utc::now(),
        };

        let html = page.render((&book, &[][..])).unwrap();

        assert!(html.contains("Snapshots of Dune &amp; Co"));
        assert!(html.contains(
            r#"<form class="snapshot-create" method="post" action="/wb/snapshot/create">"#
        ));
        assert!(html.contains(r#"name="book_id" value="4""#));
        assert!(html.contains("snapshot-empty"));
    }

    #[test]
    fn test_format_ago() {
        let now = DateTime::<Utc>::from_timestamp(1_000_000, 0).unwrap();
        let ago = |secs: i64| format_ago(now - chrono::Duration::seconds(secs), now);

        assert_eq!(ago(5), "just now");
        assert_eq!(ago(60), "1 minute ago");
        assert_eq!(ago(3 * 3_600), "3 hours ago");
        assert_eq!(ago(86_400), "1 day ago");
        assert_eq!(ago(2 * 31_536_000), "2 years ago");
    }
}
