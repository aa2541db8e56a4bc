use std::time::{Duration, SystemTime, UNIX_EPOCH};

use app::configuration::{GuestbookVariant, SqliteConfig, StoreConfig, WritePolicy};
use reqwest::header::CONTENT_TYPE;

use crate::helpers::{TestApi, list_items};

/// Split an article `<li>` into its rendered date-time, title and content.
fn article_parts(item: &str) -> (&str, &str, &str) {
    let rest = item.strip_prefix("<span>").unwrap();
    let (date_time, rest) = rest.split_once("</span>: 「<span>").unwrap();
    let (title, rest) = rest.split_once("</span>」<span>").unwrap();
    let content = rest.strip_suffix("</span>").unwrap();
    (date_time, title, content)
}

/// Check that `s` looks like `YYYY/MM/DD hh:mm:ss`.
fn assert_local_date_time(s: &str) {
    assert_eq!(s.len(), 19, "Unexpected date-time: {s}");
    for (i, c) in s.char_indices() {
        match i {
            4 | 7 => assert_eq!(c, '/'),
            10 => assert_eq!(c, ' '),
            13 | 16 => assert_eq!(c, ':'),
            _ => assert!(c.is_ascii_digit(), "Unexpected date-time: {s}"),
        }
    }
}

#[tokio::test]
async fn the_guestbook_page_is_html() {
    let api = TestApi::spawn().await;

    let response = api.get_guestbook(&[]).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    api.shutdown().await;
}

#[tokio::test]
async fn submissions_are_listed_newest_first() {
    let api = TestApi::spawn().await;

    let html = api
        .get_guestbook_html(&[("title", "Hello"), ("content", "World")])
        .await;
    let items = list_items(&html);
    assert_eq!(items.len(), 1);
    let (date_time, title, content) = article_parts(items[0]);
    assert_local_date_time(date_time);
    assert_eq!((title, content), ("Hello", "World"));

    // Make sure the next article gets a different timestamp.
    tokio::time::sleep(Duration::from_millis(5)).await;

    let html = api.get_guestbook_html(&[]).await;
    let items = list_items(&html);
    assert_eq!(items.len(), 2);
    let (_, title, content) = article_parts(items[0]);
    assert_eq!((title, content), ("-", "---"));
    let (_, title, content) = article_parts(items[1]);
    assert_eq!((title, content), ("Hello", "World"));

    api.shutdown().await;
}

#[tokio::test]
async fn articles_are_timestamped_with_the_submission_time() {
    let api = TestApi::spawn().await;
    let start = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();

    api.get_guestbook_html(&[("title", "Now")]).await;

    let articles = match api_entries(&api).await {
        app::guestbook::Entries::Articles(articles) => articles,
        app::guestbook::Entries::Comments(_) => unreachable!(),
    };
    assert_eq!(articles[0].title, "Now");
    assert_eq!(articles[0].content, "---");
    assert!(articles[0].timestamp >= start.as_millis() as i64);
    api.shutdown().await;
}

async fn api_entries(api: &TestApi) -> app::guestbook::Entries {
    api.application_state().guestbook.entries().await.unwrap()
}

#[tokio::test]
async fn user_input_is_escaped() {
    let api = TestApi::spawn().await;

    let html = api
        .get_guestbook_html(&[("title", "<b>bold</b>"), ("content", "a & b")])
        .await;

    let (_, title, content) = article_parts(list_items(&html)[0]);
    assert_eq!(title, "&lt;b&gt;bold&lt;/b&gt;");
    assert_eq!(content, "a &amp; b");
    api.shutdown().await;
}

#[tokio::test]
async fn comments_with_the_same_title_are_overwritten() {
    let api = TestApi::spawn_with(|config| {
        config.app.guestbook.variant = GuestbookVariant::Comments;
    })
    .await;

    api.get_guestbook_html(&[("title", "Hello"), ("content", "World")])
        .await;
    api.get_guestbook_html(&[("title", "Ciao"), ("content", "Mondo")])
        .await;
    let html = api
        .get_guestbook_html(&[("title", "Hello"), ("content", "There")])
        .await;

    assert_eq!(list_items(&html), vec!["Ciao: Mondo", "Hello: There"]);
    api.shutdown().await;
}

#[tokio::test]
async fn bare_page_views_write_nothing_with_the_on_submit_policy() {
    let api = TestApi::spawn_with(|config| {
        config.app.guestbook.write_policy = WritePolicy::OnSubmit;
    })
    .await;

    let html = api.get_guestbook_html(&[]).await;
    assert!(list_items(&html).is_empty());

    let html = api.get_guestbook_html(&[("content", "World")]).await;
    let items = list_items(&html);
    assert_eq!(items.len(), 1);
    let (_, title, content) = article_parts(items[0]);
    assert_eq!((title, content), ("-", "World"));
    api.shutdown().await;
}

#[tokio::test]
async fn sqlite_entries_outlive_the_server() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guestbook.db");
    let use_sqlite = |config: &mut server::configuration::Config| {
        config.app.guestbook.variant = GuestbookVariant::Comments;
        config.app.store = StoreConfig::Sqlite(SqliteConfig {
            path: path.clone(),
            max_connections: 2,
        });
    };

    let api = TestApi::spawn_with(use_sqlite).await;
    api.get_guestbook_html(&[("title", "Hello"), ("content", "World")])
        .await;
    api.shutdown().await;

    let api = TestApi::spawn_with(use_sqlite).await;
    let html = api.get_guestbook_html(&[("title", "Ciao"), ("content", "Mondo")]).await;
    assert_eq!(list_items(&html), vec!["Ciao: Mondo", "Hello: World"]);
    api.shutdown().await;
}
