use crate::helpers::{TestApi, list_items};
use reqwest::{Method, StatusCode};

#[tokio::test]
async fn unknown_paths_return_404() {
    let api = TestApi::spawn().await;

    let response = api.request(Method::GET, "/does/not/exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    api.shutdown().await;
}

#[tokio::test]
async fn unsupported_methods_return_405_and_do_not_write() {
    let api = TestApi::spawn_with(|config| {
        config.app.guestbook.write_policy = app::configuration::WritePolicy::OnSubmit;
    })
    .await;

    let response = api.request(Method::POST, "/?title=Hello").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "GET");

    let html = api.get_guestbook_html(&[]).await;
    assert!(list_items(&html).is_empty());
    api.shutdown().await;
}

#[tokio::test]
async fn the_server_stops_accepting_requests_after_shutdown() {
    let api = TestApi::spawn().await;
    let client = api.api_client.clone();
    let ping_url = format!("{}/api/ping", api.api_address);
    assert_eq!(client.get(&ping_url).send().await.unwrap().status(), 200);

    api.shutdown().await;

    // A fresh client, to avoid reusing the pooled connection.
    assert!(reqwest::get(&ping_url).await.is_err());
}
