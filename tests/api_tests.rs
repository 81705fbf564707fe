use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use reelfeed::{
    db::{CatalogStore, InMemoryCatalog},
    error::{AppError, AppResult},
    models::{Collection, CollectionEntry, ContentType, FeedCursor, Title, TitleId, Trailer},
    routes::{create_router, AppState},
    services::{PagingConfig, RankingConfig, TitlePredicate},
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// Title number `n` is created `n` minutes after the base time
fn numbered_title(n: i64) -> Title {
    let mut title = Title::new(
        format!("Title {n}"),
        if n % 2 == 0 { ContentType::Movie } else { ContentType::Tv },
        base_time() + Duration::minutes(n),
    );
    title.year = Some(1980 + (n as i32 % 44));
    title
}

fn server_for(store: Arc<dyn CatalogStore>) -> TestServer {
    let state = Arc::new(AppState::new(
        store,
        PagingConfig::default(),
        RankingConfig::default(),
    ));
    TestServer::new(create_router(state)).unwrap()
}

fn ids(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = server_for(Arc::new(InMemoryCatalog::new()));
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_two_page_walk_over_25_titles() {
    let titles: Vec<Title> = (1..=25).map(numbered_title).collect();
    let by_number: Vec<String> = titles.iter().map(|t| t.id.to_string()).collect();
    let server = server_for(Arc::new(InMemoryCatalog::with_titles(titles)));

    let first = server.get("/api/v1/feed").await;
    first.assert_status_ok();
    let first: Value = first.json();

    let expected_first: Vec<String> = (6..=25).rev().map(|n| by_number[n - 1].clone()).collect();
    assert_eq!(ids(&first), expected_first);
    assert_eq!(first["next_cursor"], by_number[5]);

    let second: Value = server
        .get("/api/v1/feed")
        .add_query_param("cursor", first["next_cursor"].as_str().unwrap())
        .await
        .json();

    let expected_second: Vec<String> = (1..=5).rev().map(|n| by_number[n - 1].clone()).collect();
    assert_eq!(ids(&second), expected_second);
    assert!(second["next_cursor"].is_null());
}

#[tokio::test]
async fn test_cursor_chain_visits_every_title_once() {
    let genres = ["drama", "crime", "horror", "comedy", "noir"];
    let titles: Vec<Title> = (1..=47)
        .map(|n| {
            let mut title = numbered_title(n);
            title.genres = vec![genres[(n % 2) as usize].to_string()];
            title
        })
        .collect();
    let mut newest_first = titles.clone();
    newest_first.sort_by_key(|t| std::cmp::Reverse(t.sort_key()));
    let server = server_for(Arc::new(InMemoryCatalog::with_titles(titles)));

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        let mut request = server.get("/api/v1/feed");
        if let Some(cursor) = &cursor {
            request = request.add_query_param("cursor", cursor);
        }
        let body: Value = request.await.json();
        let page_ids = ids(&body);

        // Pages are contiguous slices of the catalog order, reranked internally.
        let expected: HashSet<String> = newest_first[seen.len()..seen.len() + page_ids.len()]
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(page_ids.iter().cloned().collect::<HashSet<_>>(), expected);

        seen.extend(page_ids);
        pages += 1;

        match body["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen.len(), 47);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 47);
}

#[tokio::test]
async fn test_feed_page_is_genre_diversified() {
    let titles: Vec<Title> = (1..=5)
        .map(|n| {
            let mut title = numbered_title(n);
            title.genres = vec![if n == 1 { "romance" } else { "thriller" }.to_string()];
            title
        })
        .collect();
    let romance = titles[0].id.to_string();
    let server = server_for(Arc::new(InMemoryCatalog::with_titles(titles)));

    let body: Value = server.get("/api/v1/feed").await.json();
    let page = ids(&body);

    // Oldest title is the only romance; it is pulled up to the second slot.
    assert_eq!(page.len(), 5);
    assert_eq!(page[1], romance);
}

#[tokio::test]
async fn test_filters_are_applied_and_permissive() {
    let mut horror = numbered_title(1);
    horror.genres = vec!["horror".to_string()];
    horror.countries = vec!["ES".to_string()];
    horror.year = Some(2005);

    let mut comedy = numbered_title(2);
    comedy.genres = vec!["comedy".to_string()];
    comedy.languages = vec!["fr".to_string()];
    comedy.year = Some(1995);

    let server = server_for(Arc::new(InMemoryCatalog::with_titles(vec![
        horror.clone(),
        comedy.clone(),
    ])));

    let body: Value = server
        .get("/api/v1/feed")
        .add_query_param("genres", "horror,,western")
        .await
        .json();
    assert_eq!(ids(&body), vec![horror.id.to_string()]);

    let body: Value = server
        .get("/api/v1/feed")
        .add_query_param("type", "movie")
        .await
        .json();
    assert_eq!(ids(&body), vec![comedy.id.to_string()]);

    let body: Value = server
        .get("/api/v1/feed")
        .add_query_param("lang", " fr ")
        .add_query_param("countries", ",")
        .await
        .json();
    assert_eq!(ids(&body), vec![comedy.id.to_string()]);

    let body: Value = server
        .get("/api/v1/feed")
        .add_query_param("year_min", "2000")
        .add_query_param("year_max", "1999")
        .await
        .json();
    assert!(ids(&body).is_empty());
    assert!(body["next_cursor"].is_null());

    let response = server
        .get("/api/v1/feed")
        .add_query_param("type", "bogus")
        .add_query_param("year_min", "not-a-year")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body).len(), 2);
}

#[tokio::test]
async fn test_repeated_filter_keys_use_first_value() {
    let mut drama = numbered_title(1);
    drama.genres = vec!["drama".to_string()];
    let mut horror = numbered_title(2);
    horror.genres = vec!["horror".to_string()];

    let server = server_for(Arc::new(InMemoryCatalog::with_titles(vec![
        drama.clone(),
        horror.clone(),
    ])));

    let response = server
        .get("/api/v1/feed?genres=drama&genres=horror")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec![drama.id.to_string()]);

    // numbered_title(2) is a movie, numbered_title(1) a show.
    let response = server.get("/api/v1/feed?type=movie&type=tv").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body), vec![horror.id.to_string()]);

    let response = server
        .get("/api/v1/feed?cursor=&cursor=garbage&year_min=x&year_min=2000")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(ids(&body).len(), 2);
}

#[tokio::test]
async fn test_unknown_cursor_returns_empty_terminal_page() {
    let titles: Vec<Title> = (1..=3).map(numbered_title).collect();
    let server = server_for(Arc::new(InMemoryCatalog::with_titles(titles)));

    for cursor in [TitleId::new().to_string(), "garbage".to_string()] {
        let response = server
            .get("/api/v1/feed")
            .add_query_param("cursor", &cursor)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(ids(&body).is_empty());
        assert!(body["next_cursor"].is_null());
    }
}

#[tokio::test]
async fn test_title_detail() {
    let mut title = numbered_title(1);
    title.overview = Some("x".repeat(300));
    title.backdrop_url = Some("https://img.example/backdrop.jpg".to_string());
    title.trailers = vec![
        Trailer::new("youtube", "fan-cut", "trailer", false),
        Trailer::new("youtube", "teaser-1", "teaser", true),
        Trailer::new("youtube", "official", "trailer", true),
    ];
    let id = title.id;
    let server = server_for(Arc::new(InMemoryCatalog::with_titles(vec![title])));

    let response = server.get(&format!("/api/v1/titles/{id}")).await;
    response.assert_status_ok();
    let body: Value = response.json();

    let item = &body["item"];
    assert_eq!(item["id"], id.to_string());
    assert_eq!(item["overview_short"].as_str().unwrap().chars().count(), 160);
    assert_eq!(item["backdrop_url"], "https://img.example/backdrop.jpg");
    assert_eq!(item["trailer"]["video_id"], "official");
    assert_eq!(item["trailer"]["kind"], "trailer");
    assert_eq!(item["trailer"]["is_official"], true);
    assert_eq!(item["trailer"]["source"], "youtube");
}

#[tokio::test]
async fn test_title_not_found() {
    let server = server_for(Arc::new(InMemoryCatalog::new()));

    let response = server
        .get(&format!("/api/v1/titles/{}", TitleId::new()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/api/v1/titles/not-an-id").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collections_use_curated_order() {
    let titles: Vec<Title> = (1..=12).map(numbered_title).collect();
    let mut catalog = InMemoryCatalog::new();
    for title in &titles {
        catalog.insert_title(title.clone());
    }

    // Curated order is the reverse of insertion, 12 items, capped at 10.
    let curated: Vec<(i32, TitleId)> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| (100 - i as i32, t.id))
        .collect();
    catalog.insert_collection(
        Collection {
            id: Uuid::new_v4(),
            slug: "noir".to_string(),
            title: "Noir".to_string(),
            description: Some("Shadows, crime and mystery.".to_string()),
        },
        curated,
    );
    catalog.insert_collection(
        Collection {
            id: Uuid::new_v4(),
            slug: "cult-midnight".to_string(),
            title: "Cult / Midnight".to_string(),
            description: None,
        },
        vec![(0, titles[0].id)],
    );

    let server = server_for(Arc::new(catalog));
    let response = server.get("/api/v1/collections").await;
    response.assert_status_ok();
    let body: Value = response.json();

    let collections = body["collections"].as_array().unwrap();
    assert_eq!(collections.len(), 2);
    assert_eq!(collections[0]["slug"], "cult-midnight");
    assert!(collections[0]["description"].is_null());
    assert_eq!(collections[1]["slug"], "noir");

    let noir_ids = ids(&collections[1]);
    let expected: Vec<String> = titles
        .iter()
        .rev()
        .take(10)
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(noir_ids, expected);
}

struct FailingCatalog;

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn query_titles(
        &self,
        _predicate: &TitlePredicate,
        _after: Option<FeedCursor>,
        _limit: usize,
    ) -> AppResult<Vec<Title>> {
        Err(AppError::Internal("connection refused: db-primary:5432".to_string()))
    }

    async fn find_title(&self, _id: TitleId) -> AppResult<Option<Title>> {
        Err(AppError::Internal("connection refused: db-primary:5432".to_string()))
    }

    async fn list_collections(&self, _preview_limit: usize) -> AppResult<Vec<CollectionEntry>> {
        Err(AppError::Internal("connection refused: db-primary:5432".to_string()))
    }
}

#[tokio::test]
async fn test_storage_failure_is_opaque() {
    let server = server_for(Arc::new(FailingCatalog));

    for (path, expected) in [
        ("/api/v1/feed".to_string(), "Failed to load feed."),
        (
            format!("/api/v1/titles/{}", TitleId::new()),
            "Failed to load title.",
        ),
        ("/api/v1/collections".to_string(), "Failed to load collections."),
    ] {
        let response = server.get(&path).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], expected);
        assert!(!response.text().contains("db-primary"));
    }
}
