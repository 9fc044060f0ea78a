//! Integration Tests for API Endpoints
//!
//! Drives the full router with the in-memory cache backend and a scripted
//! catalog provider that counts upstream calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use movie_api::{
    accounts::{InMemoryAccountStore, TokenService},
    api::create_router,
    cache::{CacheStore, MemoryBackend, ReadThroughCache, TtlPolicy},
    catalog::{
        Catalog, CatalogProvider, ImageUrls, ProviderError, RawMovie, RawMovieDetails, RawPage,
    },
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Scripted Provider ==

#[derive(Default)]
struct ScriptedProvider {
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn movie(id: u64, title: &str) -> RawMovie {
    RawMovie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster{}.jpg", id)),
        overview: Some(format!("{} overview", title)),
        genre_ids: vec![18, 53],
        release_date: Some("1999-10-15".to_string()),
        popularity: Some(42.5),
        vote_count: Some(1000),
        vote_average: Some(8.1),
    }
}

fn page_of(page: u32, results: Vec<RawMovie>) -> RawPage<RawMovie> {
    RawPage {
        page,
        total_results: results.len() as u64,
        results,
        total_pages: 1,
    }
}

#[async_trait]
impl CatalogProvider for ScriptedProvider {
    async fn upcoming(&self, _page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.record();
        Err(ProviderError::Transient("upstream returned 503".to_string()))
    }

    async fn latest(&self) -> Result<RawMovieDetails, ProviderError> {
        self.record();
        Ok(RawMovieDetails {
            id: 1_000_001,
            title: "Brand New".to_string(),
            poster_path: None,
            ..Default::default()
        })
    }

    async fn popular(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.record();
        Ok(page_of(
            page,
            vec![
                movie(550, "Fight Club"),
                movie(680, "Pulp Fiction"),
                movie(13, "Forrest Gump"),
            ],
        ))
    }

    async fn top_rated(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.record();
        Ok(page_of(page, vec![movie(238, "The Godfather")]))
    }

    async fn search(&self, query: &str, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.record();
        if query == "zzzzqx" {
            return Ok(page_of(page, Vec::new()));
        }
        Ok(page_of(page, vec![movie(11, query)]))
    }

    async fn details(&self, id: &str) -> Result<RawMovieDetails, ProviderError> {
        self.record();
        match id {
            "550" => Ok(RawMovieDetails {
                id: 550,
                title: "Fight Club".to_string(),
                overview: Some("An insomniac office worker...".to_string()),
                release_date: Some("1999-10-15".to_string()),
                poster_path: Some("/fc.jpg".to_string()),
                budget: Some(63_000_000),
                ..Default::default()
            }),
            _ => Err(ProviderError::NotFound),
        }
    }

    async fn similar(&self, id: &str, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.record();
        match id {
            "550" => Ok(page_of(page, vec![movie(807, "Se7en")])),
            _ => Err(ProviderError::NotFound),
        }
    }
}

// == Helper Functions ==

struct TestApp {
    router: Router,
    provider: Arc<ScriptedProvider>,
    backend: Arc<MemoryBackend>,
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send_raw(
        &self,
        uri: &str,
        token: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Registers an account and returns its token.
    async fn signup(&self, name: &str, email: &str) -> String {
        let (status, json) = self
            .send_json(
                "POST",
                "/api/signup",
                None,
                json!({"name": name, "email": email, "password": "secret123"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["token"].as_str().unwrap().to_string()
    }
}

fn create_test_app() -> TestApp {
    let provider = Arc::new(ScriptedProvider::default());
    let backend = Arc::new(MemoryBackend::new());
    let store = Arc::new(CacheStore::new(backend.clone(), Duration::from_millis(200)));
    let cache = Arc::new(ReadThroughCache::new(store, TtlPolicy::default()));
    let catalog = Catalog::new(
        provider.clone(),
        ImageUrls::new("https://image.tmdb.org/t/p/"),
    );
    let tokens = TokenService::new("integration-secret", Duration::from_secs(3600));
    let accounts = Arc::new(InMemoryAccountStore::with_hash_rounds(1_000));
    let state = AppState::new(cache, catalog, tokens).with_accounts(accounts);

    TestApp {
        router: create_router(state),
        provider,
        backend,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_reports_cache() {
    let app = create_test_app();

    let (status, json) = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cache"]["backend"], "memory");
    assert_eq!(json["cache"]["live"], true);
}

#[tokio::test]
async fn test_health_stays_up_when_cache_is_down() {
    let app = create_test_app();
    app.backend.simulate_outage();

    let (status, json) = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"]["live"], false);
}

// == Movie Endpoint Tests ==

#[tokio::test]
async fn test_movies_require_token() {
    let app = create_test_app();

    let (status, json) = app
        .send(
            Request::builder()
                .uri("/api/movies/popular")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Not authorized to access this route");
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = create_test_app();

    let (status, _) = app.get("/api/movies/popular", "not-a-token").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_popular_first_page_is_served_from_cache_on_repeat() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, first) = app.get("/api/movies/popular?page=1", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["page"], 1);

    let items = first["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        let poster = item["poster_path"].as_str().unwrap();
        assert!(poster.starts_with("https://image.tmdb.org/t/p/w500/"));
        assert!(item.get("popularity").is_some());
        assert!(item.get("release_date").is_none());
    }
    assert_eq!(app.provider.calls(), 1);

    let (status, second) = app.get("/api/movies/popular?page=1", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, first);
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_lenient_page_shares_first_page_entry() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    app.get("/api/movies/top_rated", &token).await;
    let (status, json) = app.get("/api/movies/top_rated?page=abc", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 1);
    assert_eq!(json["data"][0]["vote_average"], 8.1);
    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_unknown_movie_is_not_found_and_not_cached() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app.get("/api/movies/999999", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Movie not found");

    assert_eq!(app.backend.len().await, 0);

    app.get("/api/movies/999999", &token).await;
    assert_eq!(app.provider.calls(), 2);
}

#[tokio::test]
async fn test_movie_details_use_original_poster() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app.get("/api/movies/550", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Fight Club");
    assert_eq!(json["data"]["budget"], 63_000_000);
    assert_eq!(
        json["data"]["poster_path"],
        "https://image.tmdb.org/t/p/original/fc.jpg"
    );
}

#[tokio::test]
async fn test_latest_without_poster_is_null() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app.get("/api/movies/latest", &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Brand New");
    assert!(json["data"]["poster_path"].is_null());
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app.get("/api/movies/search?q=%20%20", &token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please provide a search query");
    assert_eq!(app.provider.calls(), 0);
    assert_eq!(app.backend.len().await, 0);
}

#[tokio::test]
async fn test_empty_search_result_is_cached() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    for _ in 0..2 {
        let (status, json) = app.get("/api/movies/search?q=zzzzqx", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
    }

    assert_eq!(app.provider.calls(), 1);
}

#[tokio::test]
async fn test_search_text_is_part_of_the_key() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    app.get("/api/movies/search?q=star%20wars", &token).await;
    app.get("/api/movies/search?q=Star%20Wars", &token).await;
    let (_, json) = app.get("/api/movies/search?q=star%20wars", &token).await;

    assert_eq!(json["data"][0]["title"], "star wars");
    assert_eq!(app.provider.calls(), 2);
}

#[tokio::test]
async fn test_similar_movies() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app.get("/api/movies/550/similar?page=2", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 2);
    assert_eq!(json["data"][0]["title"], "Se7en");

    let (status, _) = app.get("/api/movies/999999/similar", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upstream_failure_is_generic_and_not_cached() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app.get("/api/movies/upcoming", &token).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Failed to fetch upcoming movies");

    app.get("/api/movies/upcoming", &token).await;
    assert_eq!(app.provider.calls(), 2);
    assert_eq!(app.backend.len().await, 0);
}

#[tokio::test]
async fn test_cache_outage_degrades_to_uncached() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;
    app.backend.simulate_outage();

    for _ in 0..3 {
        let (status, json) = app.get("/api/movies/popular", &token).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }
    assert_eq!(app.provider.calls(), 3);

    app.backend.restore();
    app.get("/api/movies/popular", &token).await;
    app.get("/api/movies/popular", &token).await;
    assert_eq!(app.provider.calls(), 4);
}

// == Account Endpoint Tests ==

#[tokio::test]
async fn test_signup_login_and_me() {
    let app = create_test_app();
    app.signup("Ada Lovelace", "ada@example.com").await;

    let (status, json) = app
        .send_json(
            "POST",
            "/api/login",
            None,
            json!({"email": "ada@example.com", "password": "secret123"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Ada Lovelace");
    let token = json["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["email"], "ada@example.com");
    assert!(me["data"].get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = create_test_app();
    app.signup("Ada", "ada@example.com").await;

    let (status, json) = app
        .send_json(
            "POST",
            "/api/signup",
            None,
            json!({"name": "Other", "email": "ADA@example.com", "password": "secret123"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "User already exists");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = create_test_app();

    let (status, json) = app
        .send_json(
            "POST",
            "/api/signup",
            None,
            json!({"name": "Ada", "email": "ada@example.com", "password": "123"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_login_failures() {
    let app = create_test_app();
    app.signup("Ada", "ada@example.com").await;

    let (status, json) = app
        .send_json(
            "POST",
            "/api/login",
            None,
            json!({"email": "ada@example.com", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid credentials");

    let (status, json) = app
        .send_json("POST", "/api/login", None, json!({"email": "ada@example.com"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please provide an email and password");
}

// == Favorite Endpoint Tests ==

#[tokio::test]
async fn test_favorites_lifecycle() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app
        .send_json("POST", "/api/favorites", Some(&token), json!({"movieId": 550}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["movieId"], "550");
    assert_eq!(json["data"]["movieData"]["title"], "Fight Club");

    let (status, json) = app
        .send_json("POST", "/api/favorites", Some(&token), json!({"movieId": "550"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Movie is already in favorites");

    let (status, json) = app.get("/api/favorites", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);

    let (status, json) = app.delete("/api/favorites/550", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!({}));

    let (status, json) = app.delete("/api/favorites/550", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Favorite not found");
}

#[tokio::test]
async fn test_favorite_requires_existing_movie() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app
        .send_json("POST", "/api/favorites", Some(&token), json!({"movieId": 999999}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Movie not found");

    let (status, json) = app
        .send_json("POST", "/api/favorites", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please provide a movie ID");
}

#[tokio::test]
async fn test_favorite_lookup_reuses_cached_details() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    app.get("/api/movies/550", &token).await;
    app.send_json("POST", "/api/favorites", Some(&token), json!({"movieId": 550}))
        .await;

    assert_eq!(app.provider.calls(), 1);
}

// == Review Endpoint Tests ==

#[tokio::test]
async fn test_reviews_lifecycle() {
    let app = create_test_app();
    let ada = app.signup("Ada Lovelace", "ada@example.com").await;
    let bob = app.signup("Bob", "bob@example.com").await;

    let (status, created) = app
        .send_json(
            "POST",
            "/api/reviews",
            Some(&ada),
            json!({"movieId": 550, "content": "A classic", "rating": 5}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["authorName"], "Ada Lovelace");
    assert_eq!(
        created["data"]["avatar"],
        "https://ui-avatars.com/api/?name=Ada%20Lovelace&background=random"
    );
    let review_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .send_json(
            "POST",
            "/api/reviews",
            Some(&ada),
            json!({"movieId": "550", "content": "Again", "rating": 4}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "You have already reviewed this movie. Please update your existing review."
    );

    app.send_json(
        "POST",
        "/api/reviews",
        Some(&bob),
        json!({"movieId": 550, "content": "Overrated", "rating": 2}),
    )
    .await;

    let (status, json) = app.get("/api/reviews/550", &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["rating"], 5.0);

    let uri = format!("/api/reviews/{}", review_id);
    let (status, json) = app
        .send_json("PUT", &uri, Some(&bob), json!({"rating": 1}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Not authorized to update this review");

    let (status, json) = app
        .send_json("PUT", &uri, Some(&ada), json!({"content": "Still a classic"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["content"], "Still a classic");
    assert_eq!(json["data"]["rating"], 5.0);

    let (status, json) = app.delete(&uri, &bob).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Not authorized to delete this review");

    let (status, _) = app.delete(&uri, &ada).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.delete(&uri, &ada).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Review not found");
}

#[tokio::test]
async fn test_review_validation() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app
        .send_json("POST", "/api/reviews", Some(&token), json!({"movieId": 550}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please provide movieId, content and rating");

    let (status, json) = app
        .send_json(
            "POST",
            "/api/reviews",
            Some(&token),
            json!({"movieId": 550, "content": "Too good", "rating": 6}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Rating must be between 0 and 5");

    let (status, _) = app
        .send_json(
            "POST",
            "/api/reviews",
            Some(&token),
            json!({"movieId": 999999, "content": "Who?", "rating": 3}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app
        .send_json("PUT", "/api/reviews/anything", Some(&token), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please provide content or rating to update");
}

// == Request Body Tests ==

#[tokio::test]
async fn test_mistyped_field_is_json_validation_error() {
    let app = create_test_app();
    let token = app.signup("Ada", "ada@example.com").await;

    let (status, json) = app
        .send_json(
            "POST",
            "/api/reviews",
            Some(&token),
            json!({"movieId": 550, "content": "x", "rating": "4"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_malformed_json_is_json_validation_error() {
    let app = create_test_app();

    let (status, json) = app.send_raw("/api/signup", None, "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let token = app.signup("Ada", "ada@example.com").await;
    let (status, json) = app.send_raw("/api/favorites", Some(&token), "[1, 2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_rejected_as_json() {
    let app = create_test_app();

    let (status, json) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .body(Body::from(r#"{"email":"a@b.c","password":"x"}"#))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}
