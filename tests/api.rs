//! Router-level tests: requests go through the full axum stack with the
//! in-memory key store and catalog.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::connect_info::MockConnectInfo,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use vaultmovies_api::{
    catalog::InMemoryCatalog,
    models::{
        api_key::NewApiKey,
        manga::{Chapter, Manga},
        movie::Movie,
    },
    routes::build_router,
    services::key_issuer::IssuancePolicy,
    state::AppState,
    store::{InMemoryKeyStore, KeyStore},
};

const ALICE: &str = "1.2.3.4:40000";
const BOB: &str = "5.6.7.8:40000";

struct TestApp {
    state: AppState,
    store: Arc<InMemoryKeyStore>,
}

impl TestApp {
    fn new(policy: IssuancePolicy) -> Self {
        let store = Arc::new(InMemoryKeyStore::new());
        let state = AppState::new(store.clone(), Arc::new(catalog()), policy, Duration::hours(24));
        Self { state, store }
    }

    fn router_for(&self, peer: &str) -> Router {
        let peer: SocketAddr = peer.parse().unwrap();
        build_router(self.state.clone()).layer(MockConnectInfo(peer))
    }

    async fn get(&self, peer: &str, uri: &str) -> (StatusCode, String) {
        let response = self
            .router_for(peer)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get_json(&self, peer: &str, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(peer, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    async fn issue(&self, peer: &str) -> String {
        let (status, body) = self.get_json(peer, "/keys").await;
        assert_eq!(status, StatusCode::OK, "issuance failed: {body}");
        body["key"].as_str().unwrap().to_string()
    }
}

fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        year: Some(1999),
        rating: Some("8.7".to_string()),
        cover: None,
        link: None,
        synopsis: None,
    }
}

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(
        vec![movie(1, "The Matrix"), movie(2, "Alien")],
        vec![Manga {
            id: 1,
            title: "Berserk".to_string(),
            rating: Some("9.4".to_string()),
            year: Some(1989),
            cover: None,
            link: None,
            genres: "Action, Dark Fantasy".to_string(),
            synopsis: None,
        }],
        vec![Chapter {
            id: 10,
            manga_id: 1,
            title: "The Black Swordsman".to_string(),
            link: None,
            release_date: Some("1989-08-25".to_string()),
            images: "p1.jpg, p2.jpg".to_string(),
        }],
    )
}

#[tokio::test]
async fn issued_key_unlocks_catalog_from_same_address() {
    let app = TestApp::new(IssuancePolicy::Reuse);

    let (status, body) = app.get_json(ALICE, "/keys").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expiresIn"], "24 hours");
    let key = body["key"].as_str().unwrap();
    assert_eq!(key.len(), 32);

    let (status, movies) = app.get_json(ALICE, &format!("/api/{key}/movies")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movies.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn key_from_another_address_is_unauthorized() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    let key = app.issue(ALICE).await;

    let (status, body) = app.get_json(BOB, &format!("/api/{key}/movies")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid, expired key, or wrong source address");
}

#[tokio::test]
async fn unknown_key_is_unauthorized_on_every_protected_route() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    app.issue(ALICE).await;

    for uri in ["/api/nope/movies", "/api/nope/mangas"] {
        let (status, body) = app.get_json(ALICE, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "invalid, expired key, or wrong source address");
    }
}

#[tokio::test]
async fn expired_key_is_unauthorized() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    app.store
        .insert(NewApiKey {
            secret: "expiredexpiredexpiredexpired0000".to_string(),
            requester: "1.2.3.4".to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        })
        .await
        .unwrap();

    let (status, _) = app
        .get_json(ALICE, "/api/expiredexpiredexpiredexpired0000/movies")
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reuse_policy_returns_same_key() {
    let app = TestApp::new(IssuancePolicy::Reuse);

    let first = app.issue(ALICE).await;
    let second = app.issue(ALICE).await;
    let other = app.issue(BOB).await;

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[tokio::test]
async fn reject_policy_refuses_second_key() {
    let app = TestApp::new(IssuancePolicy::Reject);
    let first = app.issue(ALICE).await;

    let (status, body) = app.get_json(ALICE, "/keys").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "an active key already exists for this address");

    let keys = app.store.list_by_requester("1.2.3.4").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].secret, first);
}

#[tokio::test]
async fn listing_shows_only_callers_keys_including_expired() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    app.store
        .insert(NewApiKey {
            secret: "0000000000000000000000000000dead".to_string(),
            requester: "1.2.3.4".to_string(),
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();
    let active = app.issue(ALICE).await;
    app.issue(BOB).await;

    let (status, body) = app.get_json(ALICE, "/keys/mine").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], 1);
    assert_eq!(entries[0]["key"], "0000000000000000000000000000dead");
    assert_eq!(entries[1]["key"], active.as_str());
    assert!(entries.iter().all(|e| e["ip"] == "1.2.3.4"));

    let (_, again) = app.get_json(ALICE, "/keys/mine").await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn movie_filters_are_applied() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    let key = app.issue(ALICE).await;

    let (_, by_title) = app.get_json(ALICE, &format!("/api/{key}/movies?q=matrix")).await;
    assert_eq!(by_title.as_array().unwrap().len(), 1);
    assert_eq!(by_title[0]["title"], "The Matrix");

    let (_, by_id) = app.get_json(ALICE, &format!("/api/{key}/movies?id=2&q=matrix")).await;
    assert_eq!(by_id.as_array().unwrap().len(), 1);
    assert_eq!(by_id[0]["title"], "Alien");

    let (_, missing) = app.get_json(ALICE, &format!("/api/{key}/movies?id=99")).await;
    assert!(missing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_movie_filters_never_reject_the_request() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    let key = app.issue(ALICE).await;

    // Blank id falls back to the title search, then to the full list
    let (status, blank_id) = app
        .get_json(ALICE, &format!("/api/{key}/movies?id=&q=matrix"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blank_id.as_array().unwrap().len(), 1);
    assert_eq!(blank_id[0]["title"], "The Matrix");

    let (status, all) = app.get_json(ALICE, &format!("/api/{key}/movies?id=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    // Non-numeric id matches nothing
    let (status, none) = app
        .get_json(ALICE, &format!("/api/{key}/movies?id=abc&q=matrix"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(none.as_array().unwrap().is_empty());

    // Surrounding whitespace in the title search is ignored
    let (status, trimmed) = app
        .get_json(ALICE, &format!("/api/{key}/movies?q=%20%20alien%20"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trimmed.as_array().unwrap().len(), 1);
    assert_eq!(trimmed[0]["title"], "Alien");

    let (status, blank_q) = app.get_json(ALICE, &format!("/api/{key}/movies?q=%20")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blank_q.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mangas_include_split_genres_and_chapters() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    let key = app.issue(ALICE).await;

    let (status, body) = app.get_json(ALICE, &format!("/api/{key}/mangas")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Berserk");
    assert_eq!(body[0]["genres"], serde_json::json!(["Action", "Dark Fantasy"]));
    assert_eq!(body[0]["chapters"][0]["id"], 10);
    assert_eq!(body[0]["chapters"][0]["images"], serde_json::json!(["p1.jpg", "p2.jpg"]));
}

#[tokio::test]
async fn forwarded_header_does_not_change_identity() {
    let app = TestApp::new(IssuancePolicy::Reuse);
    let key = app.issue(ALICE).await;

    let response = app
        .router_for(BOB)
        .oneshot(
            Request::builder()
                .uri(format!("/api/{key}/movies"))
                .header("X-Forwarded-For", "1.2.3.4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_pages_respond() {
    let app = TestApp::new(IssuancePolicy::Reuse);

    let (status, health) = app.get_json(ALICE, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, page) = app.get(ALICE, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("VaultMovies API"));
}
