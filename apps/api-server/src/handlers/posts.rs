//! Post handlers: create, read, author listing and proximity search.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use geopost_core::domain::{Coordinates, Post};
use geopost_core::error::DomainError;
use geopost_core::proximity::ProximityMatches;
use geopost_shared::dto::{CreatePostRequest, NearbyResponse, PostCreatedResponse, PostResponse};

use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        post_id: post.id,
        author_google_id: post.author_id,
        title: post.title,
        content: post.content,
        longitude: post.longitude,
        latitude: post.latitude,
        created_at: post.created_at,
    }
}

/// POST /v1/posts - gated behind the authenticated-user extractor.
pub async fn create_post(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = Post::new(
        user.subject_id.clone(),
        req.title,
        req.content,
        req.longitude,
        req.latitude,
    );

    let post_id = state.store.create(post).await?;
    tracing::debug!(author_id = %user.subject_id, %post_id, "post created");

    Ok(HttpResponse::Created().json(PostCreatedResponse {
        message: format!("Post {post_id} added by user {}", user.subject_id),
        post_id,
        author_id: user.subject_id,
    }))
}

/// GET /v1/posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    // Ids are opaque to clients; a value that does not parse cannot be
    // stored, so it gets the same 404 as an unknown id.
    let not_found = || AppError::from(DomainError::PostNotFound(raw_id.clone()));
    let id = Uuid::parse_str(&raw_id).map_err(|_| not_found())?;

    let post = state.store.get(id).await?.ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    #[serde(alias = "radius_in_kilometers")]
    radius: Option<f64>,
}

/// GET /v1/posts/{longitude}/{latitude}
pub async fn get_posts_nearby(
    state: web::Data<AppState>,
    path: web::Path<(f64, f64)>,
    query: web::Query<NearbyQuery>,
) -> AppResult<HttpResponse> {
    let (longitude, latitude) = path.into_inner();
    let radius_km = query.radius.unwrap_or(state.default_radius_km);
    let center = Coordinates {
        longitude,
        latitude,
    };

    // Bound the scan; dropping the timed-out future cancels the cursor.
    let matches = tokio::time::timeout(
        state.scan_timeout,
        state
            .proximity
            .find_within_radius(state.store.as_ref(), center, radius_km),
    )
    .await
    .map_err(|_| AppError::ScanTimeout)??;

    let body = match matches {
        ProximityMatches::Records(posts) => NearbyResponse::Posts {
            posts: posts.into_iter().map(post_response).collect(),
        },
        ProximityMatches::Ids(post_ids) => NearbyResponse::PostIds { post_ids },
    };

    Ok(HttpResponse::Ok().json(body))
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    author: String,
}

/// GET /v1/posts?author=<id>
pub async fn list_by_author(
    state: web::Data<AppState>,
    query: web::Query<AuthorQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.store.list_by_author(&query.author).await?;

    Ok(HttpResponse::Ok().json(posts.into_iter().map(post_response).collect::<Vec<_>>()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use async_trait::async_trait;

    use geopost_core::domain::Post;
    use geopost_core::error::AuthError;
    use geopost_core::ports::{PostStore, TokenVerifier, VerifiedIdentity};
    use geopost_core::proximity::StrategyKind;
    use geopost_infra::store::MemoryPostStore;

    use crate::handlers::configure_routes;
    use crate::middleware::error::AppError;
    use crate::state::AppState;

    /// Verifier accepting a fixed set of test tokens.
    struct StubVerifier {
        identities: HashMap<String, VerifiedIdentity>,
    }

    #[async_trait]
    impl TokenVerifier for StubVerifier {
        async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
            self.identities
                .get(token)
                .cloned()
                .ok_or_else(|| AuthError::TokenInvalid("unknown test token".to_string()))
        }
    }

    fn identity(subject: &str) -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: subject.to_string(),
            name: Some("Test User".to_string()),
            email: Some("test@example.com".to_string()),
            issued_at: 1_700_000_000,
            expires_at: 1_700_003_600,
        }
    }

    async fn registered_store() -> Arc<MemoryPostStore> {
        let store = Arc::new(MemoryPostStore::new());
        store.register_account("g-registered").await;
        store
    }

    fn state_with(store: Arc<MemoryPostStore>, strategy: StrategyKind) -> AppState {
        let mut identities = HashMap::new();
        identities.insert("good-token".to_string(), identity("g-registered"));
        identities.insert("stranger-token".to_string(), identity("g-stranger"));

        AppState {
            store: store as Arc<dyn PostStore>,
            verifier: Arc::new(StubVerifier { identities }),
            proximity: strategy.build(),
            auth_header: "X-Forwarded-Authorization".to_string(),
            default_radius_km: 0.07,
            scan_timeout: Duration::from_secs(5),
        }
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::PathConfig::default().error_handler(|err, _req| {
                        AppError::BadRequest(err.to_string()).into()
                    }))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn create_body() -> serde_json::Value {
        serde_json::json!({
            "title": "A",
            "content": "first post",
            "longitude": 0.0,
            "latitude": 0.0,
        })
    }

    #[actix_web::test]
    async fn create_without_token_is_rejected() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/v1/posts")
            .set_json(create_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Token not provided");
    }

    #[actix_web::test]
    async fn create_with_unverifiable_token_is_rejected() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/v1/posts")
            .insert_header(("X-Forwarded-Authorization", "Bearer bogus"))
            .set_json(create_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Invalid token or user not signed up");
    }

    #[actix_web::test]
    async fn create_with_unregistered_subject_is_rejected() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/v1/posts")
            .insert_header(("X-Forwarded-Authorization", "Bearer stranger-token"))
            .set_json(create_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Invalid token or user not signed up");
    }

    #[actix_web::test]
    async fn create_then_read_back_roundtrip() {
        let store = registered_store().await;
        let state = state_with(store, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/v1/posts")
            .insert_header(("X-Forwarded-Authorization", "Bearer good-token"))
            .set_json(create_body())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: serde_json::Value = test::read_body_json(resp).await;
        // The gate hands the verified subject id to the handler.
        assert_eq!(created["author_id"], "g-registered");
        let post_id = created["post_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/v1/posts/{post_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let post: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(post["post_id"], post_id.as_str());
        assert_eq!(post["author_google_id"], "g-registered");
        assert_eq!(post["title"], "A");
        assert_eq!(post["longitude"], 0.0);
        assert_eq!(post["latitude"], 0.0);
    }

    #[actix_web::test]
    async fn unknown_post_id_is_a_404_naming_the_id() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let missing = uuid::Uuid::new_v4().to_string();
        let req = test::TestRequest::get()
            .uri(&format!("/v1/posts/{missing}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains(&missing));
    }

    #[actix_web::test]
    async fn unparsable_post_id_gets_the_same_404() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/v1/posts/not-a-real-id")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().contains("not-a-real-id"));
    }

    #[actix_web::test]
    async fn author_without_posts_gets_an_empty_list() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/v1/posts?author=g-nobody")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[actix_web::test]
    async fn author_listing_returns_their_posts() {
        let store = registered_store().await;
        store
            .create(Post::new(
                "g-registered".into(),
                "mine".into(),
                "content".into(),
                1.0,
                2.0,
            ))
            .await
            .unwrap();
        let state = state_with(store, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/v1/posts?author=g-registered")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "mine");
    }

    #[actix_web::test]
    async fn nearby_exact_finds_posts_at_the_reference_point() {
        let store = registered_store().await;
        store
            .create(Post::new(
                "g-registered".into(),
                "A".into(),
                "here".into(),
                0.0,
                0.0,
            ))
            .await
            .unwrap();
        let state = state_with(store, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/v1/posts/0.0/0.0?radius=0.07")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let posts = body["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["title"], "A");

        let req = test::TestRequest::get()
            .uri("/v1/posts/10.0/10.0?radius=0.07")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn nearby_bounding_box_returns_ids() {
        let store = registered_store().await;
        let id = store
            .create(Post::new(
                "g-registered".into(),
                "A".into(),
                "here".into(),
                0.0,
                0.0,
            ))
            .await
            .unwrap();
        let state = state_with(store, StrategyKind::BoundingBox);
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/v1/posts/0.0/0.0").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["post_ids"][0], id.to_string());

        let req = test::TestRequest::get()
            .uri("/v1/posts/10.0/10.0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn nearby_accepts_the_long_radius_parameter_name() {
        let store = registered_store().await;
        store
            .create(Post::new(
                "g-registered".into(),
                "A".into(),
                "here".into(),
                0.0,
                0.0,
            ))
            .await
            .unwrap();
        let state = state_with(store, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/v1/posts/0.0/0.0?radius_in_kilometers=0.07")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn non_numeric_coordinates_are_a_bad_request() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/v1/posts/abc/def")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn liveness_text_on_both_roots() {
        let state = state_with(registered_store().await, StrategyKind::Exact);
        let app = test_app!(state);

        for uri in ["/", "/v1"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body = test::read_body(resp).await;
            assert_eq!(body, actix_web::web::Bytes::from_static(b"Hello from GeoPost's post service"));
        }
    }
}
