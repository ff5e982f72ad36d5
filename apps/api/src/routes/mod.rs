pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::contact::handlers as contact;
use crate::content::handlers::{
    handle_create, handle_delete, handle_get_singleton, handle_list_admin, handle_list_public,
    handle_portfolio, handle_reorder, handle_set_social_link_active, handle_update,
    handle_upsert_singleton,
};
use crate::content::repository::{Collection, Singleton};
use crate::errors::AppError;
use crate::media;
use crate::models::content::{
    AboutInfo, Achievement, Certificate, Education, Experience, PersonalInfo, Project, SocialLink,
};
use crate::realtime::handlers::handle_changes;
use crate::resume::handlers::{handle_resume_html, handle_resume_pdf};
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

/// Public read, admin list/create/update/delete/reorder for one ordered table.
fn with_collection<T: Collection>(router: Router<AppState>) -> Router<AppState> {
    let table = T::TABLE.as_str();
    router
        .route(&format!("/api/v1/{table}"), get(handle_list_public::<T>))
        .route(
            &format!("/api/v1/admin/{table}"),
            get(handle_list_admin::<T>).post(handle_create::<T>),
        )
        .route(
            &format!("/api/v1/admin/{table}/reorder"),
            post(handle_reorder::<T>),
        )
        .route(
            &format!("/api/v1/admin/{table}/:id"),
            put(handle_update::<T>).delete(handle_delete::<T>),
        )
}

/// Public read and admin save for a single-row table.
fn with_singleton<T: Singleton>(router: Router<AppState>) -> Router<AppState> {
    let table = T::TABLE.as_str();
    router
        .route(&format!("/api/v1/{table}"), get(handle_get_singleton::<T>))
        .route(
            &format!("/api/v1/admin/{table}"),
            put(handle_upsert_singleton::<T>),
        )
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        // Public site
        .route("/api/v1/portfolio", get(handle_portfolio))
        .route("/api/v1/changes", get(handle_changes))
        .route("/api/v1/resume.pdf", get(handle_resume_pdf))
        .route("/api/v1/resume.html", get(handle_resume_html))
        .route("/api/v1/contact", post(contact::handle_submit_message))
        // Auth
        .route("/api/v1/auth/signin", post(auth::handle_sign_in))
        .route("/api/v1/auth/signup", post(auth::handle_sign_up))
        .route("/api/v1/auth/signout", post(auth::handle_sign_out))
        .route("/api/v1/auth/session", get(auth::handle_current_session))
        // Admin inbox and media
        .route("/api/v1/admin/messages", get(contact::handle_list_messages))
        .route(
            "/api/v1/admin/messages/:id",
            axum::routing::delete(contact::handle_delete_message),
        )
        .route(
            "/api/v1/admin/social_links/:id/active",
            patch(handle_set_social_link_active),
        )
        .route(
            "/api/v1/admin/media",
            post(media::handle_upload).layer(DefaultBodyLimit::max(media::UPLOAD_BODY_LIMIT)),
        );

    let router = with_singleton::<PersonalInfo>(router);
    let router = with_singleton::<AboutInfo>(router);
    let router = with_collection::<Experience>(router);
    let router = with_collection::<Project>(router);
    let router = with_collection::<Education>(router);
    let router = with_collection::<Certificate>(router);
    let router = with_collection::<Achievement>(router);
    let router = with_collection::<SocialLink>(router);

    router.fallback(not_found).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::models::admin::AdminIdentity;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn signed_in(state: &AppState) -> (AdminIdentity, String) {
        let admin = AdminIdentity {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
        };
        let issued = state
            .sessions
            .create(&admin, Duration::from_secs(60))
            .await
            .unwrap();
        (admin, issued.token)
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = build_router(AppState::for_tests());
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["service"], "portfolio-api");
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let app = build_router(AppState::for_tests());
        let req = Request::builder().uri("/unknown").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let state = AppState::for_tests();
        for (method, uri) in [
            ("GET", "/api/v1/admin/projects"),
            ("GET", "/api/v1/admin/messages"),
            ("DELETE", "/api/v1/admin/social_links/00000000-0000-0000-0000-000000000000"),
            ("PATCH", "/api/v1/admin/social_links/00000000-0000-0000-0000-000000000000/active"),
            ("GET", "/api/v1/auth/session"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let resp = build_router(state.clone()).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let app = build_router(AppState::for_tests());
        let req = Request::builder()
            .uri("/api/v1/admin/experiences")
            .header(header::AUTHORIZATION, "Bearer not-a-session")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_current_session_returns_identity() {
        let state = AppState::for_tests();
        let (admin, token) = signed_in(&state).await;
        let req = Request::builder()
            .uri("/api/v1/auth/session")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["email"], "admin@example.com");
        assert_eq!(body["id"], admin.id.to_string());
    }

    #[tokio::test]
    async fn test_sign_out_revokes_session() {
        let state = AppState::for_tests();
        let (_, token) = signed_in(&state).await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/signout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(state.sessions.lookup(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_admin_input_rejected_before_storage() {
        let state = AppState::for_tests();
        let (_, token) = signed_in(&state).await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/admin/achievements")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"","description":"d","icon_type":"rocket","date":"2024","category":"c"}"#,
            ))
            .unwrap();
        let resp = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        let fields: Vec<&str> = body["error"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"icon_type"));
    }

    #[tokio::test]
    async fn test_signup_disabled_by_default() {
        let app = build_router(AppState::for_tests());
        let req = json_request(
            "POST",
            "/api/v1/auth/signup",
            r#"{"email":"new@example.com","password":"longenough","confirm_password":"longenough"}"#,
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_contact_form_validates() {
        let app = build_router(AppState::for_tests());
        let req = json_request(
            "POST",
            "/api/v1/contact",
            r#"{"name":"Ada","email":"not-an-email","subject":"Hi","message":"Hello"}"#,
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["fields"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_changes_rejects_unknown_table() {
        let app = build_router(AppState::for_tests());
        let req = Request::builder()
            .uri("/api/v1/changes?tables=projects,passwords")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_changes_streams_events() {
        use crate::content::tables::ContentTable;
        use crate::realtime::feed::{ChangeEvent, ChangeOp};

        let state = AppState::for_tests();
        let req = Request::builder()
            .uri("/api/v1/changes?tables=projects")
            .body(Body::empty())
            .unwrap();
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );

        state.changes.publish(ChangeEvent {
            table: ContentTable::SocialLinks,
            op: ChangeOp::Insert,
            id: None,
        });
        state.changes.publish(ChangeEvent {
            table: ContentTable::Projects,
            op: ChangeOp::Update,
            id: None,
        });

        let mut body = resp.into_body();
        let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let chunk = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
        assert!(chunk.contains("event: projects"), "{chunk}");
        assert!(chunk.contains(r#""op":"update""#), "{chunk}");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_sign_in_rejects_unknown_email_and_wrong_password(pool: sqlx::PgPool) {
        crate::auth::handlers::create_admin(&pool, "admin@example.com", "correct horse")
            .await
            .unwrap();
        let state = AppState {
            db: pool,
            ..AppState::for_tests()
        };

        for body in [
            r#"{"email":"nobody@example.com","password":"correct horse"}"#,
            r#"{"email":"admin@example.com","password":"battery staple"}"#,
        ] {
            let resp = build_router(state.clone())
                .oneshot(json_request("POST", "/api/v1/auth/signin", body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{body}");
        }

        let resp = build_router(state.clone())
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/signin",
                r#"{"email":" Admin@Example.com ","password":"correct horse"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["admin"]["email"], "admin@example.com");
        assert_eq!(json["token"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_changes_streams_resync_after_listener_drop() {
        let state = AppState::for_tests();
        let req = Request::builder()
            .uri("/api/v1/changes?tables=projects")
            .body(Body::empty())
            .unwrap();
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // Resync bypasses the table filter.
        state.changes.publish_resync();

        let mut body = resp.into_body();
        let frame = tokio::time::timeout(Duration::from_secs(2), body.frame())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let chunk = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
        assert!(chunk.contains("event: resync"), "{chunk}");
        assert!(chunk.contains(r#""reason":"reconnected""#), "{chunk}");
    }
}
