use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use event_listing_app::{
    domain::event::Event,
    workflow::events::{create::CreateEventError, get::GetEventError, list::ListEventsError},
};

use crate::{
    error::ServiceError,
    http::{AppState, payload::EventPayload},
};

#[derive(serde::Serialize)]
pub struct JsonCreatedEvent {
    message: String,
    event: Event,
}

pub async fn list_events(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Event>>, ServiceError> {
    let events = app_state
        .app
        .event_list_use_case
        .list_events()
        .await
        .map_err(|ListEventsError::RepositoryError(e)| {
            ServiceError::internal("Failed to fetch events", e)
        })?;

    Ok(Json(events))
}

pub async fn get_event(
    Path(slug): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Event>, ServiceError> {
    let event = app_state
        .app
        .event_get_use_case
        .get_event(&slug)
        .await
        .map_err(|GetEventError::RepositoryError(e)| {
            ServiceError::internal("Failed to fetch event", e)
        })?;

    match event {
        Some(event) => Ok(Json(event)),
        None => Err(ServiceError::NotFound(format!(
            "Event with slug '{}' not found",
            slug
        ))),
    }
}

pub async fn create_event(
    State(app_state): State<AppState>,
    payload: EventPayload,
) -> Result<(StatusCode, Json<JsonCreatedEvent>), ServiceError> {
    store_event(&app_state, payload).await
}

/// Same as [`create_event`], addressed through a collection path.
pub async fn create_event_in_collection(
    Path(collection_slug): Path<String>,
    State(app_state): State<AppState>,
    payload: EventPayload,
) -> Result<(StatusCode, Json<JsonCreatedEvent>), ServiceError> {
    log::debug!("Creating event in collection '{}'", collection_slug);
    store_event(&app_state, payload).await
}

async fn store_event(
    app_state: &AppState,
    payload: EventPayload,
) -> Result<(StatusCode, Json<JsonCreatedEvent>), ServiceError> {
    let draft = payload.into_draft();

    // Validation failures and duplicate slugs are reported as 500s.
    let event = app_state
        .app
        .event_create_use_case
        .create_event(draft)
        .await
        .map_err(|e| {
            match &e {
                CreateEventError::Validation(reason) => {
                    log::warn!("Event creation rejected: {}", reason)
                }
                CreateEventError::DuplicateSlug(_) | CreateEventError::Repository(_) => {
                    log::error!("Event creation failed: {}", e)
                }
            }
            ServiceError::internal("Event creation failed", e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(JsonCreatedEvent {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, header::CONTENT_TYPE},
    };
    use event_listing_app::{build_application, testing::MockEventRepository};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::http::{page::ListingPage, router};

    use super::*;

    const BOUNDARY: &str = "event-form-boundary";

    fn test_router(repository: Arc<MockEventRepository>) -> Router {
        let state = AppState {
            app: Arc::new(build_application(repository)),
            page: Arc::new(ListingPage::new("http://127.0.0.1:9").unwrap()),
        };
        router(state)
    }

    fn event_json(title: &str) -> Value {
        json!({
            "title": title,
            "description": "A day of talks about systems programming.",
            "overview": "Talks, workshops and a hallway track.",
            "image": "/images/event1.png",
            "venue": "Moscone Center",
            "location": "San Francisco, CA",
            "date": "2026/03/05",
            "time": "6pm",
            "mode": "hybrid",
            "audience": "Developers",
            "organizer": "Rust Foundation",
            "agenda": ["  ", "Keynote", "Talk 1"],
            "tags": ["rust"]
        })
    }

    fn multipart_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_event_from_json() {
        let repository = Arc::new(MockEventRepository::default());
        let (status, body) = send(
            test_router(repository.clone()),
            post_json("/api/event", &event_json("RustConf 2026")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Event created successfully");
        assert_eq!(body["event"]["slug"], "rustconf-2026");
        assert_eq!(body["event"]["date"], "2026-03-05");
        assert_eq!(body["event"]["time"], "18:00");
        assert_eq!(body["event"]["agenda"], json!(["Keynote", "Talk 1"]));
        assert!(body["event"]["createdAt"].is_string());
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_create_event_from_multipart_form() {
        let repository = Arc::new(MockEventRepository::default());
        let body = multipart_body(&[
            ("title", "EuroRust 2026"),
            ("description", "Rust in Europe"),
            ("overview", "Two days of talks"),
            ("image", "/images/event2.png"),
            ("venue", "Kulturhuset"),
            ("location", "Stockholm"),
            ("date", "October 9, 2026"),
            ("time", "9:30"),
            ("mode", "offline"),
            ("audience", "Rustaceans"),
            ("organizer", "Mainmatter"),
            ("agenda", r#"["Opening", "Workshops"]"#),
            ("tags", "rust"),
            ("tags", "europe"),
        ]);
        let request = Request::post("/api/event")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(test_router(repository), request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["event"]["slug"], "eurorust-2026");
        assert_eq!(body["event"]["date"], "2026-10-09");
        assert_eq!(body["event"]["time"], "09:30");
        assert_eq!(body["event"]["agenda"], json!(["Opening", "Workshops"]));
        assert_eq!(body["event"]["tags"], json!(["rust", "europe"]));
    }

    #[tokio::test]
    async fn test_create_in_collection_behaves_like_create() {
        let repository = Arc::new(MockEventRepository::default());
        let (status, body) = send(
            test_router(repository.clone()),
            post_json("/api/event/conferences", &event_json("RustConf 2026")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["event"]["slug"], "rustconf-2026");
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_plain_text_is_unsupported() {
        let repository = Arc::new(MockEventRepository::default());
        let request = Request::post("/api/event")
            .header(CONTENT_TYPE, "text/plain")
            .body(Body::from(event_json("RustConf 2026").to_string()))
            .unwrap();

        let (status, body) = send(test_router(repository.clone()), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].is_string());
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported() {
        let request = Request::post("/api/event")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _) = send(
            test_router(Arc::new(MockEventRepository::default())),
            request,
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_unparseable_form_is_bad_request() {
        let request = Request::post("/api/event")
            .header(CONTENT_TYPE, "multipart/form-data")
            .body(Body::from("title=RustConf"))
            .unwrap();
        let (status, body) = send(
            test_router(Arc::new(MockEventRepository::default())),
            request,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid form data");
    }

    #[tokio::test]
    async fn test_file_upload_is_bad_request() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\nContent-Type: image/png\r\n\r\nPNG\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::post("/api/event")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send(
            test_router(Arc::new(MockEventRepository::default())),
            request,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreadable_json_is_internal_error() {
        let repository = Arc::new(MockEventRepository::default());
        for body in ["{\"title\": ", "{\"title\": 5}"] {
            let request = Request::post("/api/event")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            let (status, body) = send(test_router(repository.clone()), request).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["message"], "Event creation failed");
        }
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_is_internal_error() {
        let repository = Arc::new(MockEventRepository::default());
        let mut payload = event_json("RustConf 2026");
        payload["agenda"] = json!(["   "]);

        let (status, body) = send(
            test_router(repository.clone()),
            post_json("/api/event", &payload),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Event creation failed");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("agenda must contain at least one item")
        );
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_title_is_internal_error() {
        let repository = Arc::new(MockEventRepository::default());
        let router = test_router(repository.clone());

        let (first, _) = send(
            router.clone(),
            post_json("/api/event", &event_json("RustConf 2026")),
        )
        .await;
        let (second, body) = send(
            router,
            post_json("/api/event", &event_json("RustConf 2026")),
        )
        .await;

        assert_eq!(first, StatusCode::CREATED);
        assert_eq!(second, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("rustconf-2026"));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_get_event_by_slug() {
        let repository = Arc::new(MockEventRepository::default());
        let seeded = repository.seed("RustConf 2026");

        let request = Request::get("/api/event/rustconf-2026")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_router(repository), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], seeded.id.to_string());
        assert_eq!(body["title"], "RustConf 2026");
    }

    #[tokio::test]
    async fn test_get_missing_event_is_not_found() {
        let repository = Arc::new(MockEventRepository::default());
        repository.seed("RustConf 2026");

        let request = Request::get("/api/event/unknown-event")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_router(repository), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.get("event").is_none());
        assert!(body.get("slug").is_none());
        assert!(body.get("title").is_none());
    }

    #[tokio::test]
    async fn test_list_events() {
        let repository = Arc::new(MockEventRepository::default());
        repository.seed("RustConf 2026");
        repository.seed("EuroRust 2026");

        let request = Request::get("/api/event").body(Body::empty()).unwrap();
        let (status, body) = send(test_router(repository), request).await;
        assert_eq!(status, StatusCode::OK);
        let slugs: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|event| event["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["eurorust-2026", "rustconf-2026"]);
    }

    #[tokio::test]
    async fn test_storage_failures_are_internal_errors() {
        let repository = Arc::new(MockEventRepository::failing());
        let router = test_router(repository);

        let (status, body) = send(
            router.clone(),
            Request::get("/api/event").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to fetch events");

        let (status, _) = send(
            router,
            Request::get("/api/event/rustconf-2026")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
