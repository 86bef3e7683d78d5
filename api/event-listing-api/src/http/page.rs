use axum::{extract::State, response::Html};
use event_listing_app::domain::event::Event;

use crate::{error::ServiceError, http::AppState};

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Dev Events</title>
</head>
<body>
  <section id="hero">
    <h1>The Hub for Every Dev Event You Can't Miss</h1>
    <p>Hackathons, Meetups, and Conferences, All in One Place</p>
  </section>
  <section id="featured-events">
    <h3>Featured Events</h3>
    {% if events | length == 0 %}
    <p class="empty">No events yet.</p>
    {% else %}
    <ul class="events">
      {% for event in events %}
      <li class="event-card">
        <a href="{{ api_base | safe }}/api/event/{{ event.slug }}">
          <img src="{{ event.image }}" alt="{{ event.title }}" width="410" height="300">
          <p class="location">{{ event.location }}</p>
          <p class="title">{{ event.title }}</p>
          <div class="datetime">
            <time>{{ event.date }}</time>
            <time>{{ event.time }}</time>
          </div>
          <ul class="tags">
            {% for tag in event.tags %}<li>{{ tag }}</li>{% endfor %}
          </ul>
        </a>
      </li>
      {% endfor %}
    </ul>
    {% endif %}
  </section>
</body>
</html>
"#;

/// Server-rendered event listing that reads events through the public API.
pub struct ListingPage {
    client: reqwest::Client,
    base_url: String,
    templates: tera::Tera,
}

impl ListingPage {
    pub fn new(base_url: impl Into<String>) -> Result<Self, tera::Error> {
        let mut templates = tera::Tera::default();
        templates.add_raw_template("index.html", INDEX_TEMPLATE)?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            templates,
        })
    }

    pub async fn fetch_events(&self) -> Result<Vec<Event>, reqwest::Error> {
        self.client
            .get(format!("{}/api/event", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub fn render(&self, events: &[Event]) -> Result<String, tera::Error> {
        let mut context = tera::Context::new();
        context.insert("events", events);
        context.insert("api_base", &self.base_url);
        self.templates.render("index.html", &context)
    }
}

pub async fn index(State(app_state): State<AppState>) -> Result<Html<String>, ServiceError> {
    let events = match app_state.page.fetch_events().await {
        Ok(events) => events,
        Err(e) => {
            log::error!("Failed to load events for the listing page: {}", e);
            Vec::new()
        }
    };

    app_state
        .page
        .render(&events)
        .map(Html)
        .map_err(|e| ServiceError::internal("Failed to render page", e))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use event_listing_app::{build_application, testing::MockEventRepository};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::http::router;

    use super::*;

    #[test]
    fn test_render_cards() {
        let page = ListingPage::new("http://localhost:3000/").unwrap();
        let repository = MockEventRepository::default();
        let event = repository.seed("RustConf 2026");

        let html = page.render(&[event]).unwrap();
        assert!(html.contains("RustConf 2026"));
        assert!(html.contains("http://localhost:3000/api/event/rustconf-2026"));
        assert!(html.contains("<time>2026-03-05</time>"));
        assert!(html.contains("<time>09:00</time>"));
        assert!(html.contains("<li>systems</li>"));
        assert!(!html.contains("No events yet."));
    }

    #[test]
    fn test_render_escapes_markup() {
        let page = ListingPage::new("http://localhost:3000").unwrap();
        let repository = MockEventRepository::default();
        let mut event = repository.seed("RustConf 2026");
        event.details.title = "<script>alert(1)</script>".to_string();

        let html = page.render(&[event]).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_empty_state() {
        let page = ListingPage::new("http://localhost:3000").unwrap();
        let html = page.render(&[]).unwrap();
        assert!(html.contains("No events yet."));
    }

    #[tokio::test]
    async fn test_index_renders_when_api_is_unreachable() {
        let state = AppState {
            app: Arc::new(build_application(Arc::new(MockEventRepository::default()))),
            page: Arc::new(ListingPage::new("http://127.0.0.1:9").unwrap()),
        };
        let response = router(state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("No events yet."));
    }
}
