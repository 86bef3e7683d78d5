use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use event_listing_app::domain::event::EventDraft;

use crate::error::ServiceError;

/// A create request body, resolved by its `Content-Type`.
pub enum EventPayload {
    Json(JsonEventPayload),
    Form(FormEventPayload),
}

impl EventPayload {
    pub fn into_draft(self) -> EventDraft {
        match self {
            EventPayload::Json(payload) => payload.into(),
            EventPayload::Form(payload) => payload.into(),
        }
    }
}

fn media_type(req: &Request) -> Option<String> {
    let value = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let media_type = value.split(';').next()?.trim().to_ascii_lowercase();
    Some(media_type)
}

impl<S> FromRequest<S> for EventPayload
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = media_type(&req).unwrap_or_default();

        if media_type == "application/json" || media_type.ends_with("+json") {
            // Only a broken form counts as a client error.
            let Json(payload) = Json::<JsonEventPayload>::from_request(req, state)
                .await
                .map_err(|e| {
                    log::error!("Failed to read JSON event payload: {}", e.body_text());
                    ServiceError::internal("Event creation failed", e.body_text())
                })?;
            return Ok(EventPayload::Json(payload));
        }

        if media_type == "multipart/form-data" {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ServiceError::MalformedForm(e.body_text()))?;
            return Ok(EventPayload::Form(FormEventPayload::read(multipart).await?));
        }

        Err(ServiceError::UnsupportedMediaType(if media_type.is_empty() {
            "Missing Content-Type, expected application/json or multipart/form-data".to_string()
        } else {
            format!(
                "'{}' is not supported, expected application/json or multipart/form-data",
                media_type
            )
        }))
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum JsonStringList {
    Many(Vec<String>),
    One(String),
}

impl From<JsonStringList> for Vec<String> {
    fn from(list: JsonStringList) -> Self {
        match list {
            JsonStringList::Many(items) => items,
            JsonStringList::One(item) => vec![item],
        }
    }
}

#[derive(serde::Deserialize, Default)]
pub struct JsonEventPayload {
    title: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    overview: Option<String>,
    image: Option<String>,
    venue: Option<String>,
    location: Option<String>,
    date: Option<String>,
    time: Option<String>,
    mode: Option<String>,
    audience: Option<String>,
    organizer: Option<String>,
    agenda: Option<JsonStringList>,
    tags: Option<JsonStringList>,
}

impl From<JsonEventPayload> for EventDraft {
    fn from(payload: JsonEventPayload) -> Self {
        EventDraft {
            title: payload.title,
            slug: payload.slug,
            description: payload.description,
            overview: payload.overview,
            image: payload.image,
            venue: payload.venue,
            location: payload.location,
            date: payload.date,
            time: payload.time,
            mode: payload.mode,
            audience: payload.audience,
            organizer: payload.organizer,
            agenda: payload.agenda.map(Vec::from).unwrap_or_default(),
            tags: payload.tags.map(Vec::from).unwrap_or_default(),
        }
    }
}

/// Text fields of a multipart form. Scalars keep the last value sent;
/// `agenda` and `tags` collect every value.
#[derive(Default, Debug)]
pub struct FormEventPayload {
    fields: HashMap<String, String>,
    agenda: Vec<String>,
    tags: Vec<String>,
}

impl FormEventPayload {
    async fn read(mut multipart: Multipart) -> Result<Self, ServiceError> {
        let mut payload = FormEventPayload::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServiceError::MalformedForm(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                return Err(ServiceError::MalformedForm(format!(
                    "File uploads are not supported for field '{}'",
                    name
                )));
            }
            let value = field
                .text()
                .await
                .map_err(|e| ServiceError::MalformedForm(e.body_text()))?;
            payload.push(name, value);
        }

        Ok(payload)
    }

    fn push(&mut self, name: String, value: String) {
        match name.as_str() {
            "agenda" => self.agenda.extend(expand_list_value(value)),
            "tags" => self.tags.extend(expand_list_value(value)),
            _ => {
                self.fields.insert(name, value);
            }
        }
    }
}

/// Clients often send a list as one field holding a JSON array.
fn expand_list_value(value: String) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items;
        }
    }
    vec![value]
}

impl From<FormEventPayload> for EventDraft {
    fn from(mut payload: FormEventPayload) -> Self {
        let mut take = |name: &str| payload.fields.remove(name);
        EventDraft {
            title: take("title"),
            slug: take("slug"),
            description: take("description"),
            overview: take("overview"),
            image: take("image"),
            venue: take("venue"),
            location: take("location"),
            date: take("date"),
            time: take("time"),
            mode: take("mode"),
            audience: take("audience"),
            organizer: take("organizer"),
            agenda: payload.agenda,
            tags: payload.tags,
        }
    }
}
