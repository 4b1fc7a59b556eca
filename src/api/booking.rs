//! Venue, artist and show booking site.
//!
//! Handlers build a template context and hand it to the configured
//! [`Renderer`](super::render::Renderer). Failures render an error page
//! instead of the requested one.

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::entity::{ArtistForm, FormPairs, ShowForm, VenueForm};
use crate::error::{Result, ShowquizError};

const UNKNOWN_VENUE: &str = "Removed/Unknown venue";

const VENUE_FIELDS: &[&str] = &[
    "name",
    "city",
    "state",
    "address",
    "phone",
    "genres",
    "image_link",
    "facebook_link",
    "website",
    "seeking_talent",
    "seeking_description",
];

const ARTIST_FIELDS: &[&str] = &[
    "name",
    "city",
    "state",
    "phone",
    "genres",
    "image_link",
    "facebook_link",
    "website",
    "seeking_venue",
    "seeking_description",
];

const SHOW_FIELDS: &[&str] = &["artist_id", "venue_id", "start_time"];

pub fn booking_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search_venues))
        .route("/venues/create", get(new_venue_form).post(create_venue))
        .route("/venues/{id}", get(show_venue).delete(delete_venue))
        .route("/venues/{id}/edit", get(edit_venue_form).post(edit_venue))
        .route("/artists", get(list_artists))
        .route("/artists/search", post(search_artists))
        .route("/artists/create", get(new_artist_form).post(create_artist))
        .route("/artists/{id}", get(show_artist))
        .route("/artists/{id}/edit", get(edit_artist_form).post(edit_artist))
        .route("/shows", get(list_shows))
        .route("/shows/create", get(new_show_form).post(create_show))
        .fallback(page_not_found)
        .with_state(state)
}

/// A template to render with its context and response status.
#[derive(Debug, Clone)]
pub struct Page {
    pub template: &'static str,
    pub context: Value,
    pub status: StatusCode,
}

impl Page {
    pub fn new(template: &'static str, context: Value) -> Self {
        Self {
            template,
            context,
            status: StatusCode::OK,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    fn home(flash: String, status: StatusCode) -> Self {
        Self::new("pages/home.html", json!({ "flash": flash })).with_status(status)
    }

    /// Error page for a failed request.
    fn for_error(err: &ShowquizError) -> Self {
        match err {
            ShowquizError::NotFound(what) => {
                Self::new("errors/404.html", json!({ "message": format!("{} not found", what) }))
                    .with_status(StatusCode::NOT_FOUND)
            }
            ShowquizError::Validation(message) => {
                Self::new("errors/400.html", json!({ "message": message }))
                    .with_status(StatusCode::BAD_REQUEST)
            }
            other => {
                error!(error = %other, "page request failed");
                Self::new("errors/500.html", json!({})).with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn render(state: &AppState, page: Page) -> Response {
    match state.renderer.render(page.template, &page.context) {
        Ok(body) => (page.status, [(CONTENT_TYPE, state.renderer.content_type())], body).into_response(),
        Err(e) => {
            error!(template = page.template, error = %e, "template rendering failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn respond(state: &AppState, result: Result<Page>) -> Response {
    match result {
        Ok(page) => render(state, page),
        Err(err) => render(state, Page::for_error(&err)),
    }
}

/// Status for a failed create: client mistakes are 400, the rest 500.
fn failure_status(err: &ShowquizError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn form_error(rejection: FormRejection) -> ShowquizError {
    ShowquizError::validation(format!("Unreadable form: {}", rejection))
}

type IdPath = std::result::Result<Path<i64>, PathRejection>;

/// A non-numeric id names no record, so it is a missing page.
fn record_id(path: IdPath, kind: &str) -> Result<i64> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!(error = %rejection, "unparseable {} id", kind);
        ShowquizError::not_found(kind.to_string())
    })
}

async fn home(State(state): State<AppState>) -> Response {
    render(&state, Page::new("pages/home.html", json!({})))
}

async fn page_not_found(State(state): State<AppState>) -> Response {
    render(
        &state,
        Page::for_error(&ShowquizError::not_found("page")),
    )
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub search_term: Option<String>,
}

// ============================================================================
// Venues
// ============================================================================

async fn list_venues(State(state): State<AppState>) -> Response {
    let result = {
        let db = state.db.lock().await;
        db.venue_areas(Utc::now())
            .map(|areas| Page::new("pages/venues.html", json!({ "areas": areas })))
    };
    respond(&state, result)
}

async fn search_venues(
    State(state): State<AppState>,
    form: std::result::Result<Form<SearchForm>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(form)) => {
            let term = form.search_term.unwrap_or_default();
            let db = state.db.lock().await;
            let now = Utc::now();
            db.search_venues(&term).and_then(|venues| {
                let data = venues
                    .iter()
                    .map(|v| -> Result<Value> {
                        let upcoming = db.upcoming_show_count_for_venue(v.id, now)?;
                        Ok(json!({
                            "id": v.id,
                            "name": v.name,
                            "num_upcoming_shows": upcoming,
                        }))
                    })
                    .collect::<Result<Vec<Value>>>()?;
                Ok(Page::new(
                    "pages/search_venues.html",
                    json!({
                        "results": { "count": data.len(), "data": data },
                        "search_term": term,
                    }),
                ))
            })
        }
        Err(rejection) => Err(form_error(rejection)),
    };
    respond(&state, result)
}

async fn show_venue(State(state): State<AppState>, path: IdPath) -> Response {
    let result = match record_id(path, "venue") {
        Ok(id) => {
            let db = state.db.lock().await;
            db.venue_profile(id, Utc::now())
                .map(|profile| Page::new("pages/show_venue.html", json!({ "venue": profile })))
        }
        Err(e) => Err(e),
    };
    respond(&state, result)
}

async fn new_venue_form(State(state): State<AppState>) -> Response {
    render(
        &state,
        Page::new("forms/new_venue.html", json!({ "fields": VENUE_FIELDS })),
    )
}

async fn create_venue(
    State(state): State<AppState>,
    form: std::result::Result<Form<FormPairs>, FormRejection>,
) -> Response {
    let (name, result) = match form {
        Ok(Form(pairs)) => {
            let form = VenueForm::from_pairs(&pairs);
            let name = form.name.clone().unwrap_or_default();
            let result = match form.into_venue(0) {
                Ok(venue) => state.db.lock().await.insert_venue(&venue),
                Err(e) => Err(e),
            };
            (name, result)
        }
        Err(rejection) => (String::new(), Err(form_error(rejection))),
    };

    let page = match result {
        Ok(venue) => {
            info!(id = venue.id, name = %venue.name, "venue listed");
            Page::home(
                format!("Venue {} was successfully listed!", venue.name),
                StatusCode::OK,
            )
        }
        Err(err) => {
            warn!(error = %err, "venue could not be listed");
            Page::home(
                format!("An error occurred. Venue {} could not be listed.", name),
                failure_status(&err),
            )
        }
    };
    render(&state, page)
}

async fn edit_venue_form(State(state): State<AppState>, path: IdPath) -> Response {
    let result = match record_id(path, "venue") {
        Ok(id) => {
            let db = state.db.lock().await;
            db.get_venue(id).and_then(|venue| {
                let venue =
                    venue.ok_or_else(|| ShowquizError::not_found(format!("venue {}", id)))?;
                Ok(Page::new(
                    "forms/edit_venue.html",
                    json!({ "fields": VENUE_FIELDS, "venue": venue }),
                ))
            })
        }
        Err(e) => Err(e),
    };
    respond(&state, result)
}

async fn edit_venue(
    State(state): State<AppState>,
    path: IdPath,
    form: std::result::Result<Form<FormPairs>, FormRejection>,
) -> Response {
    let id = match record_id(path, "venue") {
        Ok(id) => id,
        Err(err) => return respond(&state, Err(err)),
    };
    let result = match form {
        Ok(Form(pairs)) => match VenueForm::from_pairs(&pairs).into_venue(id) {
            Ok(venue) => state.db.lock().await.update_venue(&venue),
            Err(e) => Err(e),
        },
        Err(rejection) => Err(form_error(rejection)),
    };

    match result {
        Ok(()) => {
            info!(id, "venue updated");
            Redirect::to(&format!("/venues/{}", id)).into_response()
        }
        Err(err) => respond(&state, Err(err)),
    }
}

/// Answers with a redirect hint for the client script.
async fn delete_venue(State(state): State<AppState>, path: IdPath) -> Response {
    let result = match record_id(path, "venue") {
        Ok(id) => state.db.lock().await.delete_venue(id),
        Err(e) => Err(e),
    };
    match result {
        Ok(venue) => {
            let id = venue.id;
            info!(id, name = %venue.name, "venue deleted");
            Json(json!({ "location": "/" })).into_response()
        }
        Err(err) => {
            warn!(error = %err, "venue could not be deleted");
            (failure_status(&err), Json(json!({ "location": "" }))).into_response()
        }
    }
}

// ============================================================================
// Artists
// ============================================================================

async fn list_artists(State(state): State<AppState>) -> Response {
    let result = {
        let db = state.db.lock().await;
        db.artist_summaries(Utc::now())
            .map(|artists| Page::new("pages/artists.html", json!({ "artists": artists })))
    };
    respond(&state, result)
}

async fn search_artists(
    State(state): State<AppState>,
    form: std::result::Result<Form<SearchForm>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(form)) => {
            let term = form.search_term.unwrap_or_default();
            let db = state.db.lock().await;
            db.search_artists(&term).map(|artists| {
                let data: Vec<Value> = artists
                    .iter()
                    .map(|a| json!({ "id": a.id, "name": a.name }))
                    .collect();
                Page::new(
                    "pages/search_artists.html",
                    json!({
                        "results": { "count": data.len(), "data": data },
                        "search_term": term,
                    }),
                )
            })
        }
        Err(rejection) => Err(form_error(rejection)),
    };
    respond(&state, result)
}

async fn show_artist(State(state): State<AppState>, path: IdPath) -> Response {
    let result = match record_id(path, "artist") {
        Ok(id) => {
            let db = state.db.lock().await;
            db.artist_profile(id, Utc::now())
                .map(|profile| Page::new("pages/show_artist.html", json!({ "artist": profile })))
        }
        Err(e) => Err(e),
    };
    respond(&state, result)
}

async fn new_artist_form(State(state): State<AppState>) -> Response {
    render(
        &state,
        Page::new("forms/new_artist.html", json!({ "fields": ARTIST_FIELDS })),
    )
}

async fn create_artist(
    State(state): State<AppState>,
    form: std::result::Result<Form<FormPairs>, FormRejection>,
) -> Response {
    let (name, result) = match form {
        Ok(Form(pairs)) => {
            let form = ArtistForm::from_pairs(&pairs);
            let name = form.name.clone().unwrap_or_default();
            let result = match form.into_artist(0) {
                Ok(artist) => state.db.lock().await.insert_artist(&artist),
                Err(e) => Err(e),
            };
            (name, result)
        }
        Err(rejection) => (String::new(), Err(form_error(rejection))),
    };

    let page = match result {
        Ok(artist) => {
            info!(id = artist.id, name = %artist.name, "artist listed");
            Page::home(
                format!("Artist {} was successfully listed!", artist.name),
                StatusCode::OK,
            )
        }
        Err(err) => {
            warn!(error = %err, "artist could not be listed");
            Page::home(
                format!("An error occurred. Artist {} could not be listed.", name),
                failure_status(&err),
            )
        }
    };
    render(&state, page)
}

async fn edit_artist_form(State(state): State<AppState>, path: IdPath) -> Response {
    let result = match record_id(path, "artist") {
        Ok(id) => {
            let db = state.db.lock().await;
            db.get_artist(id).and_then(|artist| {
                let artist =
                    artist.ok_or_else(|| ShowquizError::not_found(format!("artist {}", id)))?;
                Ok(Page::new(
                    "forms/edit_artist.html",
                    json!({ "fields": ARTIST_FIELDS, "artist": artist }),
                ))
            })
        }
        Err(e) => Err(e),
    };
    respond(&state, result)
}

async fn edit_artist(
    State(state): State<AppState>,
    path: IdPath,
    form: std::result::Result<Form<FormPairs>, FormRejection>,
) -> Response {
    let id = match record_id(path, "artist") {
        Ok(id) => id,
        Err(err) => return respond(&state, Err(err)),
    };
    let result = match form {
        Ok(Form(pairs)) => match ArtistForm::from_pairs(&pairs).into_artist(id) {
            Ok(artist) => state.db.lock().await.update_artist(&artist),
            Err(e) => Err(e),
        },
        Err(rejection) => Err(form_error(rejection)),
    };

    match result {
        Ok(()) => {
            info!(id, "artist updated");
            Redirect::to(&format!("/artists/{}", id)).into_response()
        }
        Err(err) => respond(&state, Err(err)),
    }
}

// ============================================================================
// Shows
// ============================================================================

async fn list_shows(State(state): State<AppState>) -> Response {
    let result = {
        let db = state.db.lock().await;
        db.list_shows().map(|listings| {
            let shows: Vec<Value> = listings
                .into_iter()
                .map(|l| {
                    json!({
                        "venue_id": l.venue_id,
                        "venue_name": l.venue_name.unwrap_or_else(|| UNKNOWN_VENUE.to_string()),
                        "artist_id": l.artist_id,
                        "artist_name": l.artist_name,
                        "artist_image_link": l.artist_image_link,
                        "start_time": l.start_time,
                    })
                })
                .collect();
            Page::new("pages/shows.html", json!({ "shows": shows }))
        })
    };
    respond(&state, result)
}

async fn new_show_form(State(state): State<AppState>) -> Response {
    render(
        &state,
        Page::new("forms/new_show.html", json!({ "fields": SHOW_FIELDS })),
    )
}

async fn create_show(
    State(state): State<AppState>,
    form: std::result::Result<Form<ShowForm>, FormRejection>,
) -> Response {
    let result = match form {
        Ok(Form(form)) => match form.validate() {
            Ok(new) => state.db.lock().await.insert_show(&new),
            Err(e) => Err(e),
        },
        Err(rejection) => Err(form_error(rejection)),
    };

    let page = match result {
        Ok(show) => {
            info!(id = show.id, artist_id = show.artist_id, "show listed");
            Page::home("Show was successfully listed!".to_string(), StatusCode::OK)
        }
        Err(err) => {
            warn!(error = %err, "show could not be listed");
            Page::home(
                "An error occurred. Show could not be listed.".to_string(),
                failure_status(&err),
            )
        }
    };
    render(&state, page)
}
