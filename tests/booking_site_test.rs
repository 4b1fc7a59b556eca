use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::Value;
use showquiz::api::booking_router;
use showquiz::entity::{Artist, NewShow, Venue};
use showquiz::{AppState, Database};
use tower::ServiceExt;

fn venue(name: &str, city: &str) -> Venue {
    Venue {
        id: 0,
        name: name.to_string(),
        city: city.to_string(),
        state: "CA".to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: "123-123-1234".to_string(),
        genres: vec!["Jazz".to_string()],
        image_link: None,
        facebook_link: None,
        website: None,
        seeking_talent: false,
        seeking_description: None,
    }
}

fn artist(name: &str) -> Artist {
    Artist {
        id: 0,
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: "326-123-5000".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        image_link: None,
        facebook_link: None,
        website: None,
        seeking_venue: true,
        seeking_description: None,
    }
}

/// One venue and one artist with a past and an upcoming show there.
fn seeded_state() -> AppState {
    let db = Database::open_in_memory().unwrap();
    let hop = db.insert_venue(&venue("The Musical Hop", "San Francisco")).unwrap();
    db.insert_venue(&venue("The Dueling Pianos Bar", "Oakland")).unwrap();
    let band = db.insert_artist(&artist("Guns N Petals")).unwrap();
    for offset in [-30, 30] {
        db.insert_show(&NewShow {
            artist_id: band.id,
            venue_id: Some(hop.id),
            start_time: Utc::now() + Duration::days(offset),
        })
        .unwrap();
    }
    AppState::new(db)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_home_page() {
    let router = booking_router(seeded_state());
    let (status, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "pages/home.html");
}

#[tokio::test]
async fn test_venues_grouped_by_area() {
    let router = booking_router(seeded_state());
    let (status, body) = send(&router, get("/venues")).await;

    assert_eq!(status, StatusCode::OK);
    let areas = body["context"]["areas"].as_array().unwrap();
    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0]["city"], "San Francisco");
    assert_eq!(areas[0]["venues"][0]["num_upcoming_shows"], 1);
    assert_eq!(areas[1]["venues"][0]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_show_venue_splits_upcoming_and_past() {
    let router = booking_router(seeded_state());
    let (status, body) = send(&router, get("/venues/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "pages/show_venue.html");
    let venue = &body["context"]["venue"];
    assert_eq!(venue["name"], "The Musical Hop");
    assert_eq!(venue["upcoming_shows_count"], 1);
    assert_eq!(venue["past_shows_count"], 1);
    assert_eq!(venue["upcoming_shows"][0]["artist_name"], "Guns N Petals");
}

#[tokio::test]
async fn test_unknown_venue_renders_404_page() {
    let router = booking_router(seeded_state());
    let (status, body) = send(&router, get("/venues/999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["template"], "errors/404.html");
}

#[tokio::test]
async fn test_search_venues() {
    let router = booking_router(seeded_state());
    let (status, body) = send(&router, post_form("/venues/search", "search_term=hop")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["results"]["count"], 1);
    assert_eq!(body["context"]["results"]["data"][0]["name"], "The Musical Hop");
    assert_eq!(body["context"]["search_term"], "hop");
}

#[tokio::test]
async fn test_create_venue() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let (status, body) = send(
        &router,
        post_form(
            "/venues/create",
            "name=Park+Square&city=San+Francisco&state=CA&address=34+Whiskey+Moore+Ave\
             &phone=415-000-1234&genres=Rock%2C+Folk&seeking_talent=y",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["flash"], "Venue Park Square was successfully listed!");

    let venues = state.db.lock().await.search_venues("park").unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].genres, vec!["Rock", "Folk"]);
    assert!(venues[0].seeking_talent);
}

#[tokio::test]
async fn test_create_venue_missing_field_flashes_error() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let (status, body) = send(&router, post_form("/venues/create", "name=Half+Done&city=Nowhere")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["context"]["flash"],
        "An error occurred. Venue Half Done could not be listed."
    );
    assert!(state.db.lock().await.search_venues("Half").unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_venue_redirects() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let response = router
        .clone()
        .oneshot(post_form(
            "/venues/2/edit",
            "name=The+Renamed+Bar&city=Oakland&state=CA&address=335+Delancey&phone=914-003-1132&genres=Classical",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/venues/2");
    let venue = state.db.lock().await.get_venue(2).unwrap().unwrap();
    assert_eq!(venue.name, "The Renamed Bar");
}

#[tokio::test]
async fn test_delete_venue_returns_redirect_hint() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let request = Request::builder()
        .method("DELETE")
        .uri("/venues/1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "/");

    // Its shows survive without a venue
    let (_, body) = send(&router, get("/shows")).await;
    let shows = body["context"]["shows"].as_array().unwrap();
    assert_eq!(shows.len(), 2);
    assert!(shows.iter().all(|s| s["venue_name"] == "Removed/Unknown venue"));

    let request = Request::builder()
        .method("DELETE")
        .uri("/venues/1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["location"], "");
}

#[tokio::test]
async fn test_artists_pages() {
    let router = booking_router(seeded_state());

    let (_, body) = send(&router, get("/artists")).await;
    assert_eq!(body["context"]["artists"][0]["name"], "Guns N Petals");

    let (_, body) = send(&router, post_form("/artists/search", "search_term=PETALS")).await;
    assert_eq!(body["context"]["results"]["count"], 1);

    let (status, body) = send(&router, get("/artists/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["artist"]["upcoming_shows_count"], 1);
    assert_eq!(body["context"]["artist"]["past_shows"][0]["venue_name"], "The Musical Hop");
}

#[tokio::test]
async fn test_create_artist_and_show() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let (status, body) = send(
        &router,
        post_form(
            "/artists/create",
            "name=Matt+Quevedo&city=New+York&state=NY&phone=300-400-5000&genres=Jazz",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["flash"], "Artist Matt Quevedo was successfully listed!");

    let (status, body) = send(
        &router,
        post_form("/shows/create", "artist_id=2&venue_id=1&start_time=2099-06-15+20%3A00%3A00"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["flash"], "Show was successfully listed!");

    let (status, body) = send(
        &router,
        post_form("/shows/create", "artist_id=77&start_time=2099-06-15+20%3A00%3A00"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["context"]["flash"], "An error occurred. Show could not be listed.");

    assert_eq!(state.db.lock().await.list_shows().unwrap().len(), 3);
}

#[tokio::test]
async fn test_forms_render() {
    let router = booking_router(seeded_state());

    let (_, body) = send(&router, get("/venues/create")).await;
    assert_eq!(body["template"], "forms/new_venue.html");

    let (_, body) = send(&router, get("/artists/1/edit")).await;
    assert_eq!(body["template"], "forms/edit_artist.html");
    assert_eq!(body["context"]["artist"]["name"], "Guns N Petals");

    let (status, _) = send(&router, get("/artists/42/edit")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_venue_with_multi_select_genres() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let (status, body) = send(
        &router,
        post_form(
            "/venues/create",
            "name=Swing+Hall&city=Oakland&state=CA&address=1+Lake+St\
             &phone=510-000-1234&genres=Jazz&genres=Swing",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"]["flash"], "Venue Swing Hall was successfully listed!");
    let venues = state.db.lock().await.search_venues("swing hall").unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].genres, vec!["Jazz", "Swing"]);
}

#[tokio::test]
async fn test_edit_artist_with_multi_select_genres() {
    let state = seeded_state();
    let router = booking_router(state.clone());

    let response = router
        .clone()
        .oneshot(post_form(
            "/artists/1/edit",
            "name=Guns+N+Petals&city=San+Francisco&state=CA&phone=326-123-5000\
             &genres=Rock+n+Roll&genres=Blues",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let artist = state.db.lock().await.get_artist(1).unwrap().unwrap();
    assert_eq!(artist.genres, vec!["Rock n Roll", "Blues"]);
}

#[tokio::test]
async fn test_non_numeric_ids_render_404_page() {
    let router = booking_router(seeded_state());

    for uri in ["/venues/abc", "/venues/abc/edit", "/artists/abc", "/artists/abc/edit"] {
        let (status, body) = send(&router, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["template"], "errors/404.html", "{}", uri);
    }

    let request = Request::builder()
        .method("DELETE")
        .uri("/venues/abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["location"], "");
}
