//! HTTP surface: the trivia JSON API and the booking site.
//!
//! Both routers share [`AppState`], which holds the single SQLite connection
//! behind an async mutex. Handlers lock it for the span of their queries.

pub mod booking;
pub mod error;
pub mod render;
pub mod trivia;

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::selector::QUESTIONS_PER_PAGE;
use crate::storage::Database;
use render::{JsonRenderer, Renderer};

pub use booking::booking_router;
pub use trivia::trivia_router;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub renderer: Arc<dyn Renderer>,
    pub questions_per_page: usize,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            renderer: Arc::new(JsonRenderer),
            questions_per_page: QUESTIONS_PER_PAGE,
        }
    }

    pub fn with_questions_per_page(mut self, per_page: usize) -> Self {
        self.questions_per_page = per_page.max(1);
        self
    }
}

/// Bind `addr` and serve `router` until Ctrl-C.
pub async fn serve(router: Router, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
