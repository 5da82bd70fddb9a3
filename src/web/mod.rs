pub mod handlers;
pub mod templates;
pub mod types;

pub use handlers::{AppContext, Page};

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use std::sync::Arc;

use types::{IndexForm, NotesForm};

type SharedContext = Arc<AppContext>;

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Html(html) => Html(html).into_response(),
            Page::Text { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    status,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    body,
                )
                    .into_response()
            }
        }
    }
}

/// Routes: the index form, its submission, note generation and a liveness probe.
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(index_handler).post(fetch_handler))
        .route("/release_notes", post(release_notes_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(Arc::new(ctx))
}

async fn index_handler(State(ctx): State<SharedContext>) -> Page {
    handlers::index(&ctx)
}

async fn fetch_handler(State(ctx): State<SharedContext>, Form(form): Form<IndexForm>) -> Page {
    handlers::fetch(&ctx, form).await
}

async fn release_notes_handler(
    State(ctx): State<SharedContext>,
    Form(form): Form<NotesForm>,
) -> Page {
    handlers::release_notes(&ctx, form).await
}

async fn healthz_handler() -> &'static str {
    "ok"
}
