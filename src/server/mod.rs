//! HTTP server for the blog pages
//!
//! Every request re-indexes the content directory, so edits show up on the
//! next page load without a restart.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::helpers::slug_from_path;
use crate::templates::PageRenderer;
use crate::Blog;

/// Server state
struct AppState {
    blog: Blog,
    pages: PageRenderer,
}

/// Outcome of rendering one page
enum Page {
    Found(String),
    NotFound(String),
}

/// Build the application router
pub fn router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(AppState {
        blog: blog.clone(),
        pages: PageRenderer::new(&blog.config)?,
    });

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/blog", get(blog_index_handler))
        .route("/blog/", get(blog_index_handler))
        .route("/blog/*slug", get(post_handler))
        .route("/roadmap", get(roadmap_handler))
        .nest_service("/static", ServeDir::new(&blog.static_dir))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the server and run until interrupted
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Serving posts from {}", blog.content_dir.display());
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    render_blocking(state, |s| {
        let posts = s.blog.index().list_posts()?;
        Ok(Page::Found(s.pages.render_home(&posts)?))
    })
    .await
}

async fn blog_index_handler(State(state): State<Arc<AppState>>) -> Response {
    render_blocking(state, |s| {
        let index = s.blog.index();
        let posts = index.list_posts()?;
        let groups = index.list_groups()?;
        Ok(Page::Found(s.pages.render_blog_index(&posts, &groups)?))
    })
    .await
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Response {
    render_blocking(state, move |s| {
        let segments = slug_from_path(&slug);
        match s.blog.index().get_post(&segments)? {
            Some(post) => Ok(Page::Found(s.pages.render_post(&post)?)),
            None => {
                tracing::debug!("No post for slug {:?}", segments);
                Ok(Page::NotFound(s.pages.render_not_found(uri.path())?))
            }
        }
    })
    .await
}

async fn roadmap_handler(State(state): State<Arc<AppState>>) -> Response {
    render_blocking(state, |s| {
        let roadmap = s.blog.read_roadmap()?;
        Ok(Page::Found(s.pages.render_roadmap(roadmap.as_deref())?))
    })
    .await
}

async fn fallback_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    render_blocking(state, move |s| {
        Ok(Page::NotFound(s.pages.render_not_found(uri.path())?))
    })
    .await
}

/// Run file-system bound page rendering off the async workers
async fn render_blocking<F>(state: Arc<AppState>, render: F) -> Response
where
    F: FnOnce(&AppState) -> Result<Page> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || render(&state)).await {
        Ok(Ok(Page::Found(html))) => Html(html).into_response(),
        Ok(Ok(Page::NotFound(html))) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Failed to render page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
