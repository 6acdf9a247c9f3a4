//! Development server
//!
//! Serves the RSS feed from in-memory collections and everything else from
//! the public directory. A background watcher owns the content store and
//! publishes a fresh snapshot whenever the content changes; request handlers
//! only ever read the latest snapshot.

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::ContentStore;
use crate::config::SiteConfig;
use crate::content::Collections;
use crate::feed;
use crate::Site;

/// Configuration and collections as of the last successful load
#[derive(Debug)]
pub struct Snapshot {
    pub config: SiteConfig,
    pub collections: Arc<Collections>,
}

/// Server state
struct ServerState {
    public_dir: PathBuf,
    snapshot: watch::Receiver<Arc<Snapshot>>,
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool) -> Result<()> {
    let mut store = ContentStore::new(site.clone());
    let collections = store.get()?;

    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(Snapshot {
        config: site.config.clone(),
        collections,
    }));

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        snapshot: snapshot_rx,
    });

    let app = router(&site.config, state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if site.config.feed.enable {
        println!(
            "Feed available at {}/{}",
            url,
            site.config.feed.path.trim_start_matches('/')
        );
    }
    if watch {
        println!("Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    // Start file watcher if watch mode is enabled
    if watch {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_refresh(store, snapshot_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(config: &SiteConfig, state: Arc<ServerState>) -> Router {
    let mut app: Router<Arc<ServerState>> = Router::new();
    if config.feed.enable {
        let route = format!("/{}", config.feed.path.trim_start_matches('/'));
        app = app.route(&route, get(feed_handler));
    }

    app.fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Publish a new snapshot after each successful reload
fn watch_and_refresh(store: ContentStore, snapshot_tx: watch::Sender<Arc<Snapshot>>) -> Result<()> {
    crate::watch::watch_content(store, |site, collections| {
        tracing::info!("Reloaded {} posts", collections.posts.len());
        snapshot_tx.send_replace(Arc::new(Snapshot {
            config: site.config.clone(),
            collections,
        }));
    })
}

/// Serve the RSS feed built from the current snapshot
async fn feed_handler(State(state): State<Arc<ServerState>>) -> Response {
    let snapshot = Arc::clone(&state.snapshot.borrow());
    feed_response(&snapshot)
}

fn feed_response(snapshot: &Snapshot) -> Response {
    match feed::render(&snapshot.config, &snapshot.collections.posts) {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(e) => {
            tracing::error!("Failed to build feed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Fallback handler that serves files from the public directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}
