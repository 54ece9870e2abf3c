use std::sync::Arc;
use tracing::info;

use remote_contents::config::Settings;
use remote_contents::contents::{LocalFileHost, RemoteContentsManager};
use remote_contents::web::{self, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("remote_contents=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("[Startup] remote-contents initializing...");

    let settings = Settings::new()?;
    info!(
        "[Config] Serving {:?}, streaming {:?} and files >= {} bytes",
        settings.contents.root_dir,
        settings.contents.stream_extensions,
        settings.contents.size_threshold
    );

    // 宿主与内容管理器初始化
    let host = Arc::new(LocalFileHost::new(&settings.contents.root_dir)?);
    let manager = RemoteContentsManager::from_settings(host, &settings.contents)?;

    let state = Arc::new(AppState {
        manager: Arc::new(manager),
    });
    let app = web::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[Startup] Service ready at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
