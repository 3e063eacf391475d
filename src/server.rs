use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, sync::Arc};

use crate::{Res, api, info, spotify::SpotifyClient};

pub fn router(client: Arc<SpotifyClient>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/spotify", get(api::now_playing))
        .route("/spotify/previous", get(api::previous))
        .route("/spotify/next", get(api::next))
        .route("/beat", get(api::beat))
        .layer(Extension(client))
}

pub async fn start_api_server(client: Arc<SpotifyClient>, addr: SocketAddr) -> Res<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Server running at http://{}, log in at /login",
        listener.local_addr()?
    );

    axum::serve(listener, router(client)).await?;
    Ok(())
}
