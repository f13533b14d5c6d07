use axum::serve;
use dashboard::{app, build_app_state, get_config_info, get_log_level, setup_logger};
use log::{error, info, LevelFilter};
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = get_config_info()?;
    setup_logger()
        .level(get_log_level(&cli))
        .level_for("hyper", LevelFilter::Info)
        .level_for("rustls", LevelFilter::Info)
        .apply()?;

    let socket_addr = cli.socket_addr()?;
    let listener = TcpListener::bind(socket_addr).await?;

    info!("listening on http://{}", socket_addr);
    info!("docs hosted @ http://{}/docs", socket_addr);

    let app_state = build_app_state(cli.ui_dir(), &cli.feeds_config())?;
    let app = app(app_state);
    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
