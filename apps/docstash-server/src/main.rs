//! DocStash Server - stateless HTTP front for S3 multipart uploads.
//!
//! Browsers upload large files straight to S3 through presigned part URLs;
//! this server only opens, signs and completes the upload sessions, and offers
//! a handful of document operations (list, remove, rename, share) on the same
//! bucket.
//!
//! # Usage
//!
//! ```text
//! S3_BUCKET_NAME=documents PORT=8080 docstash-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HOST` / `PORT` | `127.0.0.1` / `8080` | Bind address |
//! | `CORS_ORIGIN` | `*` | `Access-Control-Allow-Origin` value |
//! | `NODE_ENV` | `dev` | `production` switches logs to JSON |
//! | `S3_BUCKET_NAME` | *(required)* | Target bucket |
//! | `S3_REGION` | `us-east-1` | Bucket region |
//! | `S3_ENDPOINT` | *(unset)* | Custom S3-compatible endpoint |
//! | `S3_ACCESS_KEY_ID` / `S3_SECRET_ACCESS_KEY` | *(unset)* | Static credentials |
//! | `S3_FORCE_PATH_STYLE` | `true` | Path-style addressing |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//!
//! Variables may also come from a `.env` file in the working directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use docstash_core::{DocStash, DocStashConfig, DocStashRequestHandler, ObjectBackend, S3Backend};
use docstash_http::dispatch::DocStashHandler;
use docstash_http::service::{DocStashHttpConfig, DocStashHttpService};

/// Server version logged at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn is_production(config: &DocStashConfig) -> bool {
    config.environment.eq_ignore_ascii_case("production")
}

/// Build the [`DocStashHttpConfig`] from the application [`DocStashConfig`].
fn build_http_config(config: &DocStashConfig) -> DocStashHttpConfig {
    DocStashHttpConfig {
        cors_origin: config.cors_origin.clone(),
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: DocStashHandler>(
    listener: TcpListener,
    service: DocStashHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        shutdown_signal().await;
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Address a local health probe should dial for a given listen address.
fn probe_addr(config: &DocStashConfig) -> String {
    config.listen_addr().replace("0.0.0.0", "127.0.0.1")
}

/// Request `/health` and check the server reports itself running.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = DocStashConfig::from_env();
        let healthy = run_health_check(&probe_addr(&config)).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = DocStashConfig::from_env();

    init_tracing(&config.log_level, is_production(&config))?;

    config.validate().context("invalid configuration")?;

    info!(
        listen = %config.listen_addr(),
        bucket = %config.bucket,
        region = %config.region,
        environment = %config.environment,
        cors_origin = %config.cors_origin,
        version = VERSION,
        "starting DocStash Server",
    );

    let backend: Arc<dyn ObjectBackend> = Arc::new(S3Backend::from_config(&config).await);
    let http_config = build_http_config(&config);
    let provider = DocStash::new(backend);
    let handler = DocStashRequestHandler::new(Arc::new(provider));
    let service = DocStashHttpService::new(handler, http_config);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(addr = %listener.local_addr()?, "listening for connections");

    serve(listener, service).await
}
