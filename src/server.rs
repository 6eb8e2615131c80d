use std::sync::Arc;

use anyhow::{Context, Result};
use portal::relay::{self, SmtpMailer};
use portal::Settings;
use tokio::net::TcpListener;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;
    let cfg = Settings::new()?;
    log::info!(
        "Relay config: listen {} via {}:{} as {}",
        cfg.relay.listen_addr,
        cfg.relay.smtp_host,
        cfg.relay.smtp_port,
        cfg.relay.from_address
    );
    let mailer = SmtpMailer::new(&cfg.relay).with_context(|| {
        format!(
            "configuring SMTP sender {:?} via {}",
            cfg.relay.from_address, cfg.relay.smtp_host
        )
    })?;
    let app = relay::router(Arc::new(mailer));
    let listener = TcpListener::bind(&cfg.relay.listen_addr).await?;
    log::info!("Server is running on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
