use std::time::Duration;

use clap::Parser;

use onx_common::{log, logger};
use onx_server::cleanup_task::CleanupTask;
use onx_server::server_config::{DEFAULT_CONFIG_FILE_NAME, ServerConfig, get_config_manager};
use onx_server::{GatewaySettings, SessionPool, WebServerState, run_web_server};

#[derive(Parser)]
#[command(name = "onx_server")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    config: String,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    use_log_prefix: bool,

    #[arg(long)]
    verbose: bool,

    #[arg(long)]
    write_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, args.verbose);

    let config_manager = get_config_manager(&args.config);
    if args.write_default_config {
        config_manager.set_config(&ServerConfig::default())?;
        log!("Default config written to {}", args.config);
        return Ok(());
    }

    let mut config = config_manager.get_config()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let pool = SessionPool::new(config.session_ttl());
    let state = WebServerState::new(pool.clone(), GatewaySettings::from_config(&config));

    let cleanup_task = CleanupTask::new(pool.clone(), config.cleanup_interval());
    tokio::spawn(async move {
        cleanup_task.run().await;
    });

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind web server address");
    log!("Web server listening on {}", addr);

    let shutdown_pool = pool.clone();
    let shutdown_signal = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");

        log!("Shutdown signal received, closing connections...");
        shutdown_pool.close_all().await;

        tokio::time::sleep(Duration::from_millis(200)).await;
    };

    run_web_server(listener, state, shutdown_signal).await?;

    log!("Server shut down gracefully");

    Ok(())
}
