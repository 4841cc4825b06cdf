use clap::Parser;
use disaster_match::{analyzer, cli, config, error, gateway, handlers};
use cli::{Cli, Commands};
use config::Config;
use disaster_match_common::UploadedFile;
use gateway::{GeminiGateway, ModelGateway};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "disaster_match=debug,tower_http=debug"
    } else {
        "disaster_match=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            serve(config).await?;
        }

        Commands::Analyze { files, output } => {
            analyze(&config, &files, output).await?;
        }

        Commands::Models => {
            config.get_api_key()?;
            let gateway = GeminiGateway::new(&config)?;
            let models = gateway::list_generate_content_models(&gateway).await?;
            println!("現在使用可能なモデル一覧 (APIから取得):");
            for model in models {
                println!("  {}", model);
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base_url);
                println!("  待ち受けアドレス: {}", config.bind_addr);
                println!("  最大アップロードサイズ: {} bytes", config.max_upload_bytes);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  APIキー: {}", if config.has_api_key() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    if !config.has_api_key() {
        tracing::warn!("APIキーが未設定です。照合リクエストはエラーになります");
    }

    let gateway: Arc<dyn ModelGateway> = Arc::new(GeminiGateway::new(&config)?);
    let bind_addr = config.bind_addr.clone();
    tracing::info!(model = %config.model, "モデル設定");

    let app = handlers::create_app(handlers::AppState::new(config, gateway))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("✅ Server ready at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn analyze(config: &Config, paths: &[PathBuf], output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            return Err(error::DisasterMatchError::FileNotFound(path.display().to_string()).into());
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        files.push(UploadedFile::new(file_name, std::fs::read(path)?));
    }

    let gateway = GeminiGateway::new(config)?;
    let outcome = analyzer::run_matching(config, &gateway, &files).await;

    for diag in &outcome.diagnostics {
        eprintln!("- {}: {}", diag.file_name, diag.describe());
    }
    if let Some(err) = outcome.error {
        anyhow::bail!("{}", err);
    }

    let json = serde_json::to_string_pretty(&outcome.matches)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("✔ {}件の照合結果を保存: {}", outcome.matches.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
