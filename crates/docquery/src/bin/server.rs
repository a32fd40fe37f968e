//! Document query server binary
//!
//! Run with: cargo run -p docquery --bin docquery-server

use docquery::{config::DocQueryConfig, server::DocQueryServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docquery=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration (DOCQUERY_CONFIG points at a TOML file, defaults otherwise)
    let config = match std::env::var("DOCQUERY_CONFIG") {
        Ok(path) => DocQueryConfig::from_file(&path)?,
        Err(_) => DocQueryConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Vision model: {}", config.llm.vision_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Qdrant: {}", config.vector_db.url);

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Then pull models: ollama pull {} && ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model,
                config.llm.vision_model
            );
        }
    }

    let server = DocQueryServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/healthcheck", server.address());
    println!("\nEndpoints:");
    println!("  POST /convert        - Extract text from a file or image");
    println!("  POST /upload         - Upload a document");
    println!("  GET  /download/:id   - Download a stored document");
    println!("  POST /chat           - Ask a question about a document");
    println!("  POST /summary        - Summarize a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
