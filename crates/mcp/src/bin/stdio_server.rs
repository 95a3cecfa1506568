use loopline_mcp::LooplineMcpServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the MCP protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Loopline MCP server (STDIO)");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = loopline_db::create_pool(&database_url).await?;
    loopline_db::health_check(&pool).await?;
    info!("Database connection established");

    let server = LooplineMcpServer::new(pool);

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("Error starting server: {e}");
    })?;

    info!("Loopline MCP server started on STDIO transport");

    match service.waiting().await {
        Ok(_) => info!("Server shut down gracefully"),
        Err(e) => error!("Server error: {e}"),
    }

    Ok(())
}
