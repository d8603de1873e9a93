#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    market_stats_mcp::run().await
}
