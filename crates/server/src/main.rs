#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sitelog_server::start().await
}
