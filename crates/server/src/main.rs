#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bokji_server::start().await
}
