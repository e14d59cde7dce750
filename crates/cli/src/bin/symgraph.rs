use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    symgraph_cli::main_entry().await
}
