#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    if let Err(err) = timely_mcp::mcp::server::run_stdio().await {
        eprintln!("timely-mcp: {}", err);
        std::process::exit(1);
    }
}
