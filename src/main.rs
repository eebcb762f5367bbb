#[tokio::main]
async fn main() {
    bookie::start_server().await;
}
