use std::process::exit;

#[tokio::main]
async fn main() {
    if server::start_server().await.is_err() {
        exit(1);
    }
}
