use gse_pod::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if cli::Cli::run().await.is_err() {
        std::process::exit(1);
    }
}
