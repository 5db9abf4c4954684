#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    jobly_server::init_tracing();

    if let Err(e) = jobly_server::cli::run(std::env::args_os()).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
