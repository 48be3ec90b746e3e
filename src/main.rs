use clap::Parser;
use dotenvy::dotenv;
use edulink::cli::{self, Cli};
use edulink::logging::init_tracing;
use edulink::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let guard = init_tracing();

    let code = match init_app_state() {
        Ok(state) => match cli::run(cli, &state).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("\n❌ {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("❌ Failed to start: {}", e);
            1
        }
    };

    drop(guard);
    std::process::exit(code);
}
