// src/main.rs

use sshp::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    logging::init_logging(&args);

    if let Err(err) = run(args).await {
        eprintln!("sshp: {err}");
        std::process::exit(err.exit_code());
    }
}
