// src/main.rs

use taskchain::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("taskchain error: {err:?}");
        std::process::exit(2);
    }

    if let Err(err) = run(args).await {
        eprintln!("taskchain: {err}");
        std::process::exit(err.exit_code());
    }
}
