// src/main.rs

use photo_uploader::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("photo-uploader error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let cfg = config::load_and_validate(&args.config)?;
    let _log_guard = logging::init_logging(args.log_level, &cfg.logging)?;
    run(args, cfg).await
}
