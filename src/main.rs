use std::path::PathBuf;

use clap::Parser;

use bcx::app::App;
use bcx::config::Config;
use bcx::error::AppResult;
use bcx::logging;
use bcx::storage::JsonFileStore;

const STORE_FILE: &str = "store.json";

/// Terminal client for the BiTS Connect student portal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Page to open first, e.g. `#library` or `gpa`.
    fragment: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the persisted store and the log file.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(&cli)?;
    let data_dir = config.storage.resolved_data_dir();

    if let Err(err) = logging::init(&config.log, &data_dir) {
        eprintln!("logging disabled: {err}");
    }

    let store = JsonFileStore::open(data_dir.join(STORE_FILE))?;
    let mut app = App::new_with_config(config, Box::new(store), cli.fragment);
    app.run().await
}

fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = Some(data_dir.clone());
    }
    Ok(config)
}
