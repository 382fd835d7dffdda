use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "vs-server")]
#[command(about = "Broadcasts world moments to a message broker")]
#[command(version)]
pub struct Cli {
    /// Directory holding config.toml, the seed file and logs
    /// (default: $VS_CONFIG_DIR or ./.vibestream)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Override logging.level (off, error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}
