use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Listening host
    #[arg(long, env = "FILEDROP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listening port
    #[arg(short, long, env = "FILEDROP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Root path holding the `uploads` staging directory
    #[arg(long, env = "FILEDROP_ROOTDIR", default_value = ".")]
    pub root: String,

    /// Record store url
    #[arg(long, env = "FILEDROP_DATABASE_URL", default_value = "sqlite://files.db")]
    pub database_url: String,

    /// Seconds between two archiver passes
    #[arg(long, env = "FILEDROP_ARCHIVE_INTERVAL_SECS", default_value_t = 60)]
    pub archive_interval_secs: u64,

    /// The only origin allowed to make cross-origin requests
    #[arg(long, env = "FILEDROP_CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,

    /// Keep the original archiving behaviour (every staged file is recorded
    /// again when archived) and reject text frames during a transfer
    #[arg(long, env = "FILEDROP_LEGACY_PARITY", default_value_t = false)]
    pub legacy_parity: bool,
}
