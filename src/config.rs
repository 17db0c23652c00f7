use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "marina-gateway")]
#[command(about = "Rate limited public read endpoint for marina contact info")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Hosted backend base url, e.g. "https://<project>.supabase.co"
    #[arg(long, env = "SUPABASE_URL", required_unless_present = "in_memory")]
    pub supabase_url: Option<String>,

    // Service role key used for the table read
    #[arg(
        long,
        env = "SUPABASE_SERVICE_ROLE_KEY",
        hide_env_values = true,
        required_unless_present = "in_memory"
    )]
    pub service_role_key: Option<String>,

    // Table holding contact rows
    #[arg(long, env = "CONTACT_TABLE", default_value = "contact_info")]
    pub contact_table: String,

    // Serve from an empty in-process table instead of the backend
    #[arg(long)]
    pub in_memory: bool,

    // Seconds between sweeps of expired rate limit windows (0 disables)
    #[arg(long, env = "PRUNE_INTERVAL", default_value_t = 60)]
    pub prune_interval: u64,

    // HTTP client timeout towards the backend, in seconds
    #[arg(long, env = "STORE_TIMEOUT", default_value_t = 10)]
    pub store_timeout: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
