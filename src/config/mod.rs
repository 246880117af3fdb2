pub mod cli;
pub mod toml_config;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "lotto-etl")]
#[command(about = "Scrape published lottery draw results and rank hot/cold numbers")]
pub struct CliConfig {
    #[arg(long, default_value = "app.toml", help = "Path to the TOML config file")]
    pub config: String,

    #[arg(long, help = "Override the trailing window of draws to analyze")]
    pub window: Option<usize>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
