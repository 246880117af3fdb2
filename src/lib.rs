pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::AppConfig, CliConfig};
pub use core::{etl::EtlEngine, pipeline::LotteryPipeline};
pub use utils::error::{LottoError, Result};
