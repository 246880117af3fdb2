use crate::core::ConfigProvider;
use crate::domain::model::MarkupFormat;
use crate::utils::error::{LottoError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

pub const DEFAULT_WINDOW: usize = 50;
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_UNIVERSE_MIN: u32 = 1;
const DEFAULT_UNIVERSE_MAX: u32 = 49;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    #[serde(default)]
    pub parser: MarkupFormat,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub window: Option<usize>,
    pub universe_min: Option<u32>,
    pub universe_max: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LottoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LottoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LOTTO_URL})；找不到的變數原樣保留
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;

        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    fn universe_min(&self) -> u32 {
        self.analysis.universe_min.unwrap_or(DEFAULT_UNIVERSE_MIN)
    }

    fn universe_max(&self) -> u32 {
        self.analysis.universe_max.unwrap_or(DEFAULT_UNIVERSE_MAX)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.url", &self.source.url)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_positive_number("analysis.window", self.window(), 1)?;
        validation::validate_ordered_pair(
            "analysis.universe",
            self.universe_min(),
            self.universe_max(),
        )?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn query_params(&self) -> &HashMap<String, String> {
        &self.source.parameters
    }

    fn markup_format(&self) -> MarkupFormat {
        self.source.parser
    }

    fn window(&self) -> usize {
        self.analysis.window.unwrap_or(DEFAULT_WINDOW)
    }

    fn universe(&self) -> RangeInclusive<u32> {
        self.universe_min()..=self.universe_max()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}
