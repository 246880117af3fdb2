use crate::core::aggregate::aggregate;
use crate::core::analysis::hot_cold;
use crate::core::markup;
use crate::core::{ConfigProvider, Phase, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

pub const NUMBER_JSON_FILE: &str = "data/number.json";
pub const NUMBER_FLATTEN_FILE: &str = "data/number_flatten.txt";

pub struct LotteryPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> LotteryPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }
}

/// Cache filename for one fetch: local date plus the query parameters,
/// sorted so the same parameter set always maps to the same file. The page
/// is fetched at most once per day per parameter set.
fn cache_file_name(date: &str, params: &HashMap<String, String>) -> String {
    if params.is_empty() {
        return format!("{}.html", date);
    }

    let mut pairs: Vec<_> = params.iter().collect();
    pairs.sort();
    let suffix = pairs
        .iter()
        .map(|(key, value)| format!("{}_{}", key, value))
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_{}.html", date, suffix)
}

fn flatten_line(phase: &Phase) -> String {
    let values: Vec<&str> = phase
        .main
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(phase.bonus.as_str()))
        .collect();
    format!("{}: {}", phase.phase, values.join(", "))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LotteryPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        let date = chrono::Local::now().format("%Y%m%d").to_string();
        let cache_name = cache_file_name(&date, self.config.query_params());

        // 今天抓過就直接用快取
        if let Ok(cached) = self.storage.read_file(&cache_name).await {
            tracing::debug!("Using cached document: {}", cache_name);
            return Ok(String::from_utf8_lossy(&cached).into_owned());
        }

        tracing::debug!("Fetching draw results from: {}", self.config.source_url());
        let response = self
            .client
            .get(self.config.source_url())
            .query(self.config.query_params())
            .timeout(Duration::from_secs(self.config.timeout_seconds()))
            .send()
            .await?
            .error_for_status()?;

        let document = response.text().await?;
        tracing::debug!("Fetched {} bytes", document.len());

        self.storage
            .write_file(&cache_name, document.as_bytes())
            .await?;

        Ok(document)
    }

    async fn transform(&self, document: String) -> Result<TransformResult> {
        let extracted = markup::extract(self.config.markup_format(), &document);
        tracing::debug!("Extracted {} phase blocks", extracted.len());

        let phases = aggregate(extracted);

        let universe: Vec<u32> = self.config.universe().collect();
        let report = hot_cold(&phases, self.config.window(), &universe)?;

        let json_output = serde_json::to_string_pretty(&phases)?;
        let mut flatten_output = phases
            .iter()
            .map(flatten_line)
            .collect::<Vec<_>>()
            .join("\n");
        if !flatten_output.is_empty() {
            flatten_output.push('\n');
        }

        Ok(TransformResult {
            phases,
            json_output,
            flatten_output,
            report,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        self.storage
            .write_file(NUMBER_JSON_FILE, result.json_output.as_bytes())
            .await?;
        self.storage
            .write_file(NUMBER_FLATTEN_FILE, result.flatten_output.as_bytes())
            .await?;

        tracing::debug!("Wrote {} phases to storage", result.phases.len());
        Ok(format!("{}/data", self.config.output_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MarkupFormat;
    use crate::utils::error::LottoError;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::ops::RangeInclusive;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                LottoError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        url: String,
        params: HashMap<String, String>,
    }

    impl MockConfig {
        fn new(url: String) -> Self {
            Self {
                url,
                params: HashMap::new(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn source_url(&self) -> &str {
            &self.url
        }

        fn query_params(&self) -> &HashMap<String, String> {
            &self.params
        }

        fn markup_format(&self) -> MarkupFormat {
            MarkupFormat::Gx
        }

        fn window(&self) -> usize {
            50
        }

        fn universe(&self) -> RangeInclusive<u32> {
            1..=49
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn timeout_seconds(&self) -> u64 {
            10
        }
    }

    fn item_html(number: &str) -> String {
        format!(
            "<li><dl><dt>{}</dt>\
             <dd>鼠 <span>金</span><span>/</span><span>紅波</span><span>大</span></dd>\
             <dd style=\"display: none\"><span>單</span><span>/</span><span>合雙</span>\
             <span>野獸</span><span>合單</span></dd></dl></li>",
            number
        )
    }

    fn results_page() -> String {
        let mut items = String::new();
        for number in ["01", "12", "23", "34", "45", "06"] {
            items.push_str(&item_html(number));
        }
        items.push_str("<li class=\"kj-jia\">+</li>");
        items.push_str(&item_html("49"));

        format!(
            "<html><body>\
             <div class=\"kj-tit\">2025年第123期 06月01日</div>\
             <div class=\"kj-box\"><ul>{}</ul></div>\
             </body></html>",
            items
        )
    }

    #[test]
    fn test_cache_file_name_without_params() {
        let params = HashMap::new();
        assert_eq!(cache_file_name("20250806", &params), "20250806.html");
    }

    #[test]
    fn test_cache_file_name_sorts_params() {
        let mut params = HashMap::new();
        params.insert("year".to_string(), "2025".to_string());
        params.insert("page".to_string(), "1".to_string());
        assert_eq!(
            cache_file_name("20250806", &params),
            "20250806_page_1_year_2025.html"
        );
    }

    #[tokio::test]
    async fn test_extract_fetches_and_caches() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/kj");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(results_page());
        });

        let storage = MockStorage::new();
        let config = MockConfig::new(server.url("/kj"));
        let pipeline = LotteryPipeline::new(storage.clone(), config);

        let first = pipeline.extract().await.unwrap();
        let second = pipeline.extract().await.unwrap();

        // Second call is served from the cache.
        api_mock.assert_hits(1);
        assert_eq!(first, second);
        assert!(first.contains("kj-tit"));
    }

    #[tokio::test]
    async fn test_extract_sends_query_params() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/kj").query_param("year", "2025");
            then.status(200).body(results_page());
        });

        let storage = MockStorage::new();
        let mut config = MockConfig::new(server.url("/kj"));
        config
            .params
            .insert("year".to_string(), "2025".to_string());
        let pipeline = LotteryPipeline::new(storage, config);

        pipeline.extract().await.unwrap();
        api_mock.assert();
    }

    #[tokio::test]
    async fn test_extract_fails_on_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/kj");
            then.status(500);
        });

        let storage = MockStorage::new();
        let config = MockConfig::new(server.url("/kj"));
        let pipeline = LotteryPipeline::new(storage.clone(), config);

        let result = pipeline.extract().await;
        assert!(matches!(result, Err(LottoError::ApiError(_))));
        // Nothing is cached on failure.
        let files = storage.files.lock().await;
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_transform_produces_all_outputs() {
        let storage = MockStorage::new();
        let config = MockConfig::new("http://test.invalid".to_string());
        let pipeline = LotteryPipeline::new(storage, config);

        let result = pipeline.transform(results_page()).await.unwrap();

        assert_eq!(result.phases.len(), 1);
        let phase = &result.phases[0];
        assert_eq!(phase.phase, "2025/123/06");
        assert_eq!(phase.main, vec!["01", "12", "23", "34", "45", "06"]);
        assert_eq!(phase.bonus, "49");

        assert_eq!(
            result.flatten_output,
            "2025/123/06: 01, 12, 23, 34, 45, 06, 49\n"
        );

        let parsed: Vec<Phase> = serde_json::from_str(&result.json_output).unwrap();
        assert_eq!(parsed, result.phases);

        assert_eq!(result.report.taken, 1);
        // Every drawn number appeared exactly once.
        assert!(result.report.hot.iter().all(|&(_, count)| count == 1));
    }

    #[tokio::test]
    async fn test_transform_empty_document() {
        let storage = MockStorage::new();
        let config = MockConfig::new("http://test.invalid".to_string());
        let pipeline = LotteryPipeline::new(storage, config);

        let result = pipeline
            .transform("<html><body></body></html>".to_string())
            .await
            .unwrap();

        assert!(result.phases.is_empty());
        assert_eq!(result.json_output, "[]");
        assert_eq!(result.flatten_output, "");
        assert_eq!(result.report.taken, 0);
    }

    #[tokio::test]
    async fn test_load_writes_both_files() {
        let storage = MockStorage::new();
        let config = MockConfig::new("http://test.invalid".to_string());
        let pipeline = LotteryPipeline::new(storage.clone(), config);

        let transform_result = pipeline.transform(results_page()).await.unwrap();
        let json_expected = transform_result.json_output.clone();
        let flatten_expected = transform_result.flatten_output.clone();

        let output_path = pipeline.load(transform_result).await.unwrap();
        assert_eq!(output_path, "test_output/data");

        let json = storage.get_file(NUMBER_JSON_FILE).await.unwrap();
        assert_eq!(json, json_expected.as_bytes());

        let flatten = storage.get_file(NUMBER_FLATTEN_FILE).await.unwrap();
        assert_eq!(flatten, flatten_expected.as_bytes());
    }
}
