use crate::core::cdg::{API_KEY_ENV, CDG_API_URL, DEMO_API_KEY};
use crate::core::congress::congress_for_date;
use crate::core::feed::feed_url_for;
use crate::core::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    pub congress: Option<u32>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub feed_url: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
}

fn default_api_base_url() -> String {
    CDG_API_URL.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["html".to_string()]
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            api_base_url: default_api_base_url(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // An unset or unsubstituted key falls back to the environment, then DEMO_KEY
        let key_missing = config
            .source
            .api_key
            .as_deref()
            .map(|key| key.trim().is_empty() || key.starts_with("${"))
            .unwrap_or(true);
        if key_missing {
            config.source.api_key =
                Some(std::env::var(API_KEY_ENV).unwrap_or_else(|_| DEMO_API_KEY.to_string()));
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${CDG_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn congress(&self) -> u32 {
        self.report
            .congress
            .unwrap_or_else(|| congress_for_date(self.today()))
    }

    fn today(&self) -> NaiveDate {
        self.report
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    fn feed_url(&self) -> String {
        self.source
            .feed_url
            .clone()
            .unwrap_or_else(|| feed_url_for(self.congress()))
    }

    fn api_base_url(&self) -> &str {
        &self.source.api_base_url
    }

    fn api_key(&self) -> &str {
        self.source.api_key.as_deref().unwrap_or(DEMO_API_KEY)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        super::validate_provider(self)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[report]
congress = 118
today = "2024-05-02"

[source]
feed_url = "https://example.gov/feed.xml"
api_base_url = "http://localhost:9000/v3"
api_key = "abc123"
timeout_seconds = 10

[load]
output_path = "./reports"
output_formats = ["html", "csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.congress(), 118);
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(config.feed_url(), "https://example.gov/feed.xml");
        assert_eq!(config.api_key(), "abc123");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.output_formats(), ["html".to_string(), "csv".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("[report]\ntoday = \"2026-10-18\"\n").unwrap();

        assert_eq!(config.congress(), 119);
        assert_eq!(
            config.feed_url(),
            "https://www.cbo.gov/rss/119congress-cost-estimates.xml"
        );
        assert_eq!(config.api_base_url(), "https://api.congress.gov/v3");
        assert_eq!(config.output_path(), "./output");
        assert!(!config.api_key().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CBO_REPORT_TEST_FEED", "https://test.example.gov/feed.xml");

        let toml_content = r#"
[source]
feed_url = "${CBO_REPORT_TEST_FEED}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.feed_url(), "https://test.example.gov/feed.xml");

        std::env::remove_var("CBO_REPORT_TEST_FEED");
    }

    #[test]
    fn test_unresolved_api_key_falls_back() {
        let toml_content = r#"
[source]
api_key = "${CBO_REPORT_TEST_UNSET_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(!config.api_key().starts_with("${"));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
feed_url = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[load]\noutput_formats = [\"xlsx\"]\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(TomlConfig::from_toml_str("[report\ncongress = ").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[load]\noutput_path = \"./from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./from-file");
    }
}
