pub mod cli;
pub mod toml_config;

use crate::core::cdg::{API_KEY_ENV, CDG_API_URL, DEMO_API_KEY};
use crate::core::congress::congress_for_date;
use crate::core::feed::feed_url_for;
use crate::core::report::SUPPORTED_FORMATS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cbo-cdg-report")]
#[command(about = "Report new CBO cost estimates that are missing from the Congress.gov API")]
pub struct CliConfig {
    /// Congress number; derived from --today when omitted
    #[arg(long)]
    pub congress: Option<u32>,

    /// Reference date (YYYY-MM-DD); the report covers the day before
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// CBO feed URL; derived from the congress number when omitted
    #[arg(long)]
    pub feed_url: Option<String>,

    #[arg(long, default_value = CDG_API_URL)]
    pub api_base_url: String,

    #[arg(long, env = API_KEY_ENV, default_value = DEMO_API_KEY, hide_env_values = true)]
    pub api_key: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Output formats: html, csv, json
    #[arg(long, value_delimiter = ',', default_value = "html")]
    pub formats: Vec<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// TOML configuration file; --today and --congress still override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn congress(&self) -> u32 {
        self.congress
            .unwrap_or_else(|| congress_for_date(self.today()))
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn feed_url(&self) -> String {
        self.feed_url
            .clone()
            .unwrap_or_else(|| feed_url_for(self.congress()))
    }

    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}

/// Checks shared by every configuration source.
pub(crate) fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_range("congress", config.congress(), 1, 999)?;
    validation::validate_url("feed_url", &config.feed_url())?;
    validation::validate_url("api_base_url", config.api_base_url())?;
    validation::validate_non_empty_string("api_key", config.api_key())?;
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_output_formats("formats", config.output_formats(), &SUPPORTED_FORMATS)?;
    Ok(())
}
