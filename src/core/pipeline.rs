use crate::core::cdg::CdgClient;
use crate::core::citation::{cite, url_for};
use crate::core::congress::yesterday;
use crate::core::feed::{filter_new, parse_feed};
use crate::core::report::{render_csv, render_html, render_json};
use crate::core::{ConfigProvider, FeedItem, Pipeline, Report, ReportRow, Storage};
use crate::utils::error::{ReportError, Result};
use reqwest::Client;

pub const REPORT_FILE_STEM: &str = "cbo_report";

/// Compares yesterday's CBO cost estimates against the CDG API.
pub struct CostEstimatePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> CostEstimatePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            storage,
            config,
            client: builder.build()?,
        })
    }

    fn cdg_client(&self) -> CdgClient {
        CdgClient::new(
            self.client.clone(),
            self.config.api_base_url(),
            self.config.api_key(),
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CostEstimatePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<FeedItem>> {
        let feed_url = self.config.feed_url();
        tracing::debug!("Fetching CBO feed: {}", feed_url);

        let response = self
            .client
            .get(&feed_url)
            .send()
            .await?
            .error_for_status()?;
        tracing::debug!("Feed response status: {}", response.status());

        let body = response.bytes().await?;
        let items = parse_feed(&body)?;
        let day = yesterday(self.config.today());
        let total = items.len();
        let new_items = filter_new(items, day);

        tracing::info!(
            "Feed has {} items, {} with a bill number published {}",
            total,
            new_items.len(),
            day
        );
        Ok(new_items)
    }

    async fn transform(&self, items: Vec<FeedItem>) -> Result<Report> {
        let congress = self.config.congress();
        let cdg = self.cdg_client();
        let mut rows = Vec::with_capacity(items.len());

        for item in items {
            let bill_number = item.bill_number.ok_or_else(|| ReportError::FeedError {
                message: format!("item '{}' has no bill number", item.title),
            })?;
            let date = item.date.ok_or_else(|| ReportError::FeedError {
                message: format!("item '{}' has no publication date", item.title),
            })?;

            let citation = cite(congress, &bill_number);
            let bill_url = url_for(&citation)?.to_string();
            let cdg_cost_estimate_url = cdg.cost_estimate_url(&bill_url).await?;
            let cost_estimate_present = cdg_cost_estimate_url.as_deref() == Some(item.link.as_str());

            if !cost_estimate_present {
                tracing::info!(
                    "Cost estimate for {} missing on CDG (feed: {}, CDG: {})",
                    citation,
                    item.link,
                    cdg_cost_estimate_url.as_deref().unwrap_or("none")
                );
            }

            rows.push(ReportRow {
                date,
                title: item.title,
                bill_url,
                link: item.link,
                cdg_cost_estimate_url,
                cost_estimate_present,
            });
        }

        Ok(Report {
            congress,
            published_on: yesterday(self.config.today()),
            rows,
        })
    }

    async fn load(&self, report: Report) -> Result<String> {
        let formats = self.config.output_formats();
        let primary = formats.first().ok_or_else(|| ReportError::ConfigError {
            message: "no output format configured".to_string(),
        })?;

        for format in formats {
            let data = match format.as_str() {
                "html" => render_html(&report).into_bytes(),
                "csv" => render_csv(&report)?,
                "json" => render_json(&report)?,
                other => {
                    return Err(ReportError::ConfigError {
                        message: format!("unsupported output format: {}", other),
                    })
                }
            };

            let file_name = format!("{}.{}", REPORT_FILE_STEM, format);
            tracing::debug!("Writing {} ({} bytes)", file_name, data.len());
            self.storage.write_file(&file_name, &data).await?;
        }

        Ok(format!(
            "{}/{}.{}",
            self.config.output_path(),
            REPORT_FILE_STEM,
            primary
        ))
    }
}
