use crate::core::citation::api_url_for;
use crate::utils::error::{ReportError, Result};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

pub const CDG_API_URL: &str = "https://api.congress.gov/v3";
pub const DEMO_API_KEY: &str = "DEMO_KEY";
pub const API_KEY_ENV: &str = "CDG_API_KEY";

#[derive(Debug, Deserialize)]
struct BillResponse {
    bill: Option<BillDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BillDetail {
    #[serde(default)]
    cbo_cost_estimates: Vec<CostEstimate>,
}

#[derive(Debug, Deserialize)]
struct CostEstimate {
    url: String,
}

/// Congress.gov Data API client for bill cost-estimate lookups.
pub struct CdgClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CdgClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// First CBO cost estimate URL the API lists for the bill behind
    /// `bill_url`. `None` when the bill has no cost estimates on CDG.
    pub async fn cost_estimate_url(&self, bill_url: &str) -> Result<Option<String>> {
        let url = api_url_for(bill_url, &self.base_url)?;
        tracing::debug!("Requesting CDG bill: {}", url);

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed: BillResponse =
            serde_json::from_str(&body).map_err(|e| ReportError::CdgResponseError {
                url: url.clone(),
                message: format!("invalid JSON: {}", e),
            })?;

        let bill = parsed.bill.ok_or_else(|| ReportError::CdgResponseError {
            url: url.clone(),
            message: "response has no 'bill' object".to_string(),
        })?;

        let estimate_url = bill
            .cbo_cost_estimates
            .into_iter()
            .next()
            .map(|estimate| estimate.url);

        match &estimate_url {
            Some(found) => tracing::debug!("CDG lists cost estimate {}", found),
            None => tracing::debug!("CDG lists no cost estimates for {}", bill_url),
        }

        Ok(estimate_url)
    }
}
