use cbo_cdg_report::{CliConfig, CostEstimatePipeline, LocalStorage, ReportEngine, TomlConfig};
use chrono::NaiveDate;
use httpmock::prelude::*;
use tempfile::TempDir;

const FEED_PATH: &str = "/rss/119congress-cost-estimates.xml";
const BILL_PATH: &str = "/v3/bill/119th-congress/house-bill/1";
const FEED_LINK: &str = "https://www.cbo.gov/publication/61234";

fn feed_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>Cost Estimates</title>
    <link>https://www.cbo.gov/cost-estimates</link>
    <description>CBO cost estimates for the 119th Congress</description>
    <item>
      <title>H.R. 1, One Big Act</title>
      <link>{}</link>
      <pubDate>Sat, 17 Oct 2026 16:05:00 -0400</pubDate>
      <Bill_Number>H.R.1</Bill_Number>
    </item>
    <item>
      <title>S. 44, Last Week Act</title>
      <link>https://www.cbo.gov/publication/61000</link>
      <pubDate>Mon, 12 Oct 2026 10:00:00 -0400</pubDate>
    </item>
    <item>
      <title>An Update to the Budget Outlook</title>
      <link>https://www.cbo.gov/publication/61235</link>
      <pubDate>Sat, 17 Oct 2026 11:00:00 -0400</pubDate>
    </item>
  </channel>
</rss>"#,
        FEED_LINK
    )
}

fn cli_config(server: &MockServer, output_path: &str, formats: &[&str]) -> CliConfig {
    CliConfig {
        congress: None,
        today: NaiveDate::from_ymd_opt(2026, 10, 18),
        feed_url: Some(server.url(FEED_PATH)),
        api_base_url: server.url("/v3"),
        api_key: "integration-key".to_string(),
        output_path: output_path.to_string(),
        formats: formats.iter().map(|f| f.to_string()).collect(),
        timeout_seconds: Some(10),
        config: None,
        verbose: false,
    }
}

fn mock_feed(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path(FEED_PATH);
        then.status(200)
            .header("Content-Type", "application/rss+xml")
            .body(feed_xml());
    })
}

fn mock_bill<'a>(server: &'a MockServer, estimate_url: &str) -> httpmock::Mock<'a> {
    let body = serde_json::json!({
        "bill": {
            "congress": 119,
            "type": "HR",
            "number": "1",
            "cboCostEstimates": [
                {"pubDate": "2026-10-17T20:05:00Z", "title": "H.R. 1", "url": estimate_url}
            ]
        }
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(BILL_PATH)
            .header("x-api-key", "integration-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

#[tokio::test]
async fn test_end_to_end_estimate_present_on_cdg() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let feed_mock = mock_feed(&server);
    let bill_mock = mock_bill(&server, FEED_LINK);

    let config = cli_config(&server, &output_path, &["html", "csv"]);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CostEstimatePipeline::new(storage, config).unwrap();
    let summary = ReportEngine::new(pipeline).run().await.unwrap();

    feed_mock.assert();
    bill_mock.assert_hits(1);
    assert_eq!(summary.total_new, 1);
    assert_eq!(summary.total_missing, 0);
    assert!(summary.output_path.ends_with("cbo_report.html"));

    let html = std::fs::read_to_string(temp_dir.path().join("cbo_report.html")).unwrap();
    assert!(html.contains("<h2>Total New: 1</h2>"));
    assert!(html.contains("<h2>Total Missing: 0</h2>"));
    assert!(html.contains(
        "<a href=\"https://www.congress.gov/bill/119th-congress/house-bill/1\">"
    ));
    assert!(html.contains("H.R. 1, One Big Act"));
    assert!(!html.contains("Last Week Act"));

    let csv = std::fs::read_to_string(temp_dir.path().join("cbo_report.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(",true"));
}

#[tokio::test]
async fn test_end_to_end_estimate_missing_on_cdg() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let feed_mock = mock_feed(&server);
    let bill_mock = mock_bill(&server, "https://www.cbo.gov/publication/59999");

    let config = cli_config(&server, &output_path, &["html"]);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CostEstimatePipeline::new(storage, config).unwrap();
    let summary = ReportEngine::new(pipeline).run().await.unwrap();

    feed_mock.assert();
    bill_mock.assert();
    assert_eq!(summary.total_new, 1);
    assert_eq!(summary.total_missing, 1);

    let html = std::fs::read_to_string(temp_dir.path().join("cbo_report.html")).unwrap();
    assert!(html.contains("<h2>Total Missing: 1</h2>"));
    assert!(html.contains("<td class=\"missing\">false</td>"));
}

#[tokio::test]
async fn test_end_to_end_no_new_items_skips_cdg() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let feed_mock = mock_feed(&server);
    let bill_mock = mock_bill(&server, FEED_LINK);

    let mut config = cli_config(&server, &output_path, &["json"]);
    config.today = NaiveDate::from_ymd_opt(2026, 10, 1);

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CostEstimatePipeline::new(storage, config).unwrap();
    let summary = ReportEngine::new(pipeline).run().await.unwrap();

    feed_mock.assert();
    bill_mock.assert_hits(0);
    assert_eq!(summary.total_new, 0);
    assert_eq!(summary.total_missing, 0);

    let json: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("cbo_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["total_new"], 0);
    assert_eq!(json["published_on"], "2026-09-30");
}

#[tokio::test]
async fn test_end_to_end_cdg_failure_aborts_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    mock_feed(&server);
    server.mock(|when, then| {
        when.method(GET).path(BILL_PATH);
        then.status(429);
    });

    let config = cli_config(&server, &output_path, &["html"]);
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = CostEstimatePipeline::new(storage, config).unwrap();
    let result = ReportEngine::new(pipeline).run().await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("cbo_report.html").exists());
}

#[tokio::test]
async fn test_end_to_end_with_toml_config() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("reports");

    let server = MockServer::start();
    let feed_mock = mock_feed(&server);
    let bill_mock = mock_bill(&server, FEED_LINK);

    let toml_content = format!(
        r#"
[report]
congress = 119
today = "2026-10-18"

[source]
feed_url = "{}"
api_base_url = "{}"
api_key = "integration-key"

[load]
output_path = "{}"
output_formats = ["csv"]
"#,
        server.url(FEED_PATH),
        server.url("/v3"),
        output_path.to_str().unwrap().replace('\\', "/")
    );
    let config = TomlConfig::from_toml_str(&toml_content)?;

    let storage = LocalStorage::new(output_path.to_str().unwrap().to_string());
    let pipeline = CostEstimatePipeline::new(storage, config)?;
    let summary = ReportEngine::new(pipeline).run().await?;

    feed_mock.assert();
    bill_mock.assert();
    assert_eq!(summary.total_missing, 0);
    assert!(output_path.join("cbo_report.csv").exists());
    Ok(())
}
