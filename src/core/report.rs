use crate::core::congress::ordinal;
use crate::domain::model::Report;
use crate::utils::error::{ReportError, Result};

pub const SUPPORTED_FORMATS: [&str; 3] = ["html", "csv", "json"];

pub const COLUMNS: [&str; 4] = [
    "Date",
    "Title",
    "Bill URL",
    "Cost Estimate Present on CDG?",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Renders the report as one self-contained page.
pub fn render_html(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>New CBO Reports</title>\n");
    html.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2rem; }\n\
         table { width: 100%; border-collapse: collapse; }\n\
         th, td { border: 1px solid #ddd; padding: 0.4rem 0.6rem; text-align: left; }\n\
         th { background: #f4f4f4; }\n\
         td.missing { color: #b00020; font-weight: bold; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>New CBO Reports</h1>\n");
    html.push_str(&format!(
        "<p>{} Congress, cost estimates published {}</p>\n",
        ordinal(report.congress),
        report.published_on
    ));

    html.push_str("<table>\n<thead>\n<tr>");
    for column in COLUMNS {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &report.rows {
        let bill_url = escape_html(&row.bill_url);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td><a href=\"{}\">{}</a></td><td{}>{}</td></tr>\n",
            escape_html(&row.date.format(DATE_FORMAT).to_string()),
            escape_html(&row.title),
            bill_url,
            bill_url,
            if row.cost_estimate_present {
                ""
            } else {
                " class=\"missing\""
            },
            row.cost_estimate_present
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str(&format!("<h2>Total New: {}</h2>\n", report.total_new()));
    html.push_str(&format!(
        "<h2>Total Missing: {}</h2>\n",
        report.total_missing()
    ));
    html.push_str("</body>\n</html>\n");
    html
}

pub fn render_csv(report: &Report) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in &report.rows {
        writer.write_record([
            row.date.format(DATE_FORMAT).to_string(),
            row.title.clone(),
            row.bill_url.clone(),
            row.cost_estimate_present.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::IoError(e.into_error()))
}

pub fn render_json(report: &Report) -> Result<Vec<u8>> {
    #[derive(serde::Serialize)]
    struct JsonReport<'a> {
        #[serde(flatten)]
        report: &'a Report,
        total_new: usize,
        total_missing: usize,
    }

    let payload = JsonReport {
        report,
        total_new: report.total_new(),
        total_missing: report.total_missing(),
    };
    Ok(serde_json::to_vec_pretty(&payload)?)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
