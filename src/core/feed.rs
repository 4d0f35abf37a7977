use crate::domain::model::FeedItem;
use crate::utils::error::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use rss::Channel;
use std::collections::HashMap;
use std::sync::LazyLock;

const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

// Longer prefixes first: the regex crate picks the leftmost alternative.
static TITLE_BILL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(H\.\s*J\.\s*Res\.|S\.\s*J\.\s*Res\.|H\.\s*Con\.\s*Res\.|S\.\s*Con\.\s*Res\.|H\.\s*Res\.|S\.\s*Res\.|H\.\s*R\.|S\.)\s*(\d+)\b",
    )
    .expect("bill number pattern is valid")
});

pub fn feed_url_for(congress: u32) -> String {
    format!(
        "https://www.cbo.gov/rss/{}congress-cost-estimates.xml",
        congress
    )
}

/// Parses the raw feed document into items, in feed order.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedItem>> {
    let channel = Channel::read_from(xml)?;
    let raw_items = item_children(xml)?;
    tracing::debug!(
        "Parsed feed '{}' with {} items",
        channel.title(),
        channel.items().len()
    );

    let items = channel
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let raw = raw_items.get(index);
            let raw_field = |name: &str| raw.and_then(|fields| fields.get(name));

            let title = item.title().unwrap_or_default().trim().to_string();
            let date = raw_field("date")
                .and_then(|d| parse_pub_date(d))
                .or_else(|| item.pub_date().and_then(parse_pub_date))
                .or_else(|| {
                    item.dublin_core_ext()
                        .and_then(|dc| dc.dates().first())
                        .and_then(|d| parse_pub_date(d))
                });
            let bill_number = raw_field("billnumber")
                .cloned()
                .or_else(|| extension_bill_number(item))
                .or_else(|| bill_number_from_title(&title));

            FeedItem {
                bill_number,
                link: item.link().unwrap_or_default().trim().to_string(),
                title,
                date,
            }
        })
        .collect();

    Ok(items)
}

/// Unparseable dates become `None` rather than failing the run.
pub fn parse_pub_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_str(value, PUB_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

/// Text of each item's direct children, keyed by normalized local name.
///
/// The rss crate keeps only namespaced extensions, so unprefixed elements
/// such as `<Bill_Number>` or `<Date>` are read here. The first non-empty
/// value of a repeated element wins.
fn item_children(xml: &[u8]) -> Result<Vec<HashMap<String, String>>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut items = Vec::new();
    let mut current: Option<HashMap<String, String>> = None;
    let mut child: Option<(String, String)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let name =
                    normalize_element_name(&String::from_utf8_lossy(start.local_name().as_ref()));
                if current.is_some() {
                    depth += 1;
                    if depth == 1 {
                        child = Some((name, String::new()));
                    }
                } else if name == "item" {
                    current = Some(HashMap::new());
                    depth = 0;
                }
            }
            Event::Text(text) if depth == 1 => {
                if let Some((_, value)) = child.as_mut() {
                    value.push_str(&text.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(data) if depth == 1 => {
                if let Some((_, value)) = child.as_mut() {
                    value.push_str(&data.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::GeneralRef(reference) if depth == 1 => {
                if let Some((_, value)) = child.as_mut() {
                    if let Some(c) = reference.resolve_char_ref()? {
                        value.push(c);
                    } else {
                        let entity = reference.decode().map_err(quick_xml::Error::from)?;
                        if let Some(resolved) = resolve_xml_entity(&entity) {
                            value.push_str(resolved);
                        }
                    }
                }
            }
            Event::End(_) if current.is_some() => {
                if depth == 0 {
                    items.extend(current.take());
                } else {
                    if depth == 1 {
                        if let (Some(fields), Some((name, value))) = (current.as_mut(), child.take())
                        {
                            let value = value.trim();
                            if !value.is_empty() {
                                fields.entry(name).or_insert_with(|| value.to_string());
                            }
                        }
                    }
                    depth -= 1;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

fn extension_bill_number(item: &rss::Item) -> Option<String> {
    item.extensions()
        .values()
        .flat_map(|by_name| by_name.iter())
        .filter(|(name, _)| normalize_element_name(name) == "billnumber")
        .flat_map(|(_, extensions)| extensions.iter())
        .filter_map(|ext| ext.value())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn normalize_element_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Bill number from a CBO title such as `H.R. 1234, Example Act`.
pub fn bill_number_from_title(title: &str) -> Option<String> {
    let caps = TITLE_BILL_NUMBER.captures(title)?;
    let prefix: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
    Some(format!("{}{}", prefix, &caps[2]))
}

/// Keeps items that carry a bill number and were published on `day`.
pub fn filter_new(items: Vec<FeedItem>, day: NaiveDate) -> Vec<FeedItem> {
    items
        .into_iter()
        .filter(|item| item.bill_number.is_some())
        .filter(|item| item.date.map(|d| d.date_naive()) == Some(day))
        .collect()
}
