use crate::core::congress::ordinal;
use crate::utils::error::{ReportError, Result};
use std::fmt;
use url::Url;

pub const CONGRESS_GOV_URL: &str = "https://www.congress.gov";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillType {
    HouseBill,
    SenateBill,
    HouseJointResolution,
    SenateJointResolution,
    HouseConcurrentResolution,
    SenateConcurrentResolution,
    HouseResolution,
    SenateResolution,
}

impl BillType {
    /// Parses a lowercase, punctuation-free code such as `hr` or `sjres`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "hr" => Some(Self::HouseBill),
            "s" => Some(Self::SenateBill),
            "hjres" => Some(Self::HouseJointResolution),
            "sjres" => Some(Self::SenateJointResolution),
            "hconres" => Some(Self::HouseConcurrentResolution),
            "sconres" => Some(Self::SenateConcurrentResolution),
            "hres" => Some(Self::HouseResolution),
            "sres" => Some(Self::SenateResolution),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::HouseBill => "hr",
            Self::SenateBill => "s",
            Self::HouseJointResolution => "hjres",
            Self::SenateJointResolution => "sjres",
            Self::HouseConcurrentResolution => "hconres",
            Self::SenateConcurrentResolution => "sconres",
            Self::HouseResolution => "hres",
            Self::SenateResolution => "sres",
        }
    }

    /// Path segment congress.gov uses for this bill type.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::HouseBill => "house-bill",
            Self::SenateBill => "senate-bill",
            Self::HouseJointResolution => "house-joint-resolution",
            Self::SenateJointResolution => "senate-joint-resolution",
            Self::HouseConcurrentResolution => "house-concurrent-resolution",
            Self::SenateConcurrentResolution => "senate-concurrent-resolution",
            Self::HouseResolution => "house-resolution",
            Self::SenateResolution => "senate-resolution",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillCitation {
    pub congress: u32,
    pub bill_type: BillType,
    pub number: u32,
}

impl BillCitation {
    /// Parses a citation of the form `<congress><bill type><number>`.
    ///
    /// Dots, whitespace and case in the bill type are ignored, so `118H.R.1`,
    /// `118H.R. 1` and `118hr1` are the same citation.
    pub fn parse(citation: &str) -> Result<Self> {
        let invalid = |reason: &str| ReportError::CitationError {
            citation: citation.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = citation.trim();
        let body = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
        let congress: u32 = trimmed[..trimmed.len() - body.len()]
            .parse()
            .map_err(|_| invalid("missing congress number"))?;
        if body.is_empty() {
            return Err(invalid("missing bill type"));
        }

        let type_part = body.trim_end_matches(|c: char| c.is_ascii_digit());
        let number: u32 = body[type_part.len()..]
            .parse()
            .map_err(|_| invalid("missing bill number"))?;

        if type_part
            .chars()
            .any(|c| !(c.is_ascii_alphabetic() || c == '.' || c.is_whitespace()))
        {
            return Err(invalid("unexpected character in bill type"));
        }
        let code: String = type_part
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let bill_type = BillType::from_code(&code).ok_or_else(|| invalid("unknown bill type"))?;

        if congress == 0 || number == 0 {
            return Err(invalid("congress and bill number must be positive"));
        }

        Ok(Self {
            congress,
            bill_type,
            number,
        })
    }

    /// Canonical congress.gov page for the bill.
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(CONGRESS_GOV_URL)?.join(&format!(
            "bill/{}-congress/{}/{}",
            ordinal(self.congress),
            self.bill_type.slug(),
            self.number
        ))?;
        Ok(url)
    }
}

impl fmt::Display for BillCitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.congress, self.bill_type.code(), self.number)
    }
}

/// Bill citation as the feed row produces it: congress number immediately
/// followed by the bill number.
pub fn cite(congress: u32, bill_number: &str) -> String {
    format!("{}{}", congress, bill_number)
}

pub fn url_for(citation: &str) -> Result<Url> {
    BillCitation::parse(citation)?.url()
}

/// CDG API endpoint for a bill page: the page path after `.gov`, appended to
/// the API base.
pub fn api_url_for(bill_url: &str, api_base: &str) -> Result<String> {
    let (_, path) = bill_url
        .split_once(".gov")
        .ok_or_else(|| ReportError::CitationError {
            citation: bill_url.to_string(),
            reason: "bill URL is not on a .gov domain".to_string(),
        })?;
    Ok(format!("{}{}", api_base.trim_end_matches('/'), path))
}
