use chrono::{Datelike, Days, NaiveDate};

const FIRST_CONGRESS_YEAR: i32 = 1789;

/// Congress sitting during the calendar year of `date`.
pub fn congress_for_date(date: NaiveDate) -> u32 {
    ((date.year() - FIRST_CONGRESS_YEAR) / 2 + 1).max(1) as u32
}

/// English ordinal, e.g. `119th`, `121st`.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
