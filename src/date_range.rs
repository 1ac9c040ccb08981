use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// `DD-MM-YYYY to DD-MM-YYYY`, or empty when no range was found.
    pub date_range: String,
    /// End date of the range, or the fallback date.
    pub date: NaiveDate,
    pub start: Option<NaiveDate>,
    pub matched: bool,
}

fn date_range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{2})-(\d{2})-(\d{4})\s+to\s+(\d{2})-(\d{2})-(\d{4})")
            .expect("invalid date range regex")
    })
}

/// Finds a `DD-MM-YYYY to DD-MM-YYYY` range anywhere in `text`. The end
/// date must be a real calendar date.
pub fn find_date_range(text: &str) -> Option<ReportPeriod> {
    let caps = date_range_regex().captures(text)?;
    let (sd, sm, sy) = (&caps[1], &caps[2], &caps[3]);
    let (ed, em, ey) = (&caps[4], &caps[5], &caps[6]);

    let end = NaiveDate::parse_from_str(&format!("{}-{}-{}", ey, em, ed), "%Y-%m-%d").ok()?;
    let start = NaiveDate::parse_from_str(&format!("{}-{}-{}", sy, sm, sd), "%Y-%m-%d").ok();

    Some(ReportPeriod {
        date_range: format!("{}-{}-{} to {}-{}-{}", sd, sm, sy, ed, em, ey),
        date: end,
        start,
        matched: true,
    })
}

/// Like [`find_date_range`], but falls back to `fallback` with an empty range.
pub fn extract_date_range_or(text: &str, fallback: NaiveDate) -> ReportPeriod {
    find_date_range(text).unwrap_or(ReportPeriod {
        date_range: String::new(),
        date: fallback,
        start: None,
        matched: false,
    })
}

/// Falls back to today's local date when the text has no range, which makes
/// the result depend on when it runs.
pub fn extract_date_range(text: &str) -> ReportPeriod {
    extract_date_range_or(text, Local::now().date_naive())
}
