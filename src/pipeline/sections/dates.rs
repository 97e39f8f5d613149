use chrono::NaiveDate;

/// Formats tried in order. Day-first before month-first: "03/04/2024" is
/// read as 3 April, "03/15/2024" falls through to US order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Parse a report date as printed. Returns None for anything unrecognized;
/// the caller keeps the raw string either way.
pub fn parse_report_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim().trim_end_matches(['.', ',']);
    if trimmed.is_empty() {
        return None;
    }
    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&collapsed, fmt).ok())
}
