use chrono::{NaiveDate, NaiveDateTime};

/// Parse a lenient ISO-8601 date or datetime string.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, and datetimes with an optional
/// seconds component, a space or `T` separator, and an optional `Z` or
/// `±HH:MM` offset suffix (the offset is dropped, not converted). Values are
/// normalized to whole seconds. Returns `None` for anything unparseable:
/// schedule fields are user-entered and an invalid date means "no date".
pub fn parse_isodatetime(value: &str) -> Option<NaiveDateTime> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    if s.contains('T') || s.contains(' ') || s.contains('Z') {
        let mut s = s.replace(' ', "T");
        if let Some(stripped) = s.strip_suffix('Z') {
            s = stripped.to_string();
        }
        // A '+' or '-' past the separator starts a UTC offset; drop it.
        if let Some(t) = s.find('T')
            && let Some(rel) = s[t..].find(['+', '-'])
        {
            s.truncate(t + rel);
        }
        if let Some(dot) = s.find('.') {
            s.truncate(dot);
        }
        return NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M"))
            .ok();
    }

    let date = match s.len() {
        4 => s
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        7 => NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok(),
        _ => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
    };
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a datetime as ISO-8601, with or without the time component.
pub fn format_isodatetime(value: NaiveDateTime, include_time: bool) -> String {
    if include_time {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        value.format("%Y-%m-%d").to_string()
    }
}
