//! Types shared by every resource family: pagination envelopes, list
//! queries, lightweight references and the lenient timestamp decoder.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Largest page size Mealie serves for recipe listings.
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Token response from `/api/auth/token`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Form body for the login exchange.
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Standard Mealie pagination envelope. Unlike the records it wraps, the
/// envelope keys are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some() || self.page < self.total_pages
    }
}

/// List endpoints answer with either a paginated envelope or a bare array
/// depending on the Mealie version and route.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Paginated<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.items,
            Listing::Plain(items) => items,
        }
    }

    /// Normalises a bare array into a single-page envelope.
    pub fn into_page(self) -> Paginated<T> {
        match self {
            Listing::Page(page) => page,
            Listing::Plain(items) => Paginated {
                page: 1,
                per_page: items.len() as u32,
                total: items.len() as u64,
                total_pages: 1,
                items,
                next: None,
                previous: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// Pagination, ordering and search options shared by list endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub order_by: Option<String>,
    pub order_direction: OrderDirection,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            order_by: None,
            order_direction: OrderDirection::Asc,
            search: None,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(field.into());
        self.order_direction = direction;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Query pairs in Mealie's camelCase parameter names. The direction is
    /// only sent alongside an ordering field.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("perPage".to_string(), self.per_page.to_string()),
        ];
        if let Some(order_by) = &self.order_by {
            params.push(("orderBy".to_string(), order_by.clone()));
            params.push((
                "orderDirection".to_string(),
                self.order_direction.as_str().to_string(),
            ));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params
    }
}

/// A foreign record embedded by reference (unit, food, label and so on).
/// Only the identifying fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedReference {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Decodes an optional timestamp in any of the shapes Mealie emits:
/// RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC) or a bare date
/// (midnight UTC).
pub fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{}'", s))),
    }
}

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts a Mealie duration into whole minutes. Accepts ISO 8601
/// durations (`PT1H30M`, `P1DT2H`) and a bare number of minutes.
pub fn parse_duration_minutes(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(minutes) = raw.parse::<u32>() {
        return Some(minutes);
    }

    let rest = raw.strip_prefix('P').or_else(|| raw.strip_prefix('p'))?;
    let mut seconds: f64 = 0.0;
    let mut number = String::new();
    let mut in_time = false;
    let mut saw_component = false;

    for c in rest.chars() {
        match c.to_ascii_uppercase() {
            'T' if number.is_empty() => in_time = true,
            d if d.is_ascii_digit() || d == '.' || d == ',' => {
                number.push(if d == ',' { '.' } else { d })
            }
            unit => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                let scale = match (unit, in_time) {
                    ('W', false) => 7.0 * 86_400.0,
                    ('D', false) => 86_400.0,
                    ('H', true) => 3_600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return None,
                };
                seconds += value * scale;
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return None;
    }
    Some((seconds / 60.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_mealie_timestamps() {
        let rfc = parse_datetime("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 10);

        let naive = parse_datetime("2024-03-01T12:30:00.123456").unwrap();
        assert_eq!((naive.day(), naive.hour(), naive.minute()), (1, 12, 30));

        let date_only = parse_datetime("2024-03-01").unwrap();
        assert_eq!((date_only.month(), date_only.hour()), (3, 0));

        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn parses_iso_durations() {
        assert_eq!(parse_duration_minutes("PT30M"), Some(30));
        assert_eq!(parse_duration_minutes("PT1H30M"), Some(90));
        assert_eq!(parse_duration_minutes("P1DT2H"), Some(26 * 60));
        assert_eq!(parse_duration_minutes("PT90S"), Some(2));
        assert_eq!(parse_duration_minutes("45"), Some(45));
        assert_eq!(parse_duration_minutes("about an hour"), None);
        assert_eq!(parse_duration_minutes("PT"), None);
        assert_eq!(parse_duration_minutes(""), None);
    }

    #[test]
    fn list_query_params() {
        let params = ListQuery::new()
            .per_page(20)
            .order_by("created_at", OrderDirection::Desc)
            .search("soup")
            .to_params();

        assert_eq!(
            params,
            vec![
                ("page".to_string(), "1".to_string()),
                ("perPage".to_string(), "20".to_string()),
                ("orderBy".to_string(), "created_at".to_string()),
                ("orderDirection".to_string(), "desc".to_string()),
                ("search".to_string(), "soup".to_string()),
            ]
        );

        let unordered = ListQuery::new().to_params();
        assert!(!unordered.iter().any(|(k, _)| k == "orderDirection"));
    }

    #[test]
    fn listing_accepts_both_shapes() {
        let page: Listing<NamedReference> = serde_json::from_str(
            r#"{"page":2,"per_page":1,"total":3,"total_pages":3,"items":[{"name":"a"}]}"#,
        )
        .unwrap();
        let page = page.into_page();
        assert_eq!(page.page, 2);
        assert!(page.has_next());

        let plain: Listing<NamedReference> =
            serde_json::from_str(r#"[{"name":"a"},{"id":"2","name":"b"}]"#).unwrap();
        assert_eq!(plain.into_items().len(), 2);
    }
}
