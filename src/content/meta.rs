//! Normalization of untyped front-matter into post metadata

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_yaml::Value;

use super::FrontMatter;

/// Typed metadata taken from a post's front-matter
///
/// Every field is optional here; path-derived defaults are applied by the
/// indexer, which knows the file the metadata came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Local>>,
    pub tags: Vec<String>,
}

impl PostMeta {
    /// Coerce loosely typed front-matter into post metadata
    pub fn from_front_matter(fm: &FrontMatter) -> Self {
        let date = fm.get("date").and_then(|v| {
            let raw = scalar_string(v)?;
            let parsed = parse_date_string(&raw);
            if parsed.is_none() {
                tracing::warn!("Ignoring unrecognized date {:?}", raw);
            }
            parsed
        });

        Self {
            title: fm.get("title").and_then(text_field),
            description: fm.get("description").and_then(text_field),
            date,
            tags: fm.get("tags").map(tag_list).unwrap_or_default(),
        }
    }
}

/// Render a scalar as a string; lists and mappings have no scalar form
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn text_field(value: &Value) -> Option<String> {
    scalar_string(value)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Accepts a list of scalars or a single comma-separated string
fn tag_list(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_string).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    const OFFSET_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%z",
    ];
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Local));
        }
    }

    const DATETIME_FORMATS: [&str; 7] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_from_naive(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return local_from_naive(d.and_hms_opt(0, 0, 0)?);
        }
    }

    None
}

fn local_from_naive(dt: NaiveDateTime) -> Option<DateTime<Local>> {
    // `earliest` picks a side of a DST fold; a gap yields None
    Local.from_local_datetime(&dt).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(yaml_block: &str) -> PostMeta {
        let content = format!("---\n{}\n---\nbody", yaml_block);
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        PostMeta::from_front_matter(&fm)
    }

    #[test]
    fn test_full_meta() {
        let m = meta(
            "title: \"CQRS Read Models\"\ndescription: Projections\ndate: \"2024-03-10\"\ntags: [cqrs, ddd]",
        );
        assert_eq!(m.title.as_deref(), Some("CQRS Read Models"));
        assert_eq!(m.description.as_deref(), Some("Projections"));
        assert_eq!(
            m.date.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2024-03-10 00:00"
        );
        assert_eq!(m.tags, vec!["cqrs", "ddd"]);
    }

    #[test]
    fn test_missing_fields() {
        let m = meta("layout: post");
        assert_eq!(m, PostMeta::default());
    }

    #[test]
    fn test_scalar_coercion() {
        let m = meta("title: 1984\ndescription: true");
        assert_eq!(m.title.as_deref(), Some("1984"));
        assert_eq!(m.description.as_deref(), Some("true"));
    }

    #[test]
    fn test_blank_title_is_absent() {
        let m = meta("title: \"   \"\ndescription:");
        assert_eq!(m.title, None);
        assert_eq!(m.description, None);
    }

    #[test]
    fn test_non_scalar_title_ignored() {
        let m = meta("title:\n  - a\n  - b");
        assert_eq!(m.title, None);
    }

    #[test]
    fn test_tags_single_string() {
        assert_eq!(meta("tags: sagas").tags, vec!["sagas"]);
        assert_eq!(
            meta("tags: \"sagas, outbox ,sagas\"").tags,
            vec!["sagas", "outbox"]
        );
    }

    #[test]
    fn test_tags_mixed_scalars() {
        let m = meta("tags:\n  - rust\n  - 2024\n  - ''\n  - rust\n  - {nested: map}");
        assert_eq!(m.tags, vec!["rust", "2024"]);
    }

    #[test]
    fn test_tags_null() {
        assert!(meta("tags:").tags.is_empty());
    }

    #[test]
    fn test_unparseable_date() {
        assert_eq!(meta("date: someday").date, None);
    }

    #[test]
    fn test_parse_date_formats() {
        for s in [
            "2024-01-15",
            "2024/01/15",
            "2024-01-15 10:30",
            "2024-01-15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00.250",
        ] {
            let dt = parse_date_string(s).unwrap_or_else(|| panic!("failed on {}", s));
            assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
        }
    }

    #[test]
    fn test_parse_date_with_offset() {
        let a = parse_date_string("2024-01-15T10:30:00Z").unwrap();
        let b = parse_date_string("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(a, b);
    }
}
