//! Import and export of the app list.
//!
//! JSON import is lenient: every element is coerced field by field the way
//! the list has always been normalized, so hand-edited files still load.
//! CSV export writes a fixed header and quotes every value.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::{new_id, now_timestamp, AppRecord, Pricing};

/// Column order of the CSV export
pub const CSV_HEADERS: [&str; 10] = [
    "appName",
    "company",
    "website",
    "domain",
    "isFree",
    "summary",
    "logoUrl",
    "audioUrl",
    "videoUrl",
    "createdAt",
];

pub const DEFAULT_EXPORT_FILE: &str = "apps.csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    #[default]
    Csv,
    Json,
}

impl Format {
    /// `.csv` files are CSV, everything else is treated as JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Json,
        }
    }
}

/// String conversion with falsy values (null, false, 0, "") mapped to ""
fn loose_string(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items.iter().map(|i| loose_string(Some(i))).join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn normalize(obj: &Map<String, Value>, pricing: fn(&str) -> Pricing) -> AppRecord {
    let field = |name: &str| loose_string(obj.get(name));
    let or_else = |name: &str, fallback: fn() -> String| {
        let v = field(name);
        if v.is_empty() {
            fallback()
        } else {
            v
        }
    };

    AppRecord {
        id: or_else("id", new_id),
        app_name: field("appName").trim().to_string(),
        company: field("company").trim().to_string(),
        website: field("website"),
        domain: field("domain"),
        is_free: pricing(obj.get("isFree").and_then(Value::as_str).unwrap_or_default()),
        summary: field("summary"),
        logo_url: field("logoUrl"),
        audio_url: field("audioUrl"),
        video_url: field("videoUrl"),
        created_at: or_else("createdAt", now_timestamp),
    }
}

/// Parses a JSON array of app-shaped objects. Anything but an array is rejected.
pub fn import_json(text: &str) -> Result<Vec<AppRecord>> {
    let data: Value = serde_json::from_str(text)?;
    let Value::Array(items) = data else {
        return Err(Error::InvalidFormat("expected a JSON array."));
    };

    Ok(normalize_all(&items, Pricing::from_label))
}

/// Coerces every element of a raw array; non-objects become all-default records.
pub(crate) fn normalize_all(items: &[Value], pricing: fn(&str) -> Pricing) -> Vec<AppRecord> {
    let empty = Map::new();
    items
        .iter()
        .map(|item| normalize(item.as_object().unwrap_or(&empty), pricing))
        .collect()
}

/// Decodes file bytes the way a browser reads text: a leading BOM is dropped
/// and invalid UTF-8 sequences are replaced.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

pub fn export_json(list: &[AppRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(list)?)
}

fn csv_values(app: &AppRecord) -> [String; 10] {
    [
        app.app_name.clone(),
        app.company.clone(),
        app.website.clone(),
        app.domain.clone(),
        app.is_free.to_string(),
        app.summary.clone(),
        app.logo_url.clone(),
        app.audio_url.clone(),
        app.video_url.clone(),
        app.created_at.clone(),
    ]
}

/// Header line unquoted, every value quoted, `\n` between rows, no trailing newline
pub fn to_csv(list: &[AppRecord]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for app in list {
        wtr.write_record(csv_values(app))?;
    }
    let body = wtr
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    let body = String::from_utf8_lossy(&body);

    let mut out = CSV_HEADERS.join(",");
    if !list.is_empty() {
        out.push('\n');
        out.push_str(body.trim_end_matches('\n'));
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    #[serde(default)]
    app_name: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    website: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    is_free: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    logo_url: String,
    #[serde(default)]
    audio_url: String,
    #[serde(default)]
    video_url: String,
    #[serde(default)]
    created_at: String,
}

/// Reads the CSV export format back. Ids are not exported, so fresh ones are assigned.
pub fn import_csv(text: &str) -> Result<Vec<AppRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        let row = row?;
        out.push(AppRecord {
            id: new_id(),
            app_name: row.app_name.trim().to_string(),
            company: row.company.trim().to_string(),
            website: row.website,
            domain: row.domain,
            is_free: Pricing::from_label(&row.is_free),
            summary: row.summary,
            logo_url: row.logo_url,
            audio_url: row.audio_url,
            video_url: row.video_url,
            created_at: if row.created_at.is_empty() {
                now_timestamp()
            } else {
                row.created_at
            },
        });
    }
    Ok(out)
}

/// Reads `path`, choosing the parser from its extension
pub fn import_file(path: &Path) -> Result<Vec<AppRecord>> {
    let text = decode_text(&fs::read(path)?);
    let list = match Format::from_path(path) {
        Format::Csv => import_csv(&text)?,
        Format::Json => import_json(&text)?,
    };
    tracing::info!(path = %path.display(), count = list.len(), "parsed import file");
    Ok(list)
}

/// Writes `list` to `path`; an empty list is refused
pub fn export_file(list: &[AppRecord], path: &Path, format: Format) -> Result<()> {
    if list.is_empty() {
        return Err(Error::NothingToExport);
    }
    let content = match format {
        Format::Csv => to_csv(list)?,
        Format::Json => export_json(list)?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::info!(path = %path.display(), count = list.len(), %format, "exported app list");
    Ok(())
}
