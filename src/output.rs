use crate::types::{RuntimeRecord, SdkRecord};
use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOptions {
    pub paths: Vec<String>,
    pub exclude_empty: bool,
}

/// What `list` found, in the shape it is rendered.
#[derive(Debug, Clone)]
pub enum Listing {
    Sdks(Vec<SdkRecord>),
    Runtimes(Vec<RuntimeRecord>),
    All {
        sdks: Vec<SdkRecord>,
        runtimes: Vec<RuntimeRecord>,
    },
}

pub fn render(listing: &Listing, format: OutputFormat, options: &PropertyOptions) -> Result<String> {
    let sections = match listing {
        Listing::Sdks(sdks) => vec![("sdks", to_values(sdks, options)?)],
        Listing::Runtimes(runtimes) => vec![("runtimes", to_values(runtimes, options)?)],
        Listing::All { sdks, runtimes } => vec![
            ("sdks", to_values(sdks, options)?),
            ("runtimes", to_values(runtimes, options)?),
        ],
    };
    let merged = matches!(listing, Listing::All { .. });
    // A projection prints exactly the selected properties.
    let with_kind = merged && options.paths.is_empty();

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let document = if merged {
                Value::Object(
                    sections
                        .into_iter()
                        .map(|(name, rows)| (name.to_string(), Value::Array(rows)))
                        .collect(),
                )
            } else {
                Value::Array(sections.into_iter().flat_map(|(_, rows)| rows).collect())
            };

            if format == OutputFormat::Json {
                Ok(format!("{}\n", serde_json::to_string_pretty(&document)?))
            } else {
                Ok(serde_yaml::to_string(&document)?)
            }
        }
        OutputFormat::Tsv | OutputFormat::Table => {
            let rows: Vec<Map<String, Value>> = sections
                .into_iter()
                .flat_map(|(name, rows)| {
                    rows.into_iter().map(move |row| {
                        let mut flat = Map::new();
                        if with_kind {
                            let kind = name.trim_end_matches('s');
                            flat.insert("kind".to_string(), Value::String(kind.to_string()));
                        }
                        flatten_into(&mut flat, None, row);
                        flat
                    })
                })
                .collect();

            if format == OutputFormat::Tsv {
                Ok(render_tsv(&rows))
            } else {
                Ok(render_table(&rows))
            }
        }
    }
}

fn to_values<T: serde::Serialize>(records: &[T], options: &PropertyOptions) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(records.len());
    for record in records {
        let value = serde_json::to_value(record)?;
        if options.paths.is_empty() {
            values.push(value);
            continue;
        }

        let projected = project(&value, &options.paths);
        if options.exclude_empty && projected.is_empty() {
            continue;
        }
        values.push(Value::Object(projected));
    }
    Ok(values)
}

/// Pick the values at each JSON pointer, keyed by the pointer's last segment.
/// Paths that resolve to nothing are skipped.
pub fn project(value: &Value, paths: &[String]) -> Map<String, Value> {
    let mut picked = Map::new();
    for path in paths {
        let pointer = if path.starts_with('/') {
            path.clone()
        } else {
            format!("/{}", path)
        };

        let Some(found) = value.pointer(&pointer) else {
            tracing::debug!("Property {} not found", pointer);
            continue;
        };

        let key = pointer
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .replace("~1", "/")
            .replace("~0", "~");
        picked.insert(key, found.clone());
    }
    picked
}

fn flatten_into(out: &mut Map<String, Value>, prefix: Option<&str>, value: Value) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields {
                let key = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key,
                };
                flatten_into(out, Some(key.as_str()), field);
            }
        }
        other => {
            out.insert(prefix.unwrap_or("value").to_string(), other);
        }
    }
}

/// Column names in order of first appearance across all rows.
fn columns(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_tsv(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn render_tsv(rows: &[Map<String, Value>]) -> String {
    let columns = columns(rows);
    if columns.is_empty() {
        return String::new();
    }

    let mut out = columns.join("\t");
    out.push('\n');
    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|c| escape_tsv(&cell(row.get(c))))
            .collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    out
}

fn render_table(rows: &[Map<String, Value>]) -> String {
    let columns = columns(rows);
    if columns.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(String::as_str));

    for row in rows {
        table.add_row(columns.iter().map(|c| cell(row.get(c))));
    }
    format!("{}\n", table)
}
