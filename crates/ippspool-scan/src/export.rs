// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export of decoded messages as flat CSV rows or as a JSON tree.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use ippspool_core::error::Result;
use ippspool_core::{Attribute, Message, Value};

/// Column names of the CSV export.
pub const CSV_HEADER: [&str; 4] = ["group_tag", "value_tag", "name", "value"];

/// One value of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub group_tag: String,
    pub value_tag: String,
    /// Attribute name; collection members are joined with `.`.
    pub name: String,
    pub value: String,
}

/// Flatten a message to rows: one per value, collections expanded into
/// dotted member paths.
pub fn flatten(message: &Message) -> Vec<Row> {
    let mut rows = Vec::new();
    for group in &message.groups {
        for attr in &group.attributes {
            flatten_attribute(group.name(), "", attr, &mut rows);
        }
    }
    rows
}

fn flatten_attribute(group_tag: &str, prefix: &str, attr: &Attribute, rows: &mut Vec<Row>) {
    let name = if prefix.is_empty() {
        attr.name.clone()
    } else {
        format!("{prefix}.{}", attr.name)
    };
    for value in attr.value.values() {
        match value {
            Value::Collection(members) if !members.is_empty() => {
                for member in members {
                    flatten_attribute(group_tag, &name, member, rows);
                }
            }
            other => rows.push(Row {
                group_tag: group_tag.to_owned(),
                value_tag: attr.tag.name().to_owned(),
                name: name.clone(),
                value: other.to_string(),
            }),
        }
    }
}

/// Write `rows` as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[Row], mut out: W) -> Result<()> {
    write_record(&mut out, &CSV_HEADER)?;
    for row in rows {
        write_record(
            &mut out,
            &[
                row.group_tag.as_str(),
                row.value_tag.as_str(),
                row.name.as_str(),
                row.value.as_str(),
            ],
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write the whole decoded tree as pretty-printed JSON.
pub fn write_json<W: Write>(message: &Message, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, message)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Where the table for `input` goes below `results_dir`: the input path
/// with its root and `..` parts dropped, plus `extension`.
pub fn table_path(results_dir: &Path, input: &Path, extension: &str) -> PathBuf {
    let mut path = results_dir.to_path_buf();
    for component in input.components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
    let mut name = path.clone().into_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Write the CSV (or JSON) table for one decoded file, creating parent
/// directories.  Returns the path written.
pub fn save_table(results_dir: &Path, input: &Path, message: &Message, json: bool) -> Result<PathBuf> {
    let path = table_path(results_dir, input, if json { "json" } else { "csv" });
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = std::io::BufWriter::new(fs::File::create(&path)?);
    if json {
        write_json(message, file)?;
    } else {
        write_csv(&flatten(message), file)?;
    }
    debug!(path = %path.display(), "table written");
    Ok(path)
}

fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(quote(field).as_bytes())?;
    }
    out.write_all(b"\r\n")
}

/// RFC 4180 field quoting.
fn quote(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippspool_core::{AttributeMap, AttributeValue, Group, Tag, Version};

    fn attr(name: &str, tag: Tag, values: Vec<Value>) -> Attribute {
        Attribute {
            name: name.into(),
            tag,
            value: AttributeValue::from_values(values).unwrap(),
        }
    }

    fn map(attrs: Vec<Attribute>) -> AttributeMap {
        let mut map = AttributeMap::new();
        for a in attrs {
            map.insert(a);
        }
        map
    }

    fn sample() -> Message {
        let media_size = map(vec![
            attr("x-dimension", Tag::Integer, vec![Value::Integer(21000)]),
            attr("y-dimension", Tag::Integer, vec![Value::Integer(29700)]),
        ]);
        let media_col = map(vec![
            attr("media-size", Tag::BeginCollection, vec![Value::Collection(media_size)]),
            attr("media-key", Tag::Keyword, vec![Value::String("a4".into())]),
        ]);
        let mut operation = Group::new(Tag::OperationAttributes);
        operation.attributes = map(vec![attr(
            "attributes-charset",
            Tag::Charset,
            vec![Value::String("utf-8".into())],
        )]);
        let mut job = Group::new(Tag::JobAttributes);
        job.attributes = map(vec![
            attr(
                "job-sheets",
                Tag::Keyword,
                vec![Value::String("none".into()), Value::String("standard".into())],
            ),
            attr("media-col", Tag::BeginCollection, vec![Value::Collection(media_col)]),
            attr("job-name", Tag::NameWithoutLanguage, vec![Value::String("a, \"b\"".into())]),
        ]);
        Message {
            version: Version { major: 1, minor: 1 },
            operation_or_status: 2,
            request_id: 7,
            groups: vec![operation, job],
            end_of_attributes: true,
            trailing: vec![0; 3],
        }
    }

    fn row(group: &str, tag: &str, name: &str, value: &str) -> Row {
        Row {
            group_tag: group.into(),
            value_tag: tag.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    #[test]
    fn flatten_expands_sets_and_collections() {
        let rows = flatten(&sample());
        assert_eq!(
            rows,
            vec![
                row("operation-attributes", "charset", "attributes-charset", "utf-8"),
                row("job-attributes", "keyword", "job-sheets", "none"),
                row("job-attributes", "keyword", "job-sheets", "standard"),
                row("job-attributes", "integer", "media-col.media-size.x-dimension", "21000"),
                row("job-attributes", "integer", "media-col.media-size.y-dimension", "29700"),
                row("job-attributes", "keyword", "media-col.media-key", "a4"),
                row("job-attributes", "nameWithoutLanguage", "job-name", "a, \"b\""),
            ]
        );
    }

    #[test]
    fn empty_collection_keeps_a_row() {
        let mut group = Group::new(Tag::JobAttributes);
        group.attributes = map(vec![attr(
            "media-col",
            Tag::BeginCollection,
            vec![Value::Collection(AttributeMap::new())],
        )]);
        let message = Message {
            groups: vec![group],
            ..sample()
        };
        assert_eq!(
            flatten(&message),
            vec![row("job-attributes", "collection", "media-col", "{}")]
        );
    }

    #[test]
    fn csv_quotes_special_fields() {
        let mut out = Vec::new();
        write_csv(&flatten(&sample()), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.split("\r\n").collect();
        assert_eq!(lines[0], "group_tag,value_tag,name,value");
        assert_eq!(
            lines[1],
            "operation-attributes,charset,attributes-charset,utf-8"
        );
        assert_eq!(
            lines[7],
            "job-attributes,nameWithoutLanguage,job-name,\"a, \"\"b\"\"\""
        );
    }

    #[test]
    fn json_keeps_tree_shape() {
        let mut out = Vec::new();
        write_json(&sample(), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["request_id"], 7);
        assert_eq!(json["trailing_bytes"], 3);
        let job = &json["groups"][1]["attributes"];
        assert_eq!(job["job-sheets"]["value"], serde_json::json!(["none", "standard"]));
        assert_eq!(
            job["media-col"]["value"]["media-size"]["value"]["x-dimension"]["value"],
            21000
        );
    }

    #[test]
    fn table_path_mirrors_input() {
        let results = Path::new("results.tables");
        assert_eq!(
            table_path(results, Path::new("/spool/123456/c00001"), "csv"),
            PathBuf::from("results.tables/spool/123456/c00001.csv")
        );
        assert_eq!(
            table_path(results, Path::new("../dumps/c00002"), "json"),
            PathBuf::from("results.tables/dumps/c00002.json")
        );
    }

    #[test]
    fn save_table_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_table(tmp.path(), Path::new("a/b/c00001"), &sample(), false).unwrap();
        assert_eq!(path, tmp.path().join("a/b/c00001.csv"));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("group_tag,value_tag,name,value\r\n"));
    }
}
