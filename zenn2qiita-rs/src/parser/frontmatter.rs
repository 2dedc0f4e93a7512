//! YAML frontmatter splitting, parsing and serialization.

use crate::error::{ConvertError, Result};
use log::trace;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::sync::LazyLock;

/// The delimiter line that opens and closes a frontmatter block.
pub const DELIMITER: &str = "---";

const BOM: char = '\u{feff}';

/// Strings a YAML 1.1 reader (js-yaml, Qiita CLI) would load as a timestamp.
static YAML11_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[0-9]{4}-[0-9]{2}-[0-9]{2}",
        r"|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt]|[ \t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]*)?",
        r"(?:[ \t]*(?:Z|[-+][0-9]{1,2}(?::[0-9]{2})?))?)$",
    ))
    .unwrap()
});

/// Frontmatter extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string (without delimiters).
    pub yaml: &'a str,
    /// Everything after the closing delimiter line, untouched.
    pub body: &'a str,
}

/// A document whose frontmatter has been parsed into a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub frontmatter: Mapping,
    pub body: &'a str,
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Split content into frontmatter and body.
///
/// The first line must be exactly `---`. The block ends at the next line that
/// is exactly `---` (a trailing `\r` is ignored on both). Returns `None` when
/// either delimiter is missing. A leading byte order mark is skipped.
pub fn split_frontmatter(content: &str) -> Option<FrontmatterSplit<'_>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let opening = lines.next()?;
    if !opening.ends_with('\n') || strip_line_ending(opening) != DELIMITER {
        return None;
    }

    let yaml_start = opening.len();
    let mut offset = yaml_start;
    for line in lines {
        if strip_line_ending(line) == DELIMITER {
            trace!("frontmatter block spans bytes {}..{}", yaml_start, offset);
            return Some(FrontmatterSplit {
                yaml: &content[yaml_start..offset],
                body: &content[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    None
}

/// Parse a raw YAML block into a mapping. An empty block is an empty mapping.
pub fn parse_mapping(yaml: &str, origin: &Path) -> Result<Mapping> {
    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| ConvertError::malformed(origin, e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConvertError::malformed(
            origin,
            "frontmatter is not a mapping",
        )),
    }
}

/// Split and parse a document.
///
/// Fails with [`ConvertError::MalformedDocument`] when the delimiters are
/// missing or the block is not a YAML mapping.
pub fn parse_document<'a>(content: &'a str, origin: &Path) -> Result<Document<'a>> {
    let split = split_frontmatter(content).ok_or_else(|| {
        ConvertError::malformed(origin, "missing `---` frontmatter delimiters")
    })?;

    Ok(Document {
        frontmatter: parse_mapping(split.yaml, origin)?,
        body: split.body,
    })
}

/// Deserialize a parsed frontmatter mapping into a typed schema.
pub fn frontmatter_as<T: DeserializeOwned>(mapping: Mapping, origin: &Path) -> Result<T> {
    serde_yaml::from_value(Value::Mapping(mapping))
        .map_err(|e| ConvertError::malformed(origin, e.to_string()))
}

/// Whether a YAML 1.1 reader would load `s` as a timestamp rather than a string.
pub fn is_yaml11_timestamp(s: &str) -> bool {
    YAML11_TIMESTAMP.is_match(s)
}

fn mark_timestamps(value: &mut Value, prefix: &str, quoted: &mut Vec<String>) {
    match value {
        Value::String(s) if is_yaml11_timestamp(s) => {
            let marker = format!("{prefix}{}", quoted.len());
            quoted.push(std::mem::replace(s, marker));
        }
        Value::Sequence(seq) => {
            for item in seq {
                mark_timestamps(item, prefix, quoted);
            }
        }
        Value::Mapping(mapping) => {
            for (_, item) in mapping.iter_mut() {
                mark_timestamps(item, prefix, quoted);
            }
        }
        Value::Tagged(tagged) => mark_timestamps(&mut tagged.value, prefix, quoted),
        _ => {}
    }
}

/// Serialize a value to YAML, single-quoting every string that a YAML 1.1
/// reader would otherwise load as a timestamp.
///
/// serde_yaml only quotes strings that are ambiguous under YAML 1.2, so such
/// strings are swapped for plain markers before serializing and replaced by
/// their quoted form afterwards.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String> {
    let mut value = serde_yaml::to_value(value)?;
    let plain = serde_yaml::to_string(&value)?;

    let prefix = (0..)
        .map(|n| format!("zenn2qiita-quoted-{n}-"))
        .find(|prefix| !plain.contains(prefix.as_str()))
        .unwrap_or_default();

    let mut quoted = Vec::new();
    mark_timestamps(&mut value, &prefix, &mut quoted);
    if quoted.is_empty() {
        return Ok(plain);
    }

    let mut yaml = serde_yaml::to_string(&value)?;
    // Highest index first, so `...-1` never matches inside `...-10`.
    for (i, original) in quoted.iter().enumerate().rev() {
        let marker = format!("{prefix}{i}");
        yaml = yaml.replace(&marker, &format!("'{}'", original.replace('\'', "''")));
    }
    trace!("quoted {} timestamp-like scalar(s)", quoted.len());
    Ok(yaml)
}

/// Serialize a value to YAML frontmatter format (with delimiters).
pub fn serialize_frontmatter<T: Serialize>(value: &T) -> Result<String> {
    let yaml = to_yaml_string(value)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
}
