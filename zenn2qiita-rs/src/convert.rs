//! Zenn to Qiita frontmatter conversion.

use crate::clock::{Clock, SystemClock, format_timestamp};
use crate::config::ConvertConfig;
use crate::error::{INPUT_ORIGIN, Result};
use crate::parser::{frontmatter_as, parse_document, serialize_frontmatter};
use crate::store::{FsStore, PriorStore};
use crate::types::{PriorMetadata, QiitaFrontmatter, ZennFrontmatter};
use log::debug;
use std::path::Path;

/// A converted document: the new frontmatter and the untouched body.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedDocument<'a> {
    pub frontmatter: QiitaFrontmatter,
    pub body: &'a str,
}

impl ConvertedDocument<'_> {
    /// Render the document as frontmatter block followed by the body.
    pub fn render(&self) -> Result<String> {
        let mut out = serialize_frontmatter(&self.frontmatter)?;
        out.push_str(self.body);
        Ok(out)
    }
}

/// Converts Zenn articles to Qiita CLI articles.
///
/// Built once from a [`ConvertConfig`], then applied to any number of inputs.
/// Holds no mutable state.
#[derive(Debug, Clone)]
pub struct Converter<S = FsStore, C = SystemClock> {
    config: ConvertConfig,
    store: S,
    clock: C,
}

impl Converter {
    /// Create a converter reading prior output from the filesystem and
    /// stamping with the system clock.
    pub fn new(config: ConvertConfig) -> Self {
        Self::with_parts(config, FsStore, SystemClock)
    }
}

impl<S: PriorStore, C: Clock> Converter<S, C> {
    pub fn with_parts(config: ConvertConfig, store: S, clock: C) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    /// Replace the prior-output store.
    pub fn with_store<T: PriorStore>(self, store: T) -> Converter<T, C> {
        Converter::with_parts(self.config, store, self.clock)
    }

    /// Replace the clock.
    pub fn with_clock<T: Clock>(self, clock: T) -> Converter<S, T> {
        Converter::with_parts(self.config, self.store, clock)
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Look up `id` and `organization_url_name` in the prior output, if any.
    pub fn prior_metadata(&self) -> Result<PriorMetadata> {
        let Some(path) = self.config.output_path.as_deref() else {
            return Ok(PriorMetadata::default());
        };

        let Some(content) = self.store.read_prior(path)? else {
            debug!("no prior output at {}", path.display());
            return Ok(PriorMetadata::default());
        };

        let doc = parse_document(&content, path)?;
        let prior: PriorMetadata = frontmatter_as(doc.frontmatter, path)?;
        debug!(
            "prior output at {}: id={:?} organization_url_name={:?}",
            path.display(),
            prior.id,
            prior.organization_url_name
        );
        Ok(prior)
    }

    /// Convert `input` into its typed Qiita frontmatter and body.
    pub fn convert_document<'a>(&self, input: &'a str) -> Result<ConvertedDocument<'a>> {
        let origin = Path::new(INPUT_ORIGIN);
        let doc = parse_document(input, origin)?;
        let source: ZennFrontmatter = frontmatter_as(doc.frontmatter, origin)?;

        let prior = self.prior_metadata()?;
        let frontmatter = source.into_qiita(prior, format_timestamp(self.clock.now()));
        debug!(
            "converted frontmatter: private={} tags={:?}",
            frontmatter.private, frontmatter.tags
        );

        Ok(ConvertedDocument {
            frontmatter,
            body: doc.body,
        })
    }

    /// Convert `input` and render the resulting document.
    pub fn convert(&self, input: &str) -> Result<String> {
        self.convert_document(input)?.render()
    }
}

/// Build a conversion function for documents written to `output_path`.
///
/// The returned function owns its configuration and does not borrow `output_path`.
pub fn convert_frontmatter(output_path: Option<&Path>) -> impl Fn(&str) -> Result<String> + use<> {
    let config = match output_path {
        Some(path) => ConvertConfig::new().with_output_path(path),
        None => ConvertConfig::new(),
    };
    let converter = Converter::new(config);
    move |input| converter.convert(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ConvertError;
    use crate::types::ItemId;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_yaml::{Mapping, Value};
    use std::collections::HashMap;
    use std::path::PathBuf;

    const MOCK_DATE: &str = "2023-01-01T00:00:00.000Z";

    fn converter(
        output_path: Option<&str>,
        prior: &[(&str, &str)],
    ) -> Converter<HashMap<PathBuf, String>, FixedClock> {
        let config = match output_path {
            Some(path) => ConvertConfig::new().with_output_path(path),
            None => ConvertConfig::new(),
        };
        let store = prior
            .iter()
            .map(|(path, content)| (PathBuf::from(path), content.to_string()))
            .collect();
        let clock = FixedClock(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        Converter::with_parts(config, store, clock)
    }

    fn parse_output(output: &str) -> (Mapping, String) {
        let doc = parse_document(output, Path::new("<output>")).unwrap();
        (doc.frontmatter, doc.body.to_string())
    }

    #[test]
    fn test_new_file() {
        let input = "---\nemoji: \"🚀\"\ntitle: \"Test Title\"\ntype: \"tech\"\npublished: true\ntopics:\n  - \"javascript\"\n  - \"typescript\"\n---\n# Hello\n";
        let (data, body) = parse_output(&converter(None, &[]).convert(input).unwrap());

        for dropped in ["emoji", "type", "published", "topics"] {
            assert!(!data.contains_key(dropped), "{dropped} should be dropped");
        }
        assert_eq!(data["private"], Value::Bool(false));
        assert_eq!(
            data["tags"],
            serde_yaml::from_str::<Value>("[javascript, typescript]").unwrap()
        );
        assert_eq!(data["updated_at"].as_str(), Some(MOCK_DATE));
        assert!(data["id"].is_null());
        assert!(data["organization_url_name"].is_null());
        assert_eq!(data["slide"], Value::Bool(false));
        assert_eq!(data["title"].as_str(), Some("Test Title"));
        assert_eq!(body.trim(), "# Hello");
    }

    #[test]
    fn test_preserves_prior_metadata() {
        let input = "---\nemoji: \"🚀\"\ntitle: \"Test Title\"\npublished: true\ntopics:\n  - \"javascript\"\nid: 999\norganization_url_name: other\n---\n# Hello\n";
        let existing = "---\nupdated_at: \"2022-01-01T00:00:00.000Z\"\nid: 123\norganization_url_name: \"test-org\"\n---\nExisting content\n";
        let conv = converter(Some("/path/to/existing.md"), &[("/path/to/existing.md", existing)]);

        let doc = conv.convert_document(input).unwrap();
        assert_eq!(doc.frontmatter.updated_at, MOCK_DATE);
        assert_eq!(doc.frontmatter.id, Some(ItemId::Number(123)));
        assert_eq!(doc.frontmatter.organization_url_name.as_deref(), Some("test-org"));

        let (data, _) = parse_output(&doc.render().unwrap());
        assert_eq!(data["id"].as_i64(), Some(123));
        assert_eq!(data["organization_url_name"].as_str(), Some("test-org"));
    }

    #[test]
    fn test_missing_prior_output() {
        let input = "---\ntitle: \"Test Title\"\ntopics: []\n---\n# Hello\n";
        let (data, _) = parse_output(&converter(Some("/path/to/new.md"), &[]).convert(input).unwrap());

        assert_eq!(data["updated_at"].as_str(), Some(MOCK_DATE));
        assert!(data["id"].is_null());
        assert!(data["organization_url_name"].is_null());
    }

    #[test]
    fn test_prior_output_without_fields() {
        let conv = converter(Some("public/a.md"), &[("public/a.md", "---\ntitle: Old\n---\nOld\n")]);
        assert_eq!(conv.prior_metadata().unwrap(), PriorMetadata::default());
    }

    #[test]
    fn test_pass_through_types() {
        let input = "---\ntitle: \"Another Title\"\nnumber_field: 123\nboolean_field: true\narray_field:\n  - item1\n  - item2\ntopics: []\n---\nContent\n";
        let (data, _) = parse_output(&converter(None, &[]).convert(input).unwrap());

        assert_eq!(data["title"].as_str(), Some("Another Title"));
        assert_eq!(data["number_field"].as_i64(), Some(123));
        assert_eq!(data["boolean_field"], Value::Bool(true));
        assert_eq!(
            data["array_field"],
            serde_yaml::from_str::<Value>("[item1, item2]").unwrap()
        );
    }

    #[test]
    fn test_empty_frontmatter() {
        let input = "---\ntopics: []\n---\nContent\n";
        let (data, body) = parse_output(&converter(None, &[]).convert(input).unwrap());

        assert_eq!(data.len(), 6);
        assert_eq!(data["updated_at"].as_str(), Some(MOCK_DATE));
        assert!(data["id"].is_null());
        assert!(data["organization_url_name"].is_null());
        assert_eq!(data["slide"], Value::Bool(false));
        assert_eq!(data["private"], Value::Bool(true));
        assert_eq!(data["tags"], Value::Sequence(Vec::new()));
        assert_eq!(body, "Content\n");
    }

    #[test]
    fn test_title_only_with_empty_topics_has_seven_keys() {
        let input = "---\ntitle: \"T\"\ntopics: []\n---\nContent\n";
        let (data, body) = parse_output(&converter(None, &[]).convert(input).unwrap());
        assert_eq!(data.len(), 7);
        assert_eq!(body, "Content\n");
    }

    #[test]
    fn test_no_topics_means_no_tags() {
        let input = "---\ntitle: T\npublished: false\n---\nBody";
        let (data, _) = parse_output(&converter(None, &[]).convert(input).unwrap());
        assert!(!data.contains_key("tags"));
        assert_eq!(data["private"], Value::Bool(true));
    }

    #[test]
    fn test_input_updated_at_is_replaced() {
        let input = "---\nupdated_at: \"2020-05-05T00:00:00.000Z\"\nslide: true\n---\n";
        let doc = converter(None, &[]).convert_document(input).unwrap();
        assert_eq!(doc.frontmatter.updated_at, MOCK_DATE);
        assert!(!doc.frontmatter.slide);
    }

    #[test]
    fn test_body_passes_through_unchanged() {
        let body = "\n\n# Title\n\n```yaml\n---\nkey: value\n---\n```\n\n";
        let input = format!("---\ntitle: T\n---\n{body}");
        let output = converter(None, &[]).convert(&input).unwrap();
        assert!(output.ends_with(body));
        assert_eq!(parse_output(&output).1, body);
    }

    #[test]
    fn test_malformed_input_fails() {
        let err = converter(None, &[]).convert("# No frontmatter\n").unwrap_err();
        assert!(err.is_malformed());

        let err = converter(None, &[])
            .convert("---\npublished: \"yes please\"\n---\n")
            .unwrap_err();
        assert!(err.is_malformed());

        let err = converter(None, &[])
            .convert("---\ntopics: rust\n---\n")
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_malformed_prior_output_fails() {
        let conv = converter(Some("public/a.md"), &[("public/a.md", "no frontmatter here")]);
        let err = conv.convert("---\ntitle: T\n---\n").unwrap_err();
        match err {
            ConvertError::MalformedDocument { origin, .. } => {
                assert_eq!(origin, PathBuf::from("public/a.md"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_converter_is_reusable() {
        let conv = converter(None, &[]);
        let first = conv.convert("---\ntitle: A\n---\nA").unwrap();
        let second = conv.convert("---\ntitle: B\n---\nB").unwrap();
        assert!(first.contains("title: A"));
        assert!(second.contains("title: B"));
    }

    #[test]
    fn test_updated_at_is_quoted_for_yaml11_readers() {
        let input = "---\ntitle: \"T\"\nflag: \"yes\"\ntopics: []\n---\nContent\n";
        let output = converter(None, &[]).convert(input).unwrap();
        assert!(output.starts_with("---\nupdated_at: '2023-01-01T00:00:00.000Z'\n"));
        assert!(output.ends_with("---\nContent\n"));
    }

    #[test]
    fn test_timestamp_like_pass_through_stays_quoted() {
        let input = "---\ntitle: T\ndate: \"2023-01-01\"\npublished_at: \"2024-05-06 07:08:09\"\nnote: \"2023-01-01 is new year\"\n---\n";
        let output = converter(None, &[]).convert(input).unwrap();

        assert!(output.contains("\ndate: '2023-01-01'\n"));
        assert!(output.contains("\npublished_at: '2024-05-06 07:08:09'\n"));
        assert!(output.contains("\nnote: 2023-01-01 is new year\n"));

        let (data, _) = parse_output(&output);
        assert_eq!(data["date"].as_str(), Some("2023-01-01"));
        assert_eq!(data["published_at"].as_str(), Some("2024-05-06 07:08:09"));
    }

    #[test]
    fn test_convert_frontmatter_outlives_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let convert = {
            let path = dir.path().join("missing.md");
            convert_frontmatter(Some(path.as_path()))
        };
        let (data, _) = parse_output(&convert("---\ntitle: T\n---\n").unwrap());
        assert!(data["id"].is_null());
    }
}
