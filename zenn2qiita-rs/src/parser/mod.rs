//! Parsers for Markdown documents with YAML frontmatter.

pub mod frontmatter;

pub use frontmatter::{
    Document, FrontmatterSplit, frontmatter_as, is_yaml11_timestamp, parse_document, parse_mapping,
    serialize_frontmatter, split_frontmatter, to_yaml_string,
};
