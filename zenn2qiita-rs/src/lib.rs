//! zenn2qiita - Convert Zenn article frontmatter to the Qiita CLI schema.
//!
//! # Overview
//!
//! A Zenn article starts with frontmatter like:
//!
//! ```yaml
//! emoji: "🚀"
//! title: "Hello"
//! type: "tech"
//! topics: ["rust"]
//! published: true
//! ```
//!
//! Conversion drops `emoji` and `type`, turns `published` into `private`,
//! `topics` into `tags`, stamps `updated_at`, sets `slide: false`, and carries
//! `id` and `organization_url_name` forward from a document already present
//! at the output path. Every other key and the body are kept as they are.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use zenn2qiita::{ConvertConfig, Converter};
//!
//! let input = std::fs::read_to_string("articles/hello.md").unwrap();
//!
//! let config = ConvertConfig::new().with_output_path("public/hello.md");
//! let converter = Converter::new(config);
//! let output = converter.convert(&input).unwrap();
//!
//! // Or in one step:
//! let output = zenn2qiita::convert_frontmatter(Some(Path::new("public/hello.md")))(input.as_str()).unwrap();
//! ```

pub mod clock;
pub mod config;
pub mod convert;
pub mod error;
pub mod parser;
pub mod store;
pub mod types;

// Re-export main types at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ConvertConfig;
pub use convert::{ConvertedDocument, Converter, convert_frontmatter};
pub use error::{ConvertError, Result};
pub use store::{FsStore, PriorStore};
pub use types::{ItemId, PriorMetadata, QiitaFrontmatter, ZennFrontmatter};
