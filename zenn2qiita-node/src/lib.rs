//! Node.js bindings for zenn2qiita.
//!
//! Lets article build scripts written in TypeScript convert Zenn articles
//! without shelling out.

#![deny(clippy::all)]

use napi::bindgen_prelude::*;
use napi_derive::napi;
use std::path::PathBuf;

use zenn2qiita::{ConvertConfig, Converter, ItemId, PriorMetadata};

fn to_napi_error(e: zenn2qiita::ConvertError) -> Error {
    Error::from_reason(e.to_string())
}

fn config_for(output_path: Option<String>) -> ConvertConfig {
    match output_path {
        Some(path) => ConvertConfig::new().with_output_path(PathBuf::from(path)),
        None => ConvertConfig::new(),
    }
}

// ============================================================================
// Types for JavaScript
// ============================================================================

#[napi(object)]
#[derive(Debug, Clone)]
pub struct JsPriorMetadata {
    /// Item id as text; numeric ids are rendered in decimal.
    pub id: Option<String>,
    pub organization_url_name: Option<String>,
}

impl From<PriorMetadata> for JsPriorMetadata {
    fn from(prior: PriorMetadata) -> Self {
        Self {
            id: prior.id.map(|id| match id {
                ItemId::Number(n) => n.to_string(),
                ItemId::Unsigned(n) => n.to_string(),
                ItemId::Text(s) => s,
            }),
            organization_url_name: prior.organization_url_name,
        }
    }
}

// ============================================================================
// Converter Class
// ============================================================================

#[napi]
pub struct FrontmatterConverter {
    converter: Converter,
}

#[napi]
impl FrontmatterConverter {
    /// Create a converter for documents written to `outputPath`.
    #[napi(constructor)]
    pub fn new(output_path: Option<String>) -> Self {
        Self {
            converter: Converter::new(config_for(output_path)),
        }
    }

    #[napi(getter)]
    pub fn output_path(&self) -> Option<String> {
        self.converter
            .config()
            .output_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Convert a Zenn article to a Qiita article.
    #[napi]
    pub fn convert(&self, input: String) -> Result<String> {
        self.converter.convert(&input).map_err(to_napi_error)
    }

    /// Read `id` and `organizationUrlName` from the existing output document.
    #[napi]
    pub fn prior_metadata(&self) -> Result<JsPriorMetadata> {
        self.converter
            .prior_metadata()
            .map(JsPriorMetadata::from)
            .map_err(to_napi_error)
    }
}

// ============================================================================
// Standalone Functions
// ============================================================================

/// Convert a Zenn article in one call.
#[napi]
pub fn convert_frontmatter(input: String, output_path: Option<String>) -> Result<String> {
    Converter::new(config_for(output_path))
        .convert(&input)
        .map_err(to_napi_error)
}
