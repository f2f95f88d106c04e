//! Design-token build pipeline: reads a DTCG / Tokens Studio JSON token
//! tree and renders CSS custom properties and Tailwind typography
//! utilities.
//!
//! ```no_run
//! use tailwind_design_tokens_core::{Config, TokenPipeline};
//!
//! let pipeline = TokenPipeline::new(Config::default());
//! pipeline.clean_all_platforms()?;
//! pipeline.build_all_platforms()?;
//! # Ok::<(), tailwind_design_tokens_core::Error>(())
//! ```

use convert_case::{Boundary, Case, Casing};
use itertools::Itertools;

pub mod config;
pub mod css;
mod error;
pub mod expression;
pub mod extensions;
pub mod formats;
pub mod pipeline;
pub mod preprocess;
pub mod schema;
pub mod source;
pub mod tokens;
pub mod transforms;
mod units;
pub mod utility;

pub use config::{Config, FileConfig, PlatformConfig, PlatformOptions};
pub use error::{Error, Result};
pub use formats::{Format, FormatContext, FormatRegistry};
pub use pipeline::{RenderedFile, TokenPipeline};
pub use schema::TokenType;
pub use tokens::{Dictionary, Token, TokenValue};
pub use transforms::{Transform, TransformRegistry};

// Digits stay attached to their word: `h1`, `2xl`, `500`.
const WORD_BOUNDARIES: [Boundary; 4] = [
    Boundary::Hyphen,
    Boundary::Underscore,
    Boundary::Space,
    Boundary::LowerUpper,
];

// Anything left that is not `[a-z0-9]` collapses to a single `-`, so scale
// keys like `1/2` or `0.5` stay valid identifiers.
fn kebab(s: &str) -> String {
    slug::slugify(
        deunicode::deunicode(s)
            .with_boundaries(&WORD_BOUNDARIES)
            .to_case(Case::Kebab),
    )
}

/// CSS identifier for a token path: `["colors", "brandPrimary", "500"]`
/// becomes `colors-brand-primary-500`.
pub fn css_name(path: &[String]) -> String {
    path.iter().map(|segment| kebab(segment)).join("-")
}

/// CSS property for a composite key: `fontFamily` becomes `font-family`.
pub fn css_property(key: &str) -> String {
    if key.starts_with("--") {
        key.to_string()
    } else {
        kebab(key)
    }
}
