//! PII masking engine for support emails.
//!
//! Raw text flows through the pattern registry, the span scanner and the
//! overlap resolver; the masker swaps each resolved span for a `[tag]`
//! placeholder and the demasker reverses that using the entity list alone.

pub mod classifier;
pub mod detector;
pub mod error;
pub mod offsets;
pub mod patterns;
pub mod policy;
pub mod redactor;
pub mod types;

use std::sync::LazyLock;

pub use classifier::{CategoryClassifier, ModelArtifact, TfidfLinearClassifier};
pub use detector::{resolve_overlaps, scan, Candidate, Detector};
pub use error::{ClassifierError, MaskError};
pub use patterns::{GroupSelector, PatternRegistry, PatternRule};
pub use policy::{MaskingPolicy, PolicyBuilder};
pub use redactor::{apply_masks, demask_detailed, Demasked, Redactor};
pub use types::{MaskedEmail, PiiType, ResolvedEntity};

static DEFAULT_REDACTOR: LazyLock<Redactor> = LazyLock::new(Redactor::default);

/// Mask PII with the built-in registry and default policy
pub fn mask(text: &str) -> MaskedEmail {
    DEFAULT_REDACTOR.mask(text)
}

/// Restore text produced by [`mask`]
pub fn demask(masked_text: &str, entities: &[ResolvedEntity]) -> String {
    DEFAULT_REDACTOR.demask(masked_text, entities)
}
