use crate::{
    detector::Detector,
    error::MaskError,
    offsets::TextIndex,
    patterns::PatternRegistry,
    policy::MaskingPolicy,
    types::{MaskedEmail, ResolvedEntity},
};

/// Core masking engine – orchestrates detection, masking and demasking.
///
/// Holds no per-call state, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    detector: Detector,
}

/// Result of a demasking pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demasked {
    pub text: String,
    /// Entities whose placeholder was not found; left out of `text`
    pub unresolved: usize,
}

impl Redactor {
    /// Create a redactor over a custom registry and policy
    pub fn new(registry: PatternRegistry, policy: MaskingPolicy) -> Self {
        Self {
            detector: Detector::new(registry, policy),
        }
    }

    /// Redactor over the built-in registry
    pub fn with_policy(policy: MaskingPolicy) -> Self {
        Self {
            detector: Detector::builtin(policy),
        }
    }

    /// Detect and mask PII. Returns the input unchanged when nothing is found.
    pub fn mask(&self, text: &str) -> MaskedEmail {
        if text.is_empty() {
            return MaskedEmail {
                masked_text: String::new(),
                entities: Vec::new(),
            };
        }

        let entities = self.detector.detect(text);
        let masked_text = build_masked(text, &TextIndex::new(text), &entities);
        tracing::debug!(entities = entities.len(), "masked text");

        MaskedEmail {
            masked_text,
            entities,
        }
    }

    /// Restore the original text. Missing placeholders are skipped silently.
    pub fn demask(&self, masked_text: &str, entities: &[ResolvedEntity]) -> String {
        demask_detailed(masked_text, entities).text
    }
}

/// Replace each entity span with its placeholder.
///
/// `entities` must be sorted by start, non-overlapping and within the
/// text; anything else is rejected.
pub fn apply_masks(text: &str, entities: &[ResolvedEntity]) -> Result<String, MaskError> {
    let index = TextIndex::new(text);
    let len = index.char_len();
    let mut previous_end = 0;

    for entity in entities {
        let (start, end) = entity.position;
        if start >= end {
            return Err(MaskError::EmptySpan { start, end });
        }
        if end > len {
            return Err(MaskError::SpanOutOfBounds { start, end, len });
        }
        if start < previous_end {
            return Err(MaskError::OverlappingSpans {
                start,
                end,
                previous_end,
            });
        }
        previous_end = end;
    }

    Ok(build_masked(text, &index, entities))
}

fn build_masked(text: &str, index: &TextIndex, entities: &[ResolvedEntity]) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_idx = 0;

    for entity in entities {
        let (Some(start), Some(end)) = (
            index.byte_offset(entity.start()),
            index.byte_offset(entity.end()),
        ) else {
            continue;
        };

        if start > last_idx {
            result.push_str(&text[last_idx..start]);
        }
        result.push_str(entity.classification.placeholder());
        last_idx = end;
    }

    if last_idx < text.len() {
        result.push_str(&text[last_idx..]);
    }

    result
}

/// Reverse `mask`, reporting how many entities could not be placed.
///
/// Each entity's placeholder offset in the masked text follows from its
/// original position plus the length change of every placeholder before it.
/// Entities are restored right to left at that offset. When the placeholder
/// is not there (entities that did not come from this text), the right-most
/// occurrence before the previously restored entity is used instead, so
/// restored text is never searched again.
pub fn demask_detailed(masked_text: &str, entities: &[ResolvedEntity]) -> Demasked {
    let mut ordered: Vec<&ResolvedEntity> = entities.iter().collect();
    ordered.sort_by_key(|e| e.start());

    let index = TextIndex::new(masked_text);
    let mut shift: isize = 0;
    let mut expected = Vec::with_capacity(ordered.len());
    for entity in &ordered {
        let at = entity.start() as isize + shift;
        expected.push(usize::try_from(at).ok().and_then(|ch| index.byte_offset(ch)));
        let placeholder_len = entity.classification.placeholder().chars().count() as isize;
        shift += placeholder_len - (entity.end() as isize - entity.start() as isize);
    }

    let mut text = masked_text.to_string();
    let mut limit = text.len();
    let mut unresolved = 0;

    for (entity, expected) in ordered.into_iter().zip(expected).rev() {
        let placeholder = entity.classification.placeholder();
        let slot = expected
            .filter(|at| at + placeholder.len() <= limit && text[*at..].starts_with(placeholder))
            .or_else(|| text[..limit].rfind(placeholder));
        match slot {
            Some(at) => {
                text.replace_range(at..at + placeholder.len(), &entity.entity);
                limit = at;
            }
            None => unresolved += 1,
        }
    }

    if unresolved > 0 {
        tracing::warn!(unresolved, "placeholders missing during demask");
    }

    Demasked { text, unresolved }
}
