use std::borrow::Cow;

use zeroize::Zeroize;

use crate::{
    offsets::TextIndex,
    patterns::PatternRegistry,
    policy::MaskingPolicy,
    types::{PiiType, ResolvedEntity},
};

/// Unresolved PII occurrence, possibly overlapping other candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub pii_type: PiiType,
    pub start: usize,            // character offset
    pub end: usize,              // character offset, exclusive
    pub entity_text: String,     // zeroized on drop
    pub full_match_text: String, // zeroized on drop
}

impl Candidate {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start.max(start) < self.end.min(end)
    }
}

impl Zeroize for Candidate {
    fn zeroize(&mut self) {
        self.entity_text.zeroize();
        self.full_match_text.zeroize();
    }
}

impl Drop for Candidate {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Run every enabled rule independently over the text.
///
/// Each rule does its own exhaustive left-to-right scan; matches of one
/// rule never suppress matches of another here.
pub fn scan(registry: &PatternRegistry, policy: &MaskingPolicy, text: &str) -> Vec<Candidate> {
    let index = TextIndex::new(text);
    let mut candidates = Vec::new();

    for rule in registry.rules() {
        if !policy.is_enabled(rule.pii_type) {
            continue;
        }
        for caps in rule.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let (start, end) = rule.group.select(&caps);
            if start >= end {
                continue;
            }
            candidates.push(Candidate {
                pii_type: rule.pii_type,
                start: index.char_offset(start),
                end: index.char_offset(end),
                entity_text: text[start..end].to_string(),
                full_match_text: whole.as_str().to_string(),
            });
        }
    }

    tracing::debug!(candidates = candidates.len(), "scanned text for PII");
    candidates
}

/// Resolve overlapping candidates into a disjoint, start-ordered list.
///
/// Candidates are swept by start ascending, then length descending; a
/// candidate is kept iff it overlaps nothing kept so far. Equal start and
/// length keeps scanner order, so the earlier registry rule wins.
pub fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<ResolvedEntity> {
    if candidates.is_empty() {
        return Vec::new();
    }

    // Stable sort: ties fall back to registry order
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.len().cmp(&a.len())));

    let mut accepted: Vec<&Candidate> = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        // Accepted spans are disjoint and sorted, so the last one has the
        // greatest end of all of them.
        let blocked = accepted
            .last()
            .is_some_and(|last| candidate.overlaps(last.start, last.end));
        if !blocked {
            accepted.push(candidate);
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        resolved = accepted.len(),
        "resolved overlapping candidates"
    );

    accepted
        .into_iter()
        .map(|c| ResolvedEntity {
            position: (c.start, c.end),
            classification: c.pii_type,
            entity: c.entity_text.clone(),
        })
        .collect()
}

/// Scanner and resolver bound to one registry and policy
#[derive(Debug, Clone)]
pub struct Detector {
    registry: Cow<'static, PatternRegistry>,
    policy: MaskingPolicy,
}

impl Detector {
    pub fn new(registry: PatternRegistry, policy: MaskingPolicy) -> Self {
        Self {
            registry: Cow::Owned(registry),
            policy,
        }
    }

    /// Detector over the shared built-in registry
    pub fn builtin(policy: MaskingPolicy) -> Self {
        Self {
            registry: Cow::Borrowed(PatternRegistry::shared()),
            policy,
        }
    }

    /// Detect PII, returning sorted, non-overlapping entities
    pub fn detect(&self, text: &str) -> Vec<ResolvedEntity> {
        resolve_overlaps(scan(&self.registry, &self.policy, text))
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::builtin(MaskingPolicy::default())
    }
}
