use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{error::MaskError, types::PiiType};

/// Which part of a regex match is the actual entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSelector {
    /// The whole match is the entity
    WholeMatch,
    /// Capture group `n` is the entity; falls back to the whole match when
    /// the group did not participate or matched nothing
    Capture(usize),
}

impl GroupSelector {
    /// Byte range of the entity within the text
    pub fn select(&self, caps: &Captures<'_>) -> (usize, usize) {
        let whole = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        match self {
            Self::WholeMatch => whole,
            Self::Capture(n) => match caps.get(*n) {
                Some(group) if !group.is_empty() => (group.start(), group.end()),
                _ => whole,
            },
        }
    }
}

/// One entry of the registry: tag, matcher and extraction rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub pii_type: PiiType,
    pub regex: Regex,
    pub group: GroupSelector,
}

impl PatternRule {
    pub fn new(pii_type: PiiType, pattern: &str, group: GroupSelector) -> Result<Self, MaskError> {
        let regex =
            Regex::new(pattern).map_err(|source| MaskError::Pattern { pii_type, source })?;
        Ok(Self {
            pii_type,
            regex,
            group,
        })
    }

    pub fn placeholder(&self) -> &'static str {
        self.pii_type.placeholder()
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

// 16 digits in groups of four, optional space/hyphen separators
const CREDIT_DEBIT_CARD: &str = r"\b(?:\d{4}[ -]?){3}\d{4}\b";

// 12 digits, optionally 4-4-4
const AADHAR_CARD: &str = r"\b\d{4}\s?\d{4}\s?\d{4}\b";

// `+` and `(` are not word characters, so the boundary sits after them
const PHONE_NUMBER: &str = concat!(
    r"(?:\+\d{1,3}[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b",
    r"|\b\d{5}\s\d{6}\b",
    r"|\b\d{10,11}\b",
);

const EMAIL: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

// MM-YY / MM/YYYY. Two-digit years start at 20 so that days are not taken.
const CARD_EXPIRY: &str = r"\b(?:0[1-9]|1[0-2])[-/](?:[12]\d{3}|[2-9]\d)\b";

const DOB: &str = r"\b\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b";

const CVV: &str = r"(?i)\b(?:CVV|CVC|Security Code|CSC|CID)[\s:#-]*(\d{3,4})\b";

/// Ordered catalogue of PII detectors.
///
/// Order is only a tie-break input for overlap resolution: among candidates
/// with the same start and length, the earlier rule wins.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    rules: Vec<PatternRule>,
}

impl PatternRegistry {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// The eight built-in support-email rules
    pub fn builtin() -> Result<Self, MaskError> {
        use GroupSelector::{Capture, WholeMatch};

        let table: [(PiiType, &str, GroupSelector); 8] = [
            (PiiType::CreditDebitCardNumber, CREDIT_DEBIT_CARD, WholeMatch),
            (PiiType::AadharCardNumber, AADHAR_CARD, WholeMatch),
            (PiiType::PhoneNumber, PHONE_NUMBER, WholeMatch),
            (PiiType::Email, EMAIL, WholeMatch),
            (PiiType::CardExpiryNumber, CARD_EXPIRY, WholeMatch),
            (PiiType::Dob, DOB, WholeMatch),
            (PiiType::CvvNumber, CVV, Capture(1)),
            (PiiType::FullName, FULL_NAME, Capture(1)),
        ];

        let rules = table
            .into_iter()
            .map(|(pii_type, pattern, group)| PatternRule::new(pii_type, pattern, group))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Shared, lazily compiled built-in registry
    pub fn shared() -> &'static PatternRegistry {
        static BUILTIN: LazyLock<PatternRegistry> = LazyLock::new(|| {
            PatternRegistry::builtin().expect("built-in PII patterns should always compile")
        });
        &BUILTIN
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }
}
