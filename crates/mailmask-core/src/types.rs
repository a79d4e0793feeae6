use serde::{Deserialize, Serialize};
use std::fmt;

/// PII categories detected in support emails.
///
/// Design principles:
/// - Closed set: every tag has exactly one built-in pattern rule
/// - Variants are `Copy` (no heap allocations in the enum)
/// - Serialized as the snake_case tag, which is also the placeholder body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiType {
    CreditDebitCardNumber,
    AadharCardNumber,
    PhoneNumber,
    Email,
    CardExpiryNumber,
    Dob,
    CvvNumber,
    FullName,
}

impl PiiType {
    /// Every type, in registry order.
    pub const ALL: [PiiType; 8] = [
        Self::CreditDebitCardNumber,
        Self::AadharCardNumber,
        Self::PhoneNumber,
        Self::Email,
        Self::CardExpiryNumber,
        Self::Dob,
        Self::CvvNumber,
        Self::FullName,
    ];

    /// Classification tag reported to callers
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CreditDebitCardNumber => "credit_debit_card_number",
            Self::AadharCardNumber => "aadhar_card_number",
            Self::PhoneNumber => "phone_number",
            Self::Email => "email",
            Self::CardExpiryNumber => "card_expiry_number",
            Self::Dob => "dob",
            Self::CvvNumber => "cvv_number",
            Self::FullName => "full_name",
        }
    }

    /// Placeholder substituted for a masked entity, always `[tag]`
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::CreditDebitCardNumber => "[credit_debit_card_number]",
            Self::AadharCardNumber => "[aadhar_card_number]",
            Self::PhoneNumber => "[phone_number]",
            Self::Email => "[email]",
            Self::CardExpiryNumber => "[card_expiry_number]",
            Self::Dob => "[dob]",
            Self::CvvNumber => "[cvv_number]",
            Self::FullName => "[full_name]",
        }
    }

    /// Look a type up by its classification tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A finalized, non-overlapping PII occurrence.
///
/// `position` is a half-open range of character offsets (Unicode scalar
/// values, not UTF-8 bytes) into the original text. The list of these is
/// the only record the demasker needs to restore the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub position: (usize, usize),
    pub classification: PiiType,
    pub entity: String,
}

impl ResolvedEntity {
    pub fn start(&self) -> usize {
        self.position.0
    }

    pub fn end(&self) -> usize {
        self.position.1
    }
}

/// Output of a masking pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedEmail {
    pub masked_text: String,
    pub entities: Vec<ResolvedEntity>,
}
