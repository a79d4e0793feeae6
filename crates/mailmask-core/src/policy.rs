use crate::types::PiiType;
use std::collections::BTreeSet;

/// Masking policy – defines WHICH PII types are scanned for.
///
/// Placeholders are not configurable: the demasker relies on every masked
/// span reading back as `[tag]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskingPolicy {
    /// Enabled PII types (default: all built-in types)
    enabled_types: BTreeSet<PiiType>,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self {
            enabled_types: PiiType::ALL.into_iter().collect(),
        }
    }
}

impl MaskingPolicy {
    /// Builder pattern for ergonomic configuration
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Policy that scans for nothing, to be filled in with `enable`
    pub fn none() -> Self {
        Self {
            enabled_types: BTreeSet::new(),
        }
    }

    /// Check if a PII type should be scanned for
    pub fn is_enabled(&self, pii_type: PiiType) -> bool {
        self.enabled_types.contains(&pii_type)
    }

    /// Enabled types in registry order
    pub fn enabled_types(&self) -> impl Iterator<Item = PiiType> + '_ {
        self.enabled_types.iter().copied()
    }
}

/// Builder for MaskingPolicy – enables fluent configuration
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy: MaskingPolicy,
}

impl PolicyBuilder {
    /// Start from an empty policy instead of the default
    pub fn only(types: impl IntoIterator<Item = PiiType>) -> Self {
        Self {
            policy: MaskingPolicy {
                enabled_types: types.into_iter().collect(),
            },
        }
    }

    pub fn enable(mut self, pii_type: PiiType) -> Self {
        self.policy.enabled_types.insert(pii_type);
        self
    }

    pub fn disable(mut self, pii_type: PiiType) -> Self {
        self.policy.enabled_types.remove(&pii_type);
        self
    }

    pub fn build(self) -> MaskingPolicy {
        self.policy
    }
}

/// Predefined profiles
impl MaskingPolicy {
    /// Payment data only: card number, expiry and CVV
    pub fn payment_card() -> Self {
        PolicyBuilder::only([
            PiiType::CreditDebitCardNumber,
            PiiType::CardExpiryNumber,
            PiiType::CvvNumber,
        ])
        .build()
    }

    /// Contact details only: email, phone and name
    pub fn contact() -> Self {
        PolicyBuilder::only([PiiType::Email, PiiType::PhoneNumber, PiiType::FullName]).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_enables_all_types() {
        let policy = MaskingPolicy::default();
        for t in PiiType::ALL {
            assert!(policy.is_enabled(t), "{t} should be enabled");
        }
        assert_eq!(policy.enabled_types().collect::<Vec<_>>(), PiiType::ALL.to_vec());
    }

    #[test]
    fn test_builder_disable_and_enable() {
        let policy = MaskingPolicy::builder()
            .disable(PiiType::Dob)
            .disable(PiiType::FullName)
            .enable(PiiType::FullName)
            .build();
        assert!(!policy.is_enabled(PiiType::Dob));
        assert!(policy.is_enabled(PiiType::FullName));
    }

    #[test]
    fn test_none_policy_is_empty() {
        assert_eq!(MaskingPolicy::none().enabled_types().count(), 0);
    }

    #[test]
    fn test_payment_profile() {
        let policy = MaskingPolicy::payment_card();
        assert!(policy.is_enabled(PiiType::CvvNumber));
        assert!(!policy.is_enabled(PiiType::Email));
    }

    #[test]
    fn test_contact_profile() {
        let policy = MaskingPolicy::contact();
        assert!(policy.is_enabled(PiiType::FullName));
        assert!(!policy.is_enabled(PiiType::AadharCardNumber));
    }
}
