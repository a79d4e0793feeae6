//! End-to-end tests for the masking engine.
//!
//! Each test targets a behavior callers rely on:
//! - Support-email scenarios produce the expected placeholders and values
//! - Overlapping shapes keep the earliest, longest span
//! - Multi-byte text reports character positions
//! - Demasking tolerates missing placeholders
//! - The shared engine is safe to call from many threads

use std::sync::Arc;
use std::thread;

use mailmask_core::{
    demask, demask_detailed, mask, CategoryClassifier, MaskingPolicy, PiiType, Redactor,
    ResolvedEntity,
};

fn classifications(entities: &[ResolvedEntity]) -> Vec<PiiType> {
    entities.iter().map(|e| e.classification).collect()
}

#[test]
fn contact_details_are_masked_and_restored() {
    let input = "Contact me at jane.doe@example.com or 9876543210.";
    let result = mask(input);

    assert_eq!(result.masked_text, "Contact me at [email] or [phone_number].");
    assert_eq!(
        classifications(&result.entities),
        vec![PiiType::Email, PiiType::PhoneNumber]
    );
    assert_eq!(result.entities[0].entity, "jane.doe@example.com");
    assert_eq!(result.entities[1].entity, "9876543210");
    assert_eq!(demask(&result.masked_text, &result.entities), input);
}

#[test]
fn name_cue_is_not_part_of_entity() {
    let result = mask("My name is John Smith, DOB 15/08/1990.");
    let full_name = result.masked_text.find("[full_name]").unwrap();
    let dob = result.masked_text.find("[dob]").unwrap();
    assert!(full_name < dob);
    assert!(result
        .entities
        .iter()
        .any(|e| e.classification == PiiType::FullName && e.entity == "John Smith"));
    assert!(result
        .entities
        .iter()
        .any(|e| e.classification == PiiType::Dob && e.entity == "15/08/1990"));
}

#[test]
fn cvv_keyword_is_not_part_of_entity() {
    let result = mask("CVV 123 for card 4111 1111 1111 1111.");
    let cvv = result
        .entities
        .iter()
        .find(|e| e.classification == PiiType::CvvNumber)
        .unwrap();
    assert_eq!(cvv.entity, "123");
    let card = result
        .entities
        .iter()
        .find(|e| e.classification == PiiType::CreditDebitCardNumber)
        .unwrap();
    assert_eq!(card.entity, "4111 1111 1111 1111");
}

#[test]
fn full_support_email_round_trip() {
    let input = "Hello team,\n\nMy name is Priya Sharma and my card 5500-0000-0000-0004 \
                 (expiry 09/27, security code 321) was charged twice. My Aadhar is \
                 1234 5678 9012 and I was born on 3.7.1988. Reach me at \
                 priya.sharma@mail.co.in or 9876543210.\n\nThanks";
    let result = mask(input);

    let kinds = classifications(&result.entities);
    for expected in [
        PiiType::FullName,
        PiiType::CreditDebitCardNumber,
        PiiType::CardExpiryNumber,
        PiiType::CvvNumber,
        PiiType::AadharCardNumber,
        PiiType::Dob,
        PiiType::Email,
        PiiType::PhoneNumber,
    ] {
        assert!(kinds.contains(&expected), "missing {expected}: {kinds:?}");
    }
    assert!(!result.masked_text.contains("priya.sharma"));
    assert!(!result.masked_text.contains("5500-0000"));
    assert_eq!(demask(&result.masked_text, &result.entities), input);
}

#[test]
fn span_shadowed_by_overlapping_match_stays_unmasked() {
    // The card rule's leftmost match starts inside the date and loses to it,
    // so the real card number never becomes a candidate on this pass.
    let input = "00/01/1900 4000 0000 0000 0000";
    let first = mask(input);
    assert_eq!(first.masked_text, "[dob] 4000 0000 0000 0000");
    assert_eq!(classifications(&first.entities), vec![PiiType::Dob]);
    assert_eq!(first.entities[0].entity, "00/01/1900");
    assert_eq!(demask(&first.masked_text, &first.entities), input);

    let second = mask(&first.masked_text);
    assert_eq!(second.masked_text, "[dob] [credit_debit_card_number]");
    assert_eq!(second.entities[0].position, (6, 25));
}

#[test]
fn country_code_and_cvv_colon_are_masked() {
    let result = mask("Call +44 203 555 0199 or (555) 123-4567, CVV: 123");
    assert_eq!(
        result.masked_text,
        "Call [phone_number] or [phone_number], CVV: [cvv_number]"
    );
    assert_eq!(result.entities[0].entity, "+44 203 555 0199");
    assert_eq!(result.entities[1].entity, "(555) 123-4567");
    assert_eq!(result.entities[2].entity, "123");
}

#[test]
fn unicode_positions_are_character_offsets() {
    let input = "Grüße — José's number is 9876543210";
    let result = mask(input);
    assert_eq!(result.entities.len(), 1);
    let (start, end) = result.entities[0].position;
    assert_eq!(end - start, 10);
    assert_eq!(start, input.chars().count() - 10);
    assert_eq!(demask(&result.masked_text, &result.entities), input);
}

#[test]
fn demask_with_foreign_entities_is_partial() {
    let result = mask("Reach me at a@b.io");
    let mut entities = result.entities.clone();
    entities.push(ResolvedEntity {
        position: (100, 110),
        classification: PiiType::PhoneNumber,
        entity: "9876543210".to_string(),
    });

    let restored = demask_detailed(&result.masked_text, &entities);
    assert_eq!(restored.text, "Reach me at a@b.io");
    assert_eq!(restored.unresolved, 1);
}

#[test]
fn entities_serialize_to_wire_shape() {
    let result = mask("Mail a@b.io");
    let json = serde_json::to_value(&result.entities).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"position": [5, 11], "classification": "email", "entity": "a@b.io"}])
    );
}

#[test]
fn policy_restricted_redactor_skips_disabled_types() {
    let redactor = Redactor::with_policy(MaskingPolicy::contact());
    let result = redactor.mask("My name is Ana Ruiz, card 4111 1111 1111 1111");
    assert_eq!(
        result.masked_text,
        "My name is [full_name], card 4111 1111 1111 1111"
    );
}

#[test]
fn concurrent_callers_share_one_engine() {
    let redactor = Arc::new(Redactor::default());
    let classifier: Arc<dyn CategoryClassifier> = Arc::new(|text: &str| {
        if text.contains("[credit_debit_card_number]") {
            "Billing".to_string()
        } else {
            "General".to_string()
        }
    });

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let redactor = Arc::clone(&redactor);
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || {
                let input = format!("user{i}@example.com paid with 4111 1111 1111 111{i}");
                let masked = redactor.mask(&input);
                let category = classifier.predict(&masked.masked_text);
                let restored = redactor.demask(&masked.masked_text, &masked.entities);
                (input, restored, category)
            })
        })
        .collect();

    for handle in handles {
        let (input, restored, category) = handle.join().unwrap();
        assert_eq!(restored, input);
        assert_eq!(category, "Billing");
    }
}
