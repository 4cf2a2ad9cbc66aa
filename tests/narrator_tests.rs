/// Narrator integration tests — rendering generated and hand-built fruits.

use fruit_matchmaker::core::generator::FruitGenerator;
use fruit_matchmaker::core::narrator::{describe_attributes, describe_preferences, Narrator};
use fruit_matchmaker::core::phrasebook::NarratorError;
use fruit_matchmaker::core::summary::{ProfileSummary, OPEN_TO_ANYTHING};
use fruit_matchmaker::schema::fruit::{Attributes, Fruit, FruitType};
use fruit_matchmaker::schema::preference::{NumericRange, Preferences};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

fn fruit_with(attributes: Attributes, preferences: Preferences) -> Fruit {
    Fruit::new(FruitType::Apple, attributes, preferences)
}

#[test]
fn attributes_text_names_type_for_every_generated_fruit() {
    let generator = FruitGenerator::default();
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        for kind in FruitType::ALL {
            let fruit = generator.generate(kind, &mut rng);
            let text = describe_attributes(&fruit);
            assert!(!text.is_empty());
            assert!(text.contains(kind.name()), "seed {}: {}", seed, text);
            assert!(!text.contains("null"));
            assert!(!text.contains('{'));
        }
    }
}

#[test]
fn exact_size_appears() {
    let fruit = fruit_with(
        Attributes {
            size: Some(7.2),
            ..Default::default()
        },
        Preferences::default(),
    );
    assert!(describe_attributes(&fruit).contains("7.2"));
}

#[test]
fn range_bounds_appear() {
    let fruit = fruit_with(
        Attributes::default(),
        Preferences {
            size: Some(NumericRange::Between(5.0, 10.0)),
            ..Default::default()
        },
    );
    let text = describe_preferences(&fruit);
    assert!(text.contains('5'));
    assert!(text.contains("10"));
}

#[test]
fn empty_preferences_open_ended() {
    let text = describe_preferences(&fruit_with(Attributes::default(), Preferences::default()));
    assert!(text.len() > 10);
    assert!(text.to_lowercase().contains("open to anything"));
}

#[test]
fn narration_is_idempotent() {
    let generator = FruitGenerator::default();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let fruit = generator.generate(FruitType::Orange, &mut rng);
        assert_eq!(describe_attributes(&fruit), describe_attributes(&fruit));
        assert_eq!(describe_preferences(&fruit), describe_preferences(&fruit));
    }
}

#[test]
fn narration_survives_json_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    let fruit = FruitGenerator::default().generate(FruitType::Apple, &mut rng);
    let json = serde_json::to_string(&fruit).unwrap();
    let back: Fruit = serde_json::from_str(&json).unwrap();
    assert_eq!(describe_attributes(&back), describe_attributes(&fruit));
    assert_eq!(describe_preferences(&back), describe_preferences(&fruit));
}

#[test]
fn custom_phrasebook_changes_wording() {
    let narrator = Narrator::load_from_ron(Path::new("tests/fixtures/test_phrasebook.ron")).unwrap();
    let fruit = Fruit::new(
        FruitType::Orange,
        Attributes {
            size: Some(9.5),
            has_worm: Some(true),
            ..Default::default()
        },
        Preferences {
            weight: Some(NumericRange::AtLeast(120.0)),
            has_stem: Some(false),
            ..Default::default()
        },
    );

    assert_eq!(narrator.describe_attributes(&fruit), "orange. size 9.5. worm.");
    assert_eq!(
        narrator.describe_preferences(&fruit),
        "Wanted in apples: weight >= 120; no stem."
    );

    let open = Fruit::new(FruitType::Apple, Attributes::default(), Preferences::default());
    assert_eq!(narrator.describe_attributes(&open), "apple. Nothing known.");
    assert_eq!(narrator.describe_preferences(&open), "Any of the oranges will do.");
}

#[test]
fn missing_phrasebook_is_io_error() {
    let err = Narrator::load_from_ron(Path::new("tests/fixtures/nope.ron")).unwrap_err();
    assert!(matches!(err, NarratorError::Io(_)));
}

#[test]
fn summary_agrees_with_narration() {
    let mut rng = StdRng::seed_from_u64(5);
    let generator = FruitGenerator::default();
    for _ in 0..50 {
        let fruit = generator.generate(FruitType::Apple, &mut rng);
        let summary = ProfileSummary::of(&fruit);
        assert_eq!(summary.attributes.len(), 7);
        assert_eq!(summary.preferences.len(), fruit.preferences.len());
        if fruit.preferences.is_empty() {
            assert!(summary.to_string().contains(OPEN_TO_ANYTHING));
        }
    }
}

#[test]
fn out_of_range_fruit_json_is_rejected() {
    let bad_attributes =
        r#"{"type":"apple","attributes":{"size":999,"weight":-4},"preferences":{}}"#;
    assert!(serde_json::from_str::<Fruit>(bad_attributes).is_err());

    let bad_preferences =
        r#"{"type":"apple","attributes":{},"preferences":{"size":{"min":-50,"max":1000}}}"#;
    assert!(serde_json::from_str::<Fruit>(bad_preferences).is_err());

    let good = r#"{"type":"apple","attributes":{"size":7.2},"preferences":{"size":{"min":5,"max":10}}}"#;
    let fruit: Fruit = serde_json::from_str(good).unwrap();
    assert!(describe_attributes(&fruit).contains("7.2"));
}
