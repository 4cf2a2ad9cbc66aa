/// Generator integration tests — invariants across many seeded generations.

use fruit_matchmaker::core::generator::{FruitGenerator, GeneratorConfig};
use fruit_matchmaker::schema::fruit::{Fruit, FruitType, ShineFactor, SIZE_RANGE, WEIGHT_RANGE};
use fruit_matchmaker::schema::preference::NumericRange;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::path::Path;

fn generate_many(kind: FruitType, count: u64) -> Vec<Fruit> {
    let generator = FruitGenerator::default();
    (0..count)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            generator.generate(kind, &mut rng)
        })
        .collect()
}

fn check_range(range: &NumericRange, bounds: &std::ops::RangeInclusive<f64>) {
    if let Some(min) = range.min() {
        assert!(bounds.contains(&min), "min {} outside {:?}", min, bounds);
    }
    if let Some(max) = range.max() {
        assert!(bounds.contains(&max), "max {} outside {:?}", max, bounds);
    }
    if let (Some(min), Some(max)) = (range.min(), range.max()) {
        assert!(min <= max, "inverted range {} > {}", min, max);
    }
}

#[test]
fn type_always_matches_request() {
    for kind in FruitType::ALL {
        for fruit in generate_many(kind, 100) {
            assert_eq!(fruit.fruit_type, kind);
        }
    }
}

#[test]
fn numeric_attributes_within_range() {
    for fruit in generate_many(FruitType::Apple, 500) {
        if let Some(size) = fruit.attributes.size {
            assert!(SIZE_RANGE.contains(&size), "size {} out of range", size);
        }
        if let Some(weight) = fruit.attributes.weight {
            assert!(WEIGHT_RANGE.contains(&weight), "weight {} out of range", weight);
            assert_eq!(weight.fract(), 0.0);
        }
        assert!(fruit.attributes.validate().is_ok());
    }
}

#[test]
fn preference_bounds_within_range() {
    for fruit in generate_many(FruitType::Orange, 500) {
        if let Some(range) = &fruit.preferences.size {
            check_range(range, &SIZE_RANGE);
        }
        if let Some(range) = &fruit.preferences.weight {
            check_range(range, &WEIGHT_RANGE);
        }
        if let Some(choice) = &fruit.preferences.shine_factor {
            assert!(!choice.labels().is_empty());
            assert!(choice.labels().len() <= 2);
        }
    }
}

#[test]
fn booleans_take_both_values() {
    let fruits = generate_many(FruitType::Apple, 200);
    let stems: HashSet<bool> = fruits.iter().filter_map(|f| f.attributes.has_stem).collect();
    let leaves: HashSet<bool> = fruits.iter().filter_map(|f| f.attributes.has_leaf).collect();
    let worms: HashSet<bool> = fruits.iter().filter_map(|f| f.attributes.has_worm).collect();
    let chemicals: HashSet<bool> = fruits.iter().filter_map(|f| f.attributes.has_chemicals).collect();
    for (name, seen) in [("stem", stems), ("leaf", leaves), ("worm", worms), ("chemicals", chemicals)] {
        assert_eq!(seen.len(), 2, "{} only took {:?}", name, seen);
    }
}

#[test]
fn shine_labels_vary() {
    let labels: HashSet<ShineFactor> = generate_many(FruitType::Orange, 200)
        .iter()
        .filter_map(|f| f.attributes.shine_factor)
        .collect();
    assert!(labels.len() >= 2, "only saw {:?}", labels);
}

#[test]
fn unknowns_and_empty_preferences_both_reachable() {
    let fruits = generate_many(FruitType::Apple, 300);
    assert!(fruits.iter().any(|f| f.attributes.size.is_none()));
    assert!(fruits.iter().any(|f| f.preferences.is_empty()));
    assert!(fruits.iter().any(|f| !f.preferences.is_empty()));
}

#[test]
fn generated_fruit_json_shape() {
    let mut rng = StdRng::seed_from_u64(3);
    let fruit = FruitGenerator::default().generate(FruitType::Orange, &mut rng);
    let json = serde_json::to_value(&fruit).unwrap();

    assert_eq!(json["type"], "orange");
    let attributes = json["attributes"].as_object().unwrap();
    for key in ["size", "weight", "hasStem", "hasLeaf", "hasWorm", "shineFactor", "hasChemicals"] {
        assert!(attributes.contains_key(key), "missing key {}", key);
    }

    let back: Fruit = serde_json::from_value(json).unwrap();
    assert_eq!(back, fruit);
}

#[test]
fn config_fixture_loads_and_applies() {
    let config = GeneratorConfig::load_from_ron(Path::new("tests/fixtures/test_generator.ron")).unwrap();
    assert_eq!(config.unknown_probability, 0.0);
    assert_eq!(config.preference_probability, 1.0);
    assert_eq!(config.worm_bias, 0.5);
    assert_eq!(config.stem_bias, GeneratorConfig::default().stem_bias);

    let generator = FruitGenerator::new(config).unwrap();
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let fruit = generator.generate(FruitType::Apple, &mut rng);
        assert!(fruit.attributes.has_worm.is_some());
        assert_eq!(fruit.preferences.len(), 7);
    }
}

#[test]
fn missing_config_file_is_io_error() {
    let err = GeneratorConfig::load_from_ron(Path::new("tests/fixtures/missing.ron")).unwrap_err();
    assert!(err.to_string().contains("IO error"));
}
