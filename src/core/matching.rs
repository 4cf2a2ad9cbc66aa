/// Compatibility scoring between a fruit's preferences and a candidate.

use crate::schema::fruit::{AttributeValue, Attributes, Fruit};
use crate::schema::preference::{Constraint, Preferences};

/// Credit for a preference whose attribute the candidate hasn't revealed.
pub const UNKNOWN_CREDIT: f64 = 0.5;

/// How well `candidate` satisfies `preferences`, in [0, 1].
///
/// Each preference entry scores 1 when met, 0 when violated, and
/// [`UNKNOWN_CREDIT`] when the candidate's attribute is unknown. An empty
/// preference set is satisfied by anyone.
pub fn preference_score(preferences: &Preferences, candidate: &Attributes) -> f64 {
    let entries = preferences.entries();
    if entries.is_empty() {
        return 1.0;
    }

    let total: f64 = entries
        .iter()
        .map(|(name, constraint)| match (constraint, candidate.get(*name)) {
            (_, None) => UNKNOWN_CREDIT,
            (Constraint::Range(range), Some(AttributeValue::Number(n))) => credit(range.contains(n)),
            (Constraint::Flag(wanted), Some(AttributeValue::Flag(actual))) => credit(*wanted == actual),
            (Constraint::Shine(choice), Some(AttributeValue::Shine(shine))) => credit(choice.accepts(shine)),
            // Attribute kinds never disagree for the same name.
            _ => 0.0,
        })
        .sum();

    total / entries.len() as f64
}

/// Mutual compatibility: the mean of both directions.
pub fn compatibility(a: &Fruit, b: &Fruit) -> f64 {
    (preference_score(&a.preferences, &b.attributes) + preference_score(&b.preferences, &a.attributes))
        / 2.0
}

/// Index and score of the most compatible candidate of the counterpart
/// type. Ties go to the earliest candidate.
pub fn best_match(fruit: &Fruit, candidates: &[Fruit]) -> Option<(usize, f64)> {
    let wanted = fruit.fruit_type.counterpart();
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.fruit_type == wanted)
        .map(|(i, candidate)| (i, compatibility(fruit, candidate)))
        .fold(None, |best, (i, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((i, score)),
        })
}

fn credit(met: bool) -> f64 {
    if met {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fruit::{FruitType, ShineFactor};
    use crate::schema::preference::{NumericRange, ShineChoice};

    fn apple_wanting_small_shiny() -> Fruit {
        Fruit::new(
            FruitType::Apple,
            Attributes {
                size: Some(8.0),
                has_worm: Some(false),
                ..Default::default()
            },
            Preferences {
                size: Some(NumericRange::AtMost(6.0)),
                shine_factor: Some(ShineChoice::single(ShineFactor::Shiny)),
                ..Default::default()
            },
        )
    }

    fn orange(size: Option<f64>, shine: Option<ShineFactor>) -> Fruit {
        Fruit::new(
            FruitType::Orange,
            Attributes {
                size,
                shine_factor: shine,
                ..Default::default()
            },
            Preferences::default(),
        )
    }

    #[test]
    fn empty_preferences_accept_anyone() {
        assert_eq!(preference_score(&Preferences::default(), &Attributes::default()), 1.0);
    }

    #[test]
    fn full_partial_and_unknown_credit() {
        let apple = apple_wanting_small_shiny();
        let perfect = orange(Some(5.0), Some(ShineFactor::Shiny));
        let half = orange(Some(9.0), Some(ShineFactor::Shiny));
        let unknown = orange(None, None);

        assert_eq!(preference_score(&apple.preferences, &perfect.attributes), 1.0);
        assert_eq!(preference_score(&apple.preferences, &half.attributes), 0.5);
        assert_eq!(preference_score(&apple.preferences, &unknown.attributes), UNKNOWN_CREDIT);
    }

    #[test]
    fn compatibility_is_symmetric_mean() {
        let apple = apple_wanting_small_shiny();
        let candidate = orange(Some(9.0), Some(ShineFactor::Dull));
        // apple → orange: 0.0, orange → apple: 1.0 (no preferences)
        assert_eq!(compatibility(&apple, &candidate), 0.5);
        assert_eq!(compatibility(&candidate, &apple), 0.5);
    }

    #[test]
    fn best_match_skips_same_type_and_prefers_earliest_tie() {
        let apple = apple_wanting_small_shiny();
        let candidates = vec![
            apple_wanting_small_shiny(),
            orange(Some(9.0), Some(ShineFactor::Dull)),
            orange(Some(5.0), Some(ShineFactor::Shiny)),
            orange(Some(4.0), Some(ShineFactor::Shiny)),
        ];
        assert_eq!(best_match(&apple, &candidates), Some((2, 1.0)));
        assert_eq!(best_match(&apple, &candidates[..1]), None);
    }
}
