use proptest::prelude::*;
use std::collections::HashSet;

use plateful_rs::models::{
    validate_rating_value, CreateFoodItemRequest, Cuisine, DietaryPreference, FoodItem,
    FoodItemFilters, ItemCategory, MealType, SortKey,
};
use plateful_rs::query::{affinity_reorder, query, sample_with_head};

prop_compose! {
    fn arb_cuisine()(cuisine in prop_oneof![
        Just(Cuisine::Italian),
        Just(Cuisine::Mexican),
        Just(Cuisine::Japanese),
        Just(Cuisine::Thai),
        Just(Cuisine::Korean),
    ]) -> Cuisine {
        cuisine
    }
}

prop_compose! {
    fn arb_preferences()(bits in prop::collection::vec(any::<bool>(), 4)) -> Vec<DietaryPreference> {
        let pool = [
            DietaryPreference::Vegetarian,
            DietaryPreference::Vegan,
            DietaryPreference::GlutenFree,
            DietaryPreference::Keto,
        ];
        pool.iter()
            .zip(bits)
            .filter_map(|(pref, keep)| keep.then_some(*pref))
            .collect()
    }
}

prop_compose! {
    fn arb_food_item()(
        name in "[a-z]{3,12}",
        cuisine in arb_cuisine(),
        preferences in arb_preferences(),
        rating in prop::option::of(1.0f64..=5.0),
        price_cents in prop::option::of(100i64..10000),
    ) -> FoodItem {
        let mut item = FoodItem::new(
            CreateFoodItemRequest {
                name,
                description: "generated dish".to_string(),
                cuisine,
                category: ItemCategory::Food,
                drink_type: None,
                dietary_preferences: preferences,
                meal_types: vec![MealType::Dinner],
                nutrition: None,
                ingredients: vec!["salt".to_string()],
                preparation_time_minutes: None,
                image_url: None,
            },
            "generator".to_string(),
        );
        item.average_rating = rating;
        item.price = price_cents.map(|cents| rust_decimal::Decimal::new(cents, 2));
        item
    }
}

proptest! {
    // Every item surviving a dietary-preference filter carries all the
    // requested preferences
    #[test]
    fn dietary_filter_returns_supersets_only(
        items in prop::collection::vec(arb_food_item(), 0..20),
        requested in arb_preferences(),
    ) {
        let filters = FoodItemFilters {
            dietary_preferences: requested.clone(),
            ..Default::default()
        };
        let matched = query(items, |item| item.matches_filters(&filters), SortKey::Relevance);

        for item in &matched {
            for pref in &requested {
                prop_assert!(item.dietary_preferences.contains(pref));
            }
        }
    }

    // Sorting by rating yields a non-increasing sequence, missing treated
    // as zero
    #[test]
    fn rating_sort_is_non_increasing(items in prop::collection::vec(arb_food_item(), 0..20)) {
        let sorted = query(items, |_| true, SortKey::Rating);

        for pair in sorted.windows(2) {
            let first = pair[0].average_rating.unwrap_or(0.0);
            let second = pair[1].average_rating.unwrap_or(0.0);
            prop_assert!(first >= second);
        }
    }

    // The sampler returns exactly min(limit, n) items and never disturbs
    // the prioritized head
    #[test]
    fn sampling_respects_limit_and_head(
        items in prop::collection::vec(arb_food_item(), 0..30),
        limit in 0usize..12,
    ) {
        let original: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        let mut rng = rand::rng();
        let sampled = sample_with_head(items, limit, &mut rng);

        prop_assert_eq!(sampled.len(), original.len().min(limit));

        if original.len() > limit {
            for (i, item) in sampled.iter().take(limit / 2).enumerate() {
                prop_assert_eq!(&item.id, &original[i]);
            }
            // Sampled tail items keep their original relative order
            let positions: Vec<usize> = sampled
                .iter()
                .map(|item| original.iter().position(|id| id == &item.id).unwrap())
                .collect();
            for pair in positions.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    // Affinity reorder is a stable partition: preferred cuisines first,
    // relative order preserved on both sides, nothing lost
    #[test]
    fn affinity_reorder_is_stable_partition(
        items in prop::collection::vec(arb_food_item(), 0..20),
        preferred_cuisine in arb_cuisine(),
    ) {
        let preferred: HashSet<Cuisine> = [preferred_cuisine].into_iter().collect();
        let expected_front: Vec<String> = items
            .iter()
            .filter(|item| item.cuisine == preferred_cuisine)
            .map(|item| item.id.clone())
            .collect();
        let expected_back: Vec<String> = items
            .iter()
            .filter(|item| item.cuisine != preferred_cuisine)
            .map(|item| item.id.clone())
            .collect();

        let mut reordered = items;
        affinity_reorder(&mut reordered, &preferred);

        let ids: Vec<String> = reordered.iter().map(|item| item.id.clone()).collect();
        let (front, back) = ids.split_at(expected_front.len());

        prop_assert_eq!(front, expected_front.as_slice());
        prop_assert_eq!(back, expected_back.as_slice());
    }

    // Rating values validate exactly on the closed interval [1, 5]
    #[test]
    fn rating_validation_bounds(value in -10.0f64..10.0) {
        let result = validate_rating_value(value);
        if (1.0..=5.0).contains(&value) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }

    // Price sorts treat missing values asymmetrically: last on ascending,
    // last on descending
    #[test]
    fn price_sort_places_missing_last(items in prop::collection::vec(arb_food_item(), 0..15)) {
        let ascending = query(items.clone(), |_| true, SortKey::PriceLow);
        let mut seen_missing = false;
        for item in &ascending {
            if item.price.is_none() {
                seen_missing = true;
            } else {
                prop_assert!(!seen_missing);
            }
        }

        let descending = query(items, |_| true, SortKey::PriceHigh);
        let mut seen_missing = false;
        for item in &descending {
            if item.price.is_none() {
                seen_missing = true;
            } else {
                prop_assert!(!seen_missing);
            }
        }
    }
}
