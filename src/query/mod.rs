use chrono::{DateTime, Utc};
use rand::seq::index;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{Cuisine, FoodItem, Restaurant, SortKey};

/// Field accessors the query engine's comparators need. Implemented by every
/// catalog entity so filtering, sorting, affinity reordering and sampling are
/// written once instead of per endpoint.
pub trait Sortable {
    fn average_rating(&self) -> Option<f64>;
    fn is_trending(&self) -> bool;
    fn popularity_score(&self) -> f64;
    /// Value used by the price sorts; `None` when the entity has no price
    fn price_value(&self) -> Option<f64>;
    fn created_at(&self) -> DateTime<Utc>;
    /// Whether the entity's cuisine intersects the preferred set
    fn matches_cuisines(&self, preferred: &HashSet<Cuisine>) -> bool;
}

impl Sortable for FoodItem {
    fn average_rating(&self) -> Option<f64> {
        self.average_rating
    }

    fn is_trending(&self) -> bool {
        self.is_trending
    }

    fn popularity_score(&self) -> f64 {
        self.popularity_score
    }

    fn price_value(&self) -> Option<f64> {
        self.price.and_then(|price| price.to_f64())
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches_cuisines(&self, preferred: &HashSet<Cuisine>) -> bool {
        preferred.contains(&self.cuisine)
    }
}

impl Sortable for Restaurant {
    fn average_rating(&self) -> Option<f64> {
        self.average_rating
    }

    fn is_trending(&self) -> bool {
        self.is_trending
    }

    fn popularity_score(&self) -> f64 {
        self.popularity_score
    }

    fn price_value(&self) -> Option<f64> {
        // Ordinal rank of the price band, $=1 through $$$$=4
        Some(f64::from(self.price_range.rank()))
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches_cuisines(&self, preferred: &HashSet<Cuisine>) -> bool {
        self.cuisine_types
            .iter()
            .any(|cuisine| preferred.contains(cuisine))
    }
}

/// Filter a collection with the given predicate and order the survivors by
/// `sort_key`. Sorts are stable: ties keep insertion order.
pub fn query<T, F>(collection: Vec<T>, predicate: F, sort_key: SortKey) -> Vec<T>
where
    T: Sortable,
    F: Fn(&T) -> bool,
{
    let mut matched: Vec<T> = collection.into_iter().filter(|item| predicate(item)).collect();
    sort_items(&mut matched, sort_key);
    matched
}

/// Order items in place by the given sort key. `Relevance` leaves the
/// sequence untouched.
pub fn sort_items<T: Sortable>(items: &mut [T], sort_key: SortKey) {
    match sort_key {
        SortKey::Relevance => {}
        SortKey::Rating => {
            items.sort_by(|a, b| {
                cmp_f64(
                    b.average_rating().unwrap_or(0.0),
                    a.average_rating().unwrap_or(0.0),
                )
            });
        }
        SortKey::Trending => {
            items.sort_by(|a, b| {
                b.is_trending()
                    .cmp(&a.is_trending())
                    .then_with(|| cmp_f64(b.popularity_score(), a.popularity_score()))
            });
        }
        SortKey::PriceLow => {
            items.sort_by(|a, b| {
                cmp_f64(
                    a.price_value().unwrap_or(f64::INFINITY),
                    b.price_value().unwrap_or(f64::INFINITY),
                )
            });
        }
        SortKey::PriceHigh => {
            items.sort_by(|a, b| {
                cmp_f64(b.price_value().unwrap_or(0.0), a.price_value().unwrap_or(0.0))
            });
        }
        SortKey::Newest => {
            items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        }
    }
}

/// Stable partition: items whose cuisine is in the preferred set move to the
/// front, relative order preserved within both partitions. Used only for
/// relevance-sorted recommendations.
pub fn affinity_reorder<T: Sortable>(items: &mut [T], preferred: &HashSet<Cuisine>) {
    if preferred.is_empty() {
        return;
    }
    items.sort_by_key(|item| !item.matches_cuisines(preferred));
}

/// Cut a result list down to `limit`: the first `limit / 2` entries are kept
/// as the prioritized head, the remainder is filled by uniform sampling
/// without replacement from the tail. Sampled items keep their original
/// relative order; randomness only decides which of them appear.
pub fn sample_with_head<T, R>(mut items: Vec<T>, limit: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    if items.len() <= limit {
        return items;
    }
    if limit == 0 {
        items.clear();
        return items;
    }

    let head_len = limit / 2;
    let tail = items.split_off(head_len);
    let take = limit - head_len;

    let mut chosen = index::sample(rng, tail.len(), take).into_vec();
    chosen.sort_unstable();

    let chosen: HashSet<usize> = chosen.into_iter().collect();
    for (i, item) in tail.into_iter().enumerate() {
        if chosen.contains(&i) {
            items.push(item);
        }
    }
    items
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateFoodItemRequest, DietaryPreference, FoodItemFilters, ItemCategory, MealType,
    };
    use rust_decimal::Decimal;

    fn food(name: &str, cuisine: Cuisine, rating: Option<f64>, price: Option<Decimal>) -> FoodItem {
        let mut item = FoodItem::new(
            CreateFoodItemRequest {
                name: name.to_string(),
                description: format!("{} test dish", name),
                cuisine,
                category: ItemCategory::Food,
                drink_type: None,
                dietary_preferences: vec![DietaryPreference::None],
                meal_types: vec![MealType::Dinner],
                nutrition: None,
                ingredients: vec!["salt".to_string()],
                preparation_time_minutes: Some(10),
                image_url: None,
            },
            "tester".to_string(),
        );
        item.average_rating = rating;
        item.price = price;
        item
    }

    #[test]
    fn test_rating_sort_is_descending_with_missing_as_zero() {
        let items = vec![
            food("a", Cuisine::Italian, Some(4.2), None),
            food("b", Cuisine::Mexican, None, None),
            food("c", Cuisine::Thai, Some(4.7), None),
        ];

        let sorted = query(items, |_| true, SortKey::Rating);
        let ratings: Vec<Option<f64>> = sorted.iter().map(|i| i.average_rating).collect();
        assert_eq!(ratings, vec![Some(4.7), Some(4.2), None]);
    }

    #[test]
    fn test_spec_example_rating_and_cuisine() {
        // Items A (italian, 4.7) and B (mexican, 4.2)
        let a = food("A", Cuisine::Italian, Some(4.7), None);
        let b = food("B", Cuisine::Mexican, Some(4.2), None);

        let sorted = query(vec![b.clone(), a.clone()], |_| true, SortKey::Rating);
        assert_eq!(sorted[0].name, "A");
        assert_eq!(sorted[1].name, "B");

        let filters = FoodItemFilters {
            cuisine: Some(Cuisine::Mexican),
            ..Default::default()
        };
        let matched = query(
            vec![a, b],
            |item| item.matches_filters(&filters),
            SortKey::Relevance,
        );
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "B");
    }

    #[test]
    fn test_price_sorts_treat_missing_asymmetrically() {
        let items = vec![
            food("no-price", Cuisine::Italian, None, None),
            food("cheap", Cuisine::Italian, None, Some(Decimal::new(499, 2))),
            food("dear", Cuisine::Italian, None, Some(Decimal::new(1999, 2))),
        ];

        let low = query(items.clone(), |_| true, SortKey::PriceLow);
        assert_eq!(low.last().unwrap().name, "no-price");
        assert_eq!(low[0].name, "cheap");

        let high = query(items, |_| true, SortKey::PriceHigh);
        assert_eq!(high[0].name, "dear");
        assert_eq!(high.last().unwrap().name, "no-price");
    }

    #[test]
    fn test_trending_sort_uses_flag_then_popularity() {
        let mut hot = food("hot", Cuisine::Thai, None, None);
        hot.is_trending = true;
        hot.popularity_score = 80.0;
        let mut hotter = food("hotter", Cuisine::Thai, None, None);
        hotter.is_trending = true;
        hotter.popularity_score = 95.0;
        let mut cold = food("cold", Cuisine::Thai, None, None);
        cold.popularity_score = 99.0;

        let sorted = query(vec![cold, hot, hotter], |_| true, SortKey::Trending);
        let names: Vec<&str> = sorted.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["hotter", "hot", "cold"]);
    }

    #[test]
    fn test_relevance_keeps_insertion_order() {
        let items = vec![
            food("first", Cuisine::Thai, Some(1.0), None),
            food("second", Cuisine::Thai, Some(5.0), None),
        ];
        let out = query(items, |_| true, SortKey::Relevance);
        assert_eq!(out[0].name, "first");
        assert_eq!(out[1].name, "second");
    }

    #[test]
    fn test_rating_sort_is_stable_on_ties() {
        let items = vec![
            food("tied-1", Cuisine::Thai, Some(4.0), None),
            food("tied-2", Cuisine::Thai, Some(4.0), None),
            food("tied-3", Cuisine::Thai, Some(4.0), None),
        ];
        let sorted = query(items, |_| true, SortKey::Rating);
        let names: Vec<&str> = sorted.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["tied-1", "tied-2", "tied-3"]);
    }

    #[test]
    fn test_affinity_reorder_is_stable_partition() {
        let items = vec![
            food("m1", Cuisine::Mexican, None, None),
            food("i1", Cuisine::Italian, None, None),
            food("m2", Cuisine::Mexican, None, None),
            food("i2", Cuisine::Italian, None, None),
        ];
        let preferred: HashSet<Cuisine> = [Cuisine::Italian].into_iter().collect();

        let mut reordered = items;
        affinity_reorder(&mut reordered, &preferred);
        let names: Vec<&str> = reordered.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["i1", "i2", "m1", "m2"]);
    }

    #[test]
    fn test_affinity_reorder_noop_without_preferences() {
        let items = vec![
            food("m1", Cuisine::Mexican, None, None),
            food("i1", Cuisine::Italian, None, None),
        ];
        let mut reordered = items;
        affinity_reorder(&mut reordered, &HashSet::new());
        assert_eq!(reordered[0].name, "m1");
    }

    #[test]
    fn test_sampling_keeps_head_and_order() {
        let items: Vec<FoodItem> = (0..20)
            .map(|i| food(&format!("item-{:02}", i), Cuisine::Thai, None, None))
            .collect();

        let mut rng = rand::rng();
        let sampled = sample_with_head(items, 6, &mut rng);

        assert_eq!(sampled.len(), 6);
        // Head (limit / 2 = 3) survives untouched
        assert_eq!(sampled[0].name, "item-00");
        assert_eq!(sampled[1].name, "item-01");
        assert_eq!(sampled[2].name, "item-02");
        // Tail picks keep their original relative order
        let tail_names: Vec<&str> = sampled[3..].iter().map(|i| i.name.as_str()).collect();
        let mut sorted_tail = tail_names.clone();
        sorted_tail.sort();
        assert_eq!(tail_names, sorted_tail);
    }

    #[test]
    fn test_sampling_passes_through_small_collections() {
        let items = vec![
            food("a", Cuisine::Thai, None, None),
            food("b", Cuisine::Thai, None, None),
        ];
        let mut rng = rand::rng();
        let sampled = sample_with_head(items, 5, &mut rng);
        assert_eq!(sampled.len(), 2);
    }
}
