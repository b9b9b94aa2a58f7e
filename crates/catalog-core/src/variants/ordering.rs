//! Display ordering of variants.

use crate::catalog::Variant;
use crate::ids::VariantId;
use crate::variants::Keyed;
use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

thread_local! {
    // Root locale at tertiary strength.
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// A rank to write back to a variant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankUpdate {
    pub id: VariantId,
    pub position: i32,
}

/// Compare two names the way a storefront reader expects.
///
/// Uses Unicode collation, so accented letters sort next to their base
/// letter. Letters compare without regard to case first; when two names
/// differ only by case the lowercase form sorts first. Identical names are
/// `Equal`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| collator.as_ref().map(|c| c.compare(a, b)))
        .unwrap_or_else(|| fold_compare(a, b))
}

fn fold_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            return match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => ca.cmp(&cb),
            };
        }
    }
    a.len().cmp(&b.len())
}

/// Sort by name. Stable: equal names keep their input order.
pub fn sort_variants_by_name<T: Keyed>(mut variants: Vec<T>) -> Vec<T> {
    variants.sort_by(|a, b| compare_names(a.variant_name(), b.variant_name()));
    variants
}

/// Sort by explicit rank. Unranked variants follow ranked ones in input order.
pub fn sort_variants_by_rank(mut variants: Vec<Variant>) -> Vec<Variant> {
    variants.sort_by_key(|v| (v.position.is_none(), v.position.unwrap_or_default()));
    variants
}

/// Contiguous zero-based ranks for a new order.
///
/// A repeated id keeps the rank of its first appearance.
pub fn assign_ranks(ordered_ids: &[VariantId]) -> Vec<RankUpdate> {
    let mut seen = HashSet::new();
    ordered_ids
        .iter()
        .filter(|id| seen.insert(*id))
        .enumerate()
        .map(|(rank, id)| RankUpdate {
            id: id.clone(),
            position: rank as i32,
        })
        .collect()
}

/// Full order for a list: `leading` first, then every other id of `current`
/// in its existing order.
pub fn complete_order<'a>(
    current: impl IntoIterator<Item = &'a VariantId>,
    leading: &'a [VariantId],
) -> Vec<VariantId> {
    let mut order: Vec<VariantId> = Vec::new();
    let mut seen = HashSet::new();
    for id in leading.iter().chain(current) {
        if seen.insert(id) {
            order.push(id.clone());
        }
    }
    order
}

/// The subset of ranks for the completed order whose value differs from the
/// current row.
///
/// Variants of `current` not named in `ordered_ids` follow the named ones,
/// so the ranks of the whole list stay contiguous. Ids missing from
/// `current` are treated as changed.
pub fn changed_ranks(current: &[Variant], ordered_ids: &[VariantId]) -> Vec<RankUpdate> {
    let existing: HashMap<&VariantId, Option<i32>> =
        current.iter().map(|v| (&v.id, v.position)).collect();
    let order = complete_order(current.iter().map(|v| &v.id), ordered_ids);

    assign_ranks(&order)
        .into_iter()
        .filter(|update| existing.get(&update.id).copied().flatten() != Some(update.position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: &str) -> Variant {
        Variant::new(id, name, None)
    }

    fn names(vs: &[Variant]) -> Vec<&str> {
        vs.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_sort_case_insensitive() {
        let out = sort_variants_by_name(vec![named("1", "b"), named("2", "A")]);
        assert_eq!(names(&out), vec!["A", "b"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_names() {
        let out = sort_variants_by_name(vec![
            named("1", "M"),
            named("2", "L"),
            named("3", "M"),
            named("4", "L"),
        ]);
        let ids: Vec<&str> = out.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_lowercase_first_on_case_tie() {
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("Red", "red"), Ordering::Greater);
        assert_eq!(compare_names("red", "red"), Ordering::Equal);
        assert_eq!(compare_names("red", "reds"), Ordering::Less);
    }

    #[test]
    fn test_accented_names_sort_with_base_letter() {
        let out = sort_variants_by_name(vec![
            named("1", "Zebra"),
            named("2", "Écru"),
            named("3", "Fig"),
        ]);
        assert_eq!(names(&out), vec!["Écru", "Fig", "Zebra"]);

        assert_eq!(compare_names("éclair", "Eclair"), Ordering::Greater);
        assert_eq!(compare_names("Ångström", "Zinc"), Ordering::Less);
    }

    #[test]
    fn test_fold_compare_fallback() {
        assert_eq!(fold_compare("a", "B"), Ordering::Less);
        assert_eq!(fold_compare("a", "A"), Ordering::Less);
        assert_eq!(fold_compare("red", "reds"), Ordering::Less);
    }

    #[test]
    fn test_sort_by_rank_puts_unranked_last() {
        let out = sort_variants_by_rank(vec![
            named("x", "x"),
            named("b", "b").with_position(1),
            named("a", "a").with_position(0),
            named("y", "y"),
        ]);
        assert_eq!(names(&out), vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_assign_ranks_contiguous() {
        let ids = [VariantId::new("c"), VariantId::new("a"), VariantId::new("b")];
        let ranks = assign_ranks(&ids);
        assert_eq!(
            ranks,
            vec![
                RankUpdate { id: VariantId::new("c"), position: 0 },
                RankUpdate { id: VariantId::new("a"), position: 1 },
                RankUpdate { id: VariantId::new("b"), position: 2 },
            ]
        );
    }

    #[test]
    fn test_assign_ranks_ignores_repeats() {
        let ids = [VariantId::new("a"), VariantId::new("a"), VariantId::new("b")];
        let ranks = assign_ranks(&ids);
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[1].position, 1);
    }

    #[test]
    fn test_changed_ranks_only() {
        let current = vec![
            named("a", "a").with_position(0),
            named("b", "b").with_position(1),
            named("c", "c").with_position(2),
        ];
        let order = [VariantId::new("a"), VariantId::new("c"), VariantId::new("b")];
        let changed = changed_ranks(&current, &order);
        assert_eq!(
            changed,
            vec![
                RankUpdate { id: VariantId::new("c"), position: 1 },
                RankUpdate { id: VariantId::new("b"), position: 2 },
            ]
        );
    }

    #[test]
    fn test_changed_ranks_fills_in_unlisted() {
        let current = vec![
            named("a", "a").with_position(0),
            named("b", "b").with_position(1),
            named("c", "c").with_position(2),
        ];
        let changed = changed_ranks(&current, &[VariantId::new("c")]);
        assert_eq!(
            changed,
            vec![
                RankUpdate { id: VariantId::new("c"), position: 0 },
                RankUpdate { id: VariantId::new("a"), position: 1 },
                RankUpdate { id: VariantId::new("b"), position: 2 },
            ]
        );
    }

    #[test]
    fn test_complete_order() {
        let current = [VariantId::new("a"), VariantId::new("b"), VariantId::new("c")];
        let order = complete_order(&current, &[VariantId::new("b"), VariantId::new("b")]);
        let ids: Vec<&str> = order.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_changed_ranks_includes_unranked() {
        let current = vec![named("a", "a")];
        let changed = changed_ranks(&current, &[VariantId::new("a")]);
        assert_eq!(changed.len(), 1);
    }
}
