//! De-duplication of variants by (name, image reference).

use crate::catalog::Variant;
use std::collections::HashSet;
use std::hash::Hash;

/// Identity of a variant for de-duplication.
///
/// Two variants with the same name and the same image reference are the same
/// variant, whatever their id, price or stock. A missing image is its own
/// stable value, so two image-less variants with one name still collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub name: String,
    pub image: Option<String>,
}

impl VariantKey {
    pub fn new(name: impl Into<String>, image: Option<&str>) -> Self {
        Self {
            name: name.into(),
            image: image.map(str::to_string),
        }
    }
}

/// Anything that carries a variant name and image reference.
pub trait Keyed {
    /// Variant name; implementors return "" when the record has none.
    fn variant_name(&self) -> &str;

    /// Image reference, if any.
    fn image_ref(&self) -> Option<&str>;

    /// The de-duplication key.
    fn variant_key(&self) -> VariantKey {
        VariantKey::new(self.variant_name(), self.image_ref())
    }
}

impl Keyed for Variant {
    fn variant_name(&self) -> &str {
        &self.name
    }

    fn image_ref(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

impl<T: Keyed + ?Sized> Keyed for &T {
    fn variant_name(&self) -> &str {
        (**self).variant_name()
    }

    fn image_ref(&self) -> Option<&str> {
        (**self).image_ref()
    }
}

/// Keep the first variant of every (name, image) pair, in input order.
///
/// Linear in the input length; seen keys are tracked in a hash set.
pub fn deduplicate_variants<T, I>(variants: I) -> Vec<T>
where
    T: Keyed,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|v| seen.insert(v.variant_key()))
        .collect()
}

/// Split rows into first occurrences and later duplicates.
///
/// The key is the variant key within `scope`, so callers working across
/// products pass the product id as the scope.
pub fn partition_duplicates<T, S, F>(rows: impl IntoIterator<Item = T>, scope: F) -> (Vec<T>, Vec<T>)
where
    T: Keyed,
    S: Hash + Eq,
    F: Fn(&T) -> S,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut duplicates = Vec::new();

    for row in rows {
        if seen.insert((scope(&row), row.variant_key())) {
            kept.push(row);
        } else {
            duplicates.push(row);
        }
    }

    (kept, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: &str, name: &str, img: Option<&str>) -> Variant {
        Variant::new(id, name, img)
    }

    fn ids(vs: &[Variant]) -> Vec<&str> {
        vs.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let input = vec![
            v("1", "Red", Some("a")),
            v("2", "Blue", Some("b")),
            v("3", "Red", Some("a")),
        ];
        let out = deduplicate_variants(input);
        assert_eq!(ids(&out), vec!["1", "2"]);
    }

    #[test]
    fn test_same_name_different_image_is_kept() {
        let input = vec![v("1", "Red", Some("a")), v("2", "Red", Some("b"))];
        assert_eq!(deduplicate_variants(input).len(), 2);
    }

    #[test]
    fn test_missing_images_collide() {
        let input = vec![v("1", "Red", None), v("2", "Red", None), v("3", "Red", Some("a"))];
        assert_eq!(ids(&deduplicate_variants(input)), vec!["1", "3"]);
    }

    #[test]
    fn test_price_and_stock_are_ignored() {
        let mut cheap = v("1", "Red", Some("a"));
        cheap.stock = Some(1);
        let mut dear = v("2", "Red", Some("a"));
        dear.stock = Some(99);
        dear.price = Some(crate::Price::from_cents(999));

        assert_eq!(ids(&deduplicate_variants(vec![cheap, dear])), vec!["1"]);
    }

    #[test]
    fn test_output_is_subsequence_without_duplicate_keys() {
        let input = vec![
            v("1", "A", None),
            v("2", "B", Some("x")),
            v("3", "A", None),
            v("4", "", None),
            v("5", "B", Some("x")),
            v("6", "", None),
            v("7", "C", Some("y")),
        ];
        let out = deduplicate_variants(input.clone());

        let keys: HashSet<_> = out.iter().map(|v| v.variant_key()).collect();
        assert_eq!(keys.len(), out.len());

        let mut cursor = input.iter();
        for kept in &out {
            assert!(cursor.any(|candidate| candidate == kept));
        }
        assert_eq!(ids(&out), vec!["1", "2", "4", "7"]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            v("1", "Red", Some("a")),
            v("2", "Red", Some("a")),
            v("3", "Blue", None),
            v("4", "Blue", None),
        ];
        let once = deduplicate_variants(input);
        let twice = deduplicate_variants(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_works_on_references() {
        let input = vec![v("1", "Red", Some("a")), v("2", "Red", Some("a"))];
        let out: Vec<&Variant> = deduplicate_variants(input.iter());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id.as_str(), "1");
    }

    #[test]
    fn test_partition_scoped_by_product() {
        let input = vec![
            v("1", "Red", Some("a")).for_product("p1"),
            v("2", "Red", Some("a")).for_product("p2"),
            v("3", "Red", Some("a")).for_product("p1"),
        ];
        let (kept, dupes) = partition_duplicates(input, |v| v.product_id.clone());
        assert_eq!(ids(&kept), vec!["1", "2"]);
        assert_eq!(ids(&dupes), vec!["3"]);
    }

    #[test]
    fn test_empty_input() {
        let out: Vec<Variant> = deduplicate_variants(Vec::new());
        assert!(out.is_empty());
    }
}
