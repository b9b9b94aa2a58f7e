//! Variant list processing.
//!
//! Fetched variant rows pass through here before they are rendered or
//! counted: duplicates collapse to their first occurrence, then the list is
//! put in display order, either by name or by an explicit rank.

mod dedup;
mod ordering;
mod selection;

pub use dedup::{deduplicate_variants, partition_duplicates, Keyed, VariantKey};
pub use ordering::{
    assign_ranks, changed_ranks, compare_names, complete_order, sort_variants_by_name, sort_variants_by_rank,
    RankUpdate,
};
pub use selection::VariantSelection;
