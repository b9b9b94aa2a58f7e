//! Presentation-agnostic variant selection.
//!
//! A grid of buttons, a dropdown and a drag-to-reorder list all drive the
//! same state: a de-duplicated variant list, the selected variant, a
//! collapsed preview, and (optionally) a mutable order.

use crate::catalog::{Product, Variant};
use crate::error::CatalogError;
use crate::ids::VariantId;
use crate::variants::{complete_order, deduplicate_variants};

/// Selection state over a product's variants.
#[derive(Debug, Clone)]
pub struct VariantSelection {
    variants: Vec<Variant>,
    selected: Option<VariantId>,
    preview: usize,
    expanded: bool,
    reorderable: bool,
}

impl VariantSelection {
    /// Variants shown before the "+N more" control.
    pub const DEFAULT_PREVIEW: usize = 2;

    /// Build a selection. Duplicates are collapsed; order is kept.
    pub fn new(variants: Vec<Variant>) -> Self {
        Self {
            variants: deduplicate_variants(variants),
            selected: None,
            preview: Self::DEFAULT_PREVIEW,
            expanded: false,
            reorderable: false,
        }
    }

    /// Set how many variants the collapsed view shows.
    pub fn with_preview(mut self, preview: usize) -> Self {
        self.preview = preview;
        self
    }

    /// Enable the reorder capability.
    pub fn with_reorder(mut self) -> Self {
        self.reorderable = true;
        self
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn is_reorderable(&self) -> bool {
        self.reorderable
    }

    /// Select a variant by id.
    pub fn select(&mut self, id: &VariantId) -> Result<&Variant, CatalogError> {
        let variant = self
            .variants
            .iter()
            .find(|v| &v.id == id)
            .ok_or_else(|| CatalogError::UnknownVariant(id.to_string()))?;
        self.selected = Some(id.clone());
        Ok(variant)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected variant, if it is still in the list.
    pub fn selected(&self) -> Option<&Variant> {
        let id = self.selected.as_ref()?;
        self.variants.iter().find(|v| &v.id == id)
    }

    pub fn is_selected(&self, id: &VariantId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Variants currently shown.
    pub fn visible(&self) -> &[Variant] {
        if self.expanded {
            &self.variants
        } else {
            &self.variants[..self.variants.len().min(self.preview)]
        }
    }

    /// Count behind the "+N more" control.
    pub fn hidden_count(&self) -> usize {
        self.variants.len() - self.visible().len()
    }

    /// Show every variant.
    pub fn expand(&mut self) {
        self.expanded = true;
    }

    /// Image for the product detail view: the selected variant's image, then
    /// the product's, then the placeholder.
    pub fn display_image<'a>(&'a self, product: &'a Product) -> &'a str {
        self.selected()
            .and_then(|v| v.image_url.as_deref())
            .unwrap_or_else(|| product.display_image())
    }

    /// Move the variant at `from` to index `to`, shifting the ones between.
    pub fn move_variant(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        if !self.reorderable {
            return Err(CatalogError::ReorderDisabled);
        }
        let len = self.variants.len();
        for index in [from, to] {
            if index >= len {
                return Err(CatalogError::OutOfRange { index, len });
            }
        }

        let moved = self.variants.remove(from);
        self.variants.insert(to, moved);
        Ok(())
    }

    /// Put `leading` at the front in the given order. The rest keep their
    /// relative order behind them.
    pub fn arrange(&mut self, leading: &[VariantId]) -> Result<(), CatalogError> {
        if !self.reorderable {
            return Err(CatalogError::ReorderDisabled);
        }
        if let Some(unknown) = leading
            .iter()
            .find(|id| !self.variants.iter().any(|v| &v.id == *id))
        {
            return Err(CatalogError::UnknownVariant(unknown.to_string()));
        }

        let order = complete_order(self.variants.iter().map(|v| &v.id), leading);
        let mut rest = std::mem::take(&mut self.variants);
        for id in &order {
            if let Some(index) = rest.iter().position(|v| &v.id == id) {
                self.variants.push(rest.remove(index));
            }
        }
        Ok(())
    }

    /// Current order, for writing ranks back.
    pub fn ordered_ids(&self) -> Vec<VariantId> {
        self.variants.iter().map(|v| v.id.clone()).collect()
    }
}
