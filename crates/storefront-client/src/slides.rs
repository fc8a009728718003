//! Curation of the promotional slides (new in, best sellers, featured)

use std::collections::HashSet;

use storefront_core::{
    Error, Result,
    listing::matches_query,
    types::{Product, SlideKind},
};
use tracing::{info, warn};

use crate::api_client::BackendClient;

/// Product offered in the slide editor, with its selection flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideCandidate<'a> {
    /// Catalogue entry
    pub product: &'a Product,
    /// Whether the product is on the slide
    pub selected: bool,
}

/// Editable selection of one slide over the product catalogue
#[derive(Debug, Clone)]
pub struct SlideEditor {
    kind: SlideKind,
    products: Vec<Product>,
    selected: HashSet<String>,
}

impl SlideEditor {
    /// Build an editor from an already fetched catalogue and selection
    ///
    /// Selected identifiers that are not in the catalogue are dropped.
    #[must_use]
    pub fn new(kind: SlideKind, products: Vec<Product>, selected: Vec<String>) -> Self {
        let known: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        let (kept, unknown): (HashSet<String>, HashSet<String>) = selected
            .into_iter()
            .partition(|id| known.contains(id.as_str()));

        if !unknown.is_empty() {
            warn!(slide = %kind, count = unknown.len(), "Slide references products missing from the catalogue");
        }

        Self {
            kind,
            products,
            selected: kept,
        }
    }

    /// Fetch the catalogue and the current selection of `kind`
    ///
    /// # Errors
    ///
    /// Returns an error if either fetch fails.
    pub async fn load(client: &BackendClient, kind: SlideKind) -> Result<Self> {
        let products = client.list_products().await?;
        let selected = client.slide_selection(kind).await?;
        Ok(Self::new(kind, products, selected))
    }

    /// Slide being edited
    #[must_use]
    pub const fn kind(&self) -> SlideKind {
        self.kind
    }

    /// Put a product on the slide
    ///
    /// # Errors
    ///
    /// Returns a validation error if the product is already selected and
    /// [`Error::NotFound`] if it is not in the catalogue.
    pub fn add(&mut self, product_id: &str) -> Result<()> {
        self.require_known(product_id)?;
        if !self.selected.insert(product_id.to_string()) {
            return Err(Error::validation(
                "product",
                format!("Product is already in {}", self.kind.label()),
            ));
        }
        Ok(())
    }

    /// Take a product off the slide; returns whether it was selected
    pub fn remove(&mut self, product_id: &str) -> bool {
        self.selected.remove(product_id)
    }

    /// Flip a product's selection; returns the new state
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the product is not in the catalogue.
    pub fn toggle(&mut self, product_id: &str) -> Result<bool> {
        self.require_known(product_id)?;
        if self.selected.remove(product_id) {
            Ok(false)
        } else {
            self.selected.insert(product_id.to_string());
            Ok(true)
        }
    }

    /// Selected identifiers in catalogue order
    #[must_use]
    pub fn selected_ids(&self) -> Vec<String> {
        self.products
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Selected products in catalogue order
    #[must_use]
    pub fn selected_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| self.selected.contains(&p.id))
            .collect()
    }

    /// Catalogue entries whose name matches `query`
    #[must_use]
    pub fn candidates(&self, query: &str) -> Vec<SlideCandidate<'_>> {
        self.products
            .iter()
            .filter(|p| matches_query(&p.name, query))
            .map(|product| SlideCandidate {
                product,
                selected: self.selected.contains(&product.id),
            })
            .collect()
    }

    /// Send the selection and reload it from the backend
    ///
    /// # Errors
    ///
    /// Returns an error if saving or re-fetching fails; the local selection
    /// is left untouched in that case.
    pub async fn save(&mut self, client: &BackendClient) -> Result<()> {
        let ids = self.selected_ids();
        client.save_slide_selection(self.kind, &ids).await?;
        info!(slide = %self.kind, count = ids.len(), "Slide selection saved");

        let refreshed = client.slide_selection(self.kind).await?;
        self.selected = refreshed.into_iter().collect();
        Ok(())
    }

    fn require_known(&self, product_id: &str) -> Result<()> {
        if self.products.iter().any(|p| p.id == product_id) {
            Ok(())
        } else {
            Err(Error::NotFound {
                resource: format!("product {product_id}"),
            })
        }
    }
}
