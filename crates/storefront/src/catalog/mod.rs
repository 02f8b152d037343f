//! Catalogue browsing: search input, facets, grids and variant selection.
//!
//! Everything here is pure. Route handlers fetch from the shop API and pass
//! the results and the parsed query string in.

pub mod facets;
pub mod grid;
pub mod search;
pub mod variant;

pub use facets::FacetPanel;
pub use grid::{PriceBounds, ProductCard, ProductGrid};
pub use search::{PAGE_SIZE, SearchOptions, SearchParams, SortOption, build_search_input, current_page};
pub use variant::{AddToCartState, VariantPicker};
