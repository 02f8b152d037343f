//! Search engine metadata: head tags, breadcrumbs, JSON-LD and the sitemap.

pub mod breadcrumbs;
pub mod meta;
pub mod schema;
pub mod sitemap;

pub use breadcrumbs::{Breadcrumbs, Crumb};
pub use meta::{DESCRIPTION_LIMIT, PageMeta, truncate_description};
pub use schema::to_script_json;

/// Brand name used in titles and structured data.
pub const BRAND_NAME: &str = "Ever and Always";
