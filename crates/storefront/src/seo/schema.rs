//! schema.org JSON-LD documents.
//!
//! Each document serializes with the exact schema.org property names and is
//! embedded via [`to_script_json`].

use serde::Serialize;

use crate::seo::BRAND_NAME;
use crate::seo::meta::{DESCRIPTION_LIMIT, truncate_description};
use crate::vendure::{Product, ProductVariant};

const CONTEXT: &str = "https://schema.org";
const IN_STOCK: &str = "https://schema.org/InStock";
const OUT_OF_STOCK: &str = "https://schema.org/OutOfStock";
const NEW_CONDITION: &str = "https://schema.org/NewCondition";

/// Default public origin for the organization document.
pub const DEFAULT_ORGANIZATION_URL: &str = "https://everandalways.com";

/// Default organization description.
pub const DEFAULT_ORGANIZATION_DESCRIPTION: &str = "Ever and Always - America's most trusted source for affordable diamond jewelry. Transparent pricing, premium craftsmanship, and reliable sourcing.";

/// Serialize a document for a `<script type="application/ld+json">` body.
///
/// `</` is escaped so the payload cannot close the script element.
#[must_use]
pub fn to_script_json<T: Serialize>(document: &T) -> String {
    match serde_json::to_string(document) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize JSON-LD");
            "{}".to_string()
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A `Product` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSchema {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub brand: Brand,
    pub offers: Offer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_rating: Option<AggregateRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<ReviewSchema>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Brand {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub url: String,
    pub price_currency: String,
    /// Major units without trailing zeros.
    pub price: String,
    pub availability: &'static str,
    pub item_condition: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRating {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub rating_value: String,
    pub review_count: String,
    pub best_rating: &'static str,
    pub worst_rating: &'static str,
}

/// A `Review` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchema {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub author: Person,
    pub date_published: String,
    pub review_body: String,
    pub review_rating: Rating,
}

#[derive(Debug, Clone, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub rating_value: String,
    pub best_rating: &'static str,
    pub worst_rating: &'static str,
}

impl ReviewSchema {
    /// A review with a 1-5 star rating.
    #[must_use]
    pub fn new(author: &str, date_published: &str, body: &str, rating: u8) -> Self {
        Self {
            kind: "Review",
            author: Person {
                kind: "Person",
                name: author.to_string(),
            },
            date_published: date_published.to_string(),
            review_body: body.to_string(),
            review_rating: Rating {
                kind: "Rating",
                rating_value: rating.clamp(1, 5).to_string(),
                best_rating: "5",
                worst_rating: "1",
            },
        }
    }
}

impl ProductSchema {
    /// Document for `product` at `url`.
    ///
    /// Price, SKU and availability come from `variant` when one is resolved,
    /// else from the first variant.
    #[must_use]
    pub fn new(product: &Product, variant: Option<&ProductVariant>, url: &str) -> Self {
        let priced = variant.or_else(|| product.variants.first());
        let description = truncate_description(&product.description, DESCRIPTION_LIMIT);

        Self {
            context: CONTEXT,
            kind: "Product",
            name: product.name.clone(),
            description: (!description.is_empty()).then_some(description),
            image: product.image_urls(),
            sku: priced.map(|v| v.sku.clone()).filter(|s| !s.is_empty()),
            brand: Brand {
                kind: "Brand",
                name: BRAND_NAME,
            },
            offers: Offer {
                kind: "Offer",
                url: url.to_string(),
                price_currency: priced.map_or_else(|| "USD".to_string(), |v| v.currency_code.clone()),
                price: priced.map_or_else(
                    || "0".to_string(),
                    |v| v.price_with_tax.to_major().normalize().to_string(),
                ),
                availability: if priced.is_some_and(|v| v.stock_level.is_available()) {
                    IN_STOCK
                } else {
                    OUT_OF_STOCK
                },
                item_condition: NEW_CONDITION,
            },
            aggregate_rating: None,
            review: None,
        }
    }

    /// Attach reviews and the rating aggregated from them.
    #[must_use]
    pub fn with_reviews(mut self, reviews: Vec<ReviewSchema>) -> Self {
        if reviews.is_empty() {
            return self;
        }

        let total: u32 = reviews
            .iter()
            .filter_map(|r| r.review_rating.rating_value.parse::<u32>().ok())
            .sum();
        let count = u32::try_from(reviews.len()).unwrap_or(u32::MAX);
        let average = f64::from(total) / f64::from(count);

        self.aggregate_rating = Some(AggregateRating {
            kind: "AggregateRating",
            rating_value: format!("{average:.1}"),
            review_count: count.to_string(),
            best_rating: "5",
            worst_rating: "1",
        });
        self.review = Some(reviews);
        self
    }
}

// =============================================================================
// FAQ
// =============================================================================

/// A question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Questions shown on every product page.
pub const PRODUCT_FAQS: [Faq; 4] = [
    Faq {
        question: "What are your shipping options?",
        answer: "We offer standard shipping (5-7 business days), express shipping (2-3 business days), and next-day delivery for select areas. Free standard shipping is available on orders over $50.",
    },
    Faq {
        question: "What is your return policy?",
        answer: "We accept returns within 30 days of purchase. Items must be unused and in their original packaging. Simply contact our support team to initiate a return and receive a prepaid shipping label.",
    },
    Faq {
        question: "How can I track my order?",
        answer: "Once your order ships, you'll receive an email with a tracking number. You can also view your order status anytime by logging into your account and visiting the order history section.",
    },
    Faq {
        question: "Do you offer international shipping?",
        answer: "Yes! We ship to over 50 countries worldwide. International shipping rates and delivery times vary by location. You can see the exact cost at checkout before completing your purchase.",
    },
];

/// A `FAQPage` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPageSchema {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: &'static str,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub text: &'static str,
}

impl FaqPageSchema {
    #[must_use]
    pub fn new(faqs: &[Faq]) -> Self {
        Self {
            context: CONTEXT,
            kind: "FAQPage",
            main_entity: faqs
                .iter()
                .map(|faq| Question {
                    kind: "Question",
                    name: faq.question,
                    accepted_answer: Answer {
                        kind: "Answer",
                        text: faq.answer,
                    },
                })
                .collect(),
        }
    }
}

// =============================================================================
// Collection page
// =============================================================================

/// A product listed in a collection document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedProduct {
    pub name: String,
    /// Absolute URL.
    pub url: String,
}

/// A `CollectionPage` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPageSchema {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_entity: Option<ItemList>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemList {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub item_list_element: Vec<ProductListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductListItem {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub position: usize,
    pub item: ProductRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRef {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    pub url: String,
}

impl CollectionPageSchema {
    /// Document for a collection page. The item list is omitted when
    /// `products` is empty.
    #[must_use]
    pub fn new(
        name: &str,
        description: Option<&str>,
        url: &str,
        image: Option<String>,
        products: &[ListedProduct],
    ) -> Self {
        let main_entity = (!products.is_empty()).then(|| ItemList {
            kind: "ItemList",
            item_list_element: products
                .iter()
                .enumerate()
                .map(|(index, product)| ProductListItem {
                    kind: "ListItem",
                    position: index + 1,
                    item: ProductRef {
                        kind: "Product",
                        name: product.name.clone(),
                        url: product.url.clone(),
                    },
                })
                .collect(),
        });

        Self {
            context: CONTEXT,
            kind: "CollectionPage",
            name: name.to_string(),
            description: description
                .map(|d| truncate_description(d, DESCRIPTION_LIMIT))
                .filter(|d| !d.is_empty()),
            url: url.to_string(),
            image,
            main_entity,
        }
    }
}

// =============================================================================
// Organization
// =============================================================================

/// Postal address for the organization document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub country: String,
    pub locality: Option<String>,
    pub region: Option<String>,
}

/// Inputs for [`OrganizationSchema`]; unset fields take the defaults.
#[derive(Debug, Clone, Default)]
pub struct OrganizationDetails {
    pub url: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub telephone: Option<String>,
    pub address: Option<Address>,
    pub same_as: Vec<String>,
}

/// An `Organization` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSchema {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: &'static str,
    pub url: String,
    pub logo: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_point: Option<ContactPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub telephone: String,
    pub contact_type: &'static str,
    pub area_served: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub address_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_region: Option<String>,
}

impl OrganizationSchema {
    #[must_use]
    pub fn new(details: OrganizationDetails) -> Self {
        let url = details
            .url
            .unwrap_or_else(|| DEFAULT_ORGANIZATION_URL.to_string());
        let logo = details.logo.unwrap_or_else(|| format!("{url}/logo.png"));

        Self {
            context: CONTEXT,
            kind: "Organization",
            name: BRAND_NAME,
            logo,
            url,
            description: details
                .description
                .unwrap_or_else(|| DEFAULT_ORGANIZATION_DESCRIPTION.to_string()),
            contact_point: details.telephone.map(|telephone| ContactPoint {
                kind: "ContactPoint",
                telephone,
                contact_type: "Customer Service",
                area_served: "US",
            }),
            address: details.address.map(|a| PostalAddress {
                kind: "PostalAddress",
                address_country: a.country,
                address_locality: a.locality,
                address_region: a.region,
            }),
            same_as: details.same_as,
        }
    }
}

// =============================================================================
// Breadcrumbs
// =============================================================================

/// A `BreadcrumbList` document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbListSchema {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    pub item_list_element: Vec<BreadcrumbListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreadcrumbListItem {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub position: usize,
    pub name: String,
    /// Absolute URL.
    pub item: String,
}

impl BreadcrumbListSchema {
    /// Document from `(name, absolute url)` pairs in trail order.
    #[must_use]
    pub fn new<'a>(items: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        Self {
            context: CONTEXT,
            kind: "BreadcrumbList",
            item_list_element: items
                .into_iter()
                .enumerate()
                .map(|(index, (name, item))| BreadcrumbListItem {
                    kind: "ListItem",
                    position: index + 1,
                    name: name.to_string(),
                    item,
                })
                .collect(),
        }
    }
}
