//! Normalized product model

use serde::{Deserialize, Serialize};

/// Listing price as reported by the marketplace.
///
/// `amount` keeps the provider's decimal string so no precision is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub amount: String,
    pub currency: String,
}

impl Price {
    pub fn value(&self) -> Option<f64> {
        self.amount.trim().parse::<f64>().ok()
    }
}

/// Product listing normalized from the partner API wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    /// Affiliate commission, in percent.
    pub commission_rate: f64,
    pub total_sales: u64,
    pub source_url: String,
}

impl Product {
    /// Commission earned per sale at the listed price, rounded to cents.
    pub fn estimated_commission(&self) -> Option<String> {
        self.price.value().map(|price| format!("{:.2}", price * self.commission_rate / 100.0))
    }
}

/// Search criteria for product discovery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilters {
    pub keywords: Option<String>,
    pub category: Option<String>,
    pub min_commission_rate: Option<f64>,
}

impl ProductFilters {
    pub fn keywords(keywords: impl Into<String>) -> Self {
        Self { keywords: Some(keywords.into()), ..Self::default() }
    }

    /// Client-side filters that the search endpoint cannot apply.
    pub fn accepts(&self, product: &Product) -> bool {
        self.min_commission_rate.map_or(true, |min| product.commission_rate >= min)
    }
}
