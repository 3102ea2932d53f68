//! Wire product to [`Product`] mapping

use vioshop_domain::constants::{DEFAULT_COMMISSION_RATE, PRODUCT_VIEW_URL};
use vioshop_domain::{Price, Product};

use super::types::WireProduct;

/// Normalize a search result.
///
/// The search endpoint does not report affiliate commission for most
/// listings; a missing or unparseable rate becomes
/// [`DEFAULT_COMMISSION_RATE`].
pub fn map_wire_product(wire: &WireProduct) -> Product {
    let id = wire.id.as_string();

    let image_url = wire
        .main_images
        .first()
        .and_then(|image| image.url_list.first().or_else(|| image.thumb_urls.first()))
        .cloned()
        .unwrap_or_default();

    let price = wire
        .price
        .as_ref()
        .map(|p| Price {
            amount: p.sale_price.as_ref().map(|a| a.as_string()).unwrap_or_default(),
            currency: p.currency.clone().unwrap_or_default(),
        })
        .unwrap_or_else(|| Price { amount: String::new(), currency: String::new() });

    let commission_rate = wire
        .commission
        .as_ref()
        .and_then(|c| c.rate.as_ref())
        .and_then(|rate| rate.as_f64())
        .unwrap_or(DEFAULT_COMMISSION_RATE);

    let total_sales = wire
        .sales
        .as_ref()
        .and_then(|s| s.as_f64())
        .filter(|s| *s >= 0.0)
        .map(|s| s as u64)
        .unwrap_or(0);

    let source_url = wire
        .source_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| format!("{PRODUCT_VIEW_URL}/{id}"));

    Product {
        title: wire.title.clone().unwrap_or_default(),
        id,
        image_url,
        price,
        commission_rate,
        total_sales,
        source_url,
    }
}
