//! Saved products and video history commands

use std::time::Instant;

use vioshop_domain::{Product, Result, VideoProject};

use super::finish;
use crate::context::AppContext;
use crate::utils::log_command_execution;

pub async fn saved_products(ctx: &AppContext) -> Vec<Product> {
    let start = Instant::now();
    let products = ctx.library.saved_products().await;
    log_command_execution("library::saved_products", start.elapsed(), true);
    products
}

/// Add `product` to the front of the saved list. Saving a product twice is
/// a no-op.
pub async fn save_product(ctx: &AppContext, product: Product) -> Result<Vec<Product>> {
    let start = Instant::now();
    let result = ctx.library.save_product(product).await;
    finish("library::save_product", start, &result);
    result
}

pub async fn remove_product(ctx: &AppContext, product_id: &str) -> Result<Vec<Product>> {
    let start = Instant::now();
    let result = ctx.library.remove_product(product_id).await;
    finish("library::remove_product", start, &result);
    result
}

pub async fn video_history(ctx: &AppContext) -> Vec<VideoProject> {
    let start = Instant::now();
    let history = ctx.library.video_history().await;
    log_command_execution("library::video_history", start.elapsed(), true);
    history
}

pub async fn save_video(ctx: &AppContext, video: VideoProject) -> Result<Vec<VideoProject>> {
    let start = Instant::now();
    let result = ctx.library.save_video(video).await;
    finish("library::save_video", start, &result);
    result
}
