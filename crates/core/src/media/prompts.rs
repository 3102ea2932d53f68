//! Prompt builders for script and video generation

use vioshop_domain::constants::VIDEO_PROMPT_SCRIPT_CHARS;
use vioshop_domain::{Language, Product};

/// Prompt for the short agency description shown on the partner profile.
pub fn business_description_prompt(language: Language) -> &'static str {
    match language {
        Language::En => {
            "Write a professional business description (max 300 chars) for a TikTok Shop \
             Affiliate Partner agency that uses AI to create high-converting product videos. \
             Focus on scalability, technology, and performance."
        }
        Language::Pt => {
            "Escreva uma descrição profissional (máx 300 caracteres) para uma agência parceira \
             de afiliados do TikTok Shop que usa IA para criar vídeos de alta conversão. \
             Foque em escala, tecnologia e performance."
        }
    }
}

/// Prompt for a short TikTok Shop sales script about `product`.
pub fn script_prompt(product: &Product, category: Option<&str>) -> String {
    let category = category.map(|c| format!(" in the \"{c}\" category")).unwrap_or_default();
    format!(
        "You are a copywriter specialised in TikTok Shop. Write a short sales script \
         (at most 60 seconds) for the product \"{title}\"{category}.\n\
         Structure:\n\
         1. HOOK: something that stops the scroll in the first 2 seconds.\n\
         2. DESIRE: 3 emotional or practical benefits.\n\
         3. CTA: a clear call to tap the TikTok Shop cart or link.\n\
         Keep the tone fast, viral and persuasive. Return ONLY the script text.",
        title = product.title,
    )
}

/// Prompt for a vertical influencer video built from the opening of `script`.
pub fn video_prompt(script: &str) -> String {
    let excerpt: String = script.chars().take(VIDEO_PROMPT_SCRIPT_CHARS).collect();
    format!(
        "Hyper-realistic 4K vertical 9:16 video of an AI influencer demonstrating {excerpt}... \
         The scene is professionally lit, cinematic background, sharp focus, 60fps style. \
         The avatar is talking directly to the viewer with natural movements."
    )
}

#[cfg(test)]
mod tests {
    use vioshop_domain::Price;

    use super::*;

    #[test]
    fn video_prompt_truncates_on_char_boundary() {
        let script = "é".repeat(400);
        let prompt = video_prompt(&script);
        assert!(prompt.contains(&"é".repeat(150)));
        assert!(!prompt.contains(&"é".repeat(151)));
        assert!(prompt.starts_with("Hyper-realistic 4K vertical 9:16"));
    }

    #[test]
    fn business_description_follows_language() {
        let en = business_description_prompt(Language::En);
        let pt = business_description_prompt(Language::Pt);
        assert!(en.starts_with("Write a professional business description"));
        assert!(en.contains("TikTok Shop Affiliate Partner agency"));
        assert!(pt.starts_with("Escreva uma descrição profissional"));
        assert!(!pt.contains("  "));
    }

    #[test]
    fn script_prompt_names_product_and_category() {
        let product = Product {
            id: "1".into(),
            title: "LED Ring Light".into(),
            image_url: String::new(),
            price: Price { amount: "10".into(), currency: "USD".into() },
            commission_rate: 20.0,
            total_sales: 0,
            source_url: String::new(),
        };
        let prompt = script_prompt(&product, Some("Beauty"));
        assert!(prompt.contains("\"LED Ring Light\""));
        assert!(prompt.contains("\"Beauty\" category"));
        assert!(!script_prompt(&product, None).contains("category"));
    }
}
