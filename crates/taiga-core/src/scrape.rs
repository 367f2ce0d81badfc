use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Site-specific rule that finds gallery content images.
pub const CONTENT_SELECTOR: &str = ".comic-content img";

/// Substrings that mark a source as a real image during the fallback scan.
pub const IMAGE_URL_MARKERS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Substrings that exclude site chrome (icons, logos) during the fallback
/// scan. Case-insensitive, heuristic; markup drift on the target site can
/// produce false negatives and that is accepted.
pub const EXCLUDED_URL_MARKERS: [&str; 2] = ["icon", "logo"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch the page. Status code: {0}")]
    Status(u16),

    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error("No images found.")]
    NoImages,
}

/// Fetch a gallery page and extract candidate image URLs in document order.
pub async fn fetch_gallery(client: &Client, page_url: &str) -> Result<Vec<String>, ScrapeError> {
    let base = Url::parse(page_url).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;

    tracing::debug!(url = page_url, "fetching gallery page");
    let resp = client.get(page_url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::Status(status.as_u16()));
    }

    let body = resp.text().await?;
    extract_image_urls(&body, &base)
}

/// Pull image URLs out of gallery markup.
///
/// The content selector is tried first; when it yields no sources the whole
/// page is scanned for plausible image elements instead. Relative sources
/// are resolved against `base`.
pub fn extract_image_urls(html: &str, base: &Url) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);

    let content = Selector::parse(CONTENT_SELECTOR).expect("content selector is valid");
    let urls: Vec<String> = document
        .select(&content)
        .filter_map(image_source)
        .filter_map(|src| resolve(base, &src))
        .collect();
    if !urls.is_empty() {
        return Ok(urls);
    }

    let any_img = Selector::parse("img").expect("img selector is valid");
    let urls: Vec<String> = document
        .select(&any_img)
        .filter_map(image_source)
        .filter(|src| {
            let lower = src.to_lowercase();
            IMAGE_URL_MARKERS.iter().any(|m| lower.contains(m))
                && !EXCLUDED_URL_MARKERS.iter().any(|m| lower.contains(m))
        })
        .filter_map(|src| resolve(base, &src))
        .collect();

    if urls.is_empty() {
        return Err(ScrapeError::NoImages);
    }
    Ok(urls)
}

// Lazy-loading galleries ship src="" with the real URL in data-src, so an
// empty attribute counts as missing.
fn image_source(img: ElementRef<'_>) -> Option<String> {
    let el = img.value();
    el.attr("src")
        .filter(|s| !s.trim().is_empty())
        .or_else(|| el.attr("data-src"))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn resolve(base: &Url, src: &str) -> Option<String> {
    match base.join(src) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            tracing::warn!(src, error = %e, "skipping unresolvable image source");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://multporn.net/comics/example").unwrap()
    }

    #[test]
    fn test_content_selector_takes_priority() {
        let html = r#"
            <html><body>
                <img src="/themes/shared/logo.png">
                <div class="comic-content">
                    <img src="/pics/1.jpg">
                    <img data-src="/pics/2.jpg">
                </div>
                <img src="/ads/banner.jpg">
            </body></html>
        "#;

        let urls = extract_image_urls(html, &base()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://multporn.net/pics/1.jpg",
                "https://multporn.net/pics/2.jpg",
            ]
        );
    }

    #[test]
    fn test_lazy_loaded_images_use_data_src() {
        let html = r#"
            <html><body>
                <div class="comic-content">
                    <img src="" data-src="/pics/1.jpg">
                    <img src="">
                    <img src=" " data-src="/pics/2.jpg">
                </div>
            </body></html>
        "#;

        let urls = extract_image_urls(html, &base()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://multporn.net/pics/1.jpg",
                "https://multporn.net/pics/2.jpg",
            ]
        );
    }

    #[test]
    fn test_fallback_filters_extensions_and_chrome() {
        let html = r#"
            <html><body>
                <img src="/assets/site-logo.png">
                <img src="/assets/Icon-menu.gif">
                <img src="/gallery/page1.JPG">
                <img src="https://cdn.example.com/page2.png">
                <img src="/decoration/border.svg">
                <img src="/gallery/page3.jpeg">
            </body></html>
        "#;

        let urls = extract_image_urls(html, &base()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://multporn.net/gallery/page1.JPG",
                "https://cdn.example.com/page2.png",
                "https://multporn.net/gallery/page3.jpeg",
            ]
        );
    }

    #[test]
    fn test_empty_content_container_falls_back() {
        let html = r#"
            <html><body>
                <div class="comic-content"><img></div>
                <img src="/gallery/1.jpg">
            </body></html>
        "#;

        let urls = extract_image_urls(html, &base()).unwrap();
        assert_eq!(urls, vec!["https://multporn.net/gallery/1.jpg"]);
    }

    #[test]
    fn test_no_qualifying_images_is_an_error() {
        let html = "<html><body><p>text only</p><img src=\"/logo.jpg\"></body></html>";
        let err = extract_image_urls(html, &base()).unwrap_err();
        assert!(matches!(err, ScrapeError::NoImages));
    }
}
