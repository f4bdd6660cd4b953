//! Turns raw image references into delivery URLs.
//!
//! Remote and inline references pass through untouched. Local paths are
//! rooted at `/` and carry width, quality and format hints as query
//! parameters.

use url::form_urlencoded;

pub const DEFAULT_QUALITY: u32 = 75;
pub const DEFAULT_WIDTHS: [u32; 6] = [320, 640, 768, 1024, 1280, 1536];

pub fn load(src: &str, width: u32, quality: u32) -> String {
    if src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:") {
        return src.to_string();
    }

    let quality = quality.max(1).min(100);
    let path = if src.starts_with('/') {
        src.to_string()
    } else {
        format!("/{}", src)
    };

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("w", &width.to_string())
        .append_pair("q", &quality.to_string())
        .append_pair("f", "webp")
        .finish();

    format!("{}?{}", path, query)
}

/// `srcset` attribute value for `widths`.
pub fn src_set(src: &str, widths: &[u32], quality: u32) -> String {
    widths
        .iter()
        .map(|width| format!("{} {}w", load(src, *width, quality), width))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn image_format(src: &str) -> &'static str {
    let extension = src.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "jpeg",
        "png" => "png",
        "webp" => "webp",
        "avif" => "avif",
        "gif" => "gif",
        "svg" => "svg+xml",
        _ => "jpeg",
    }
}

/// Target size, keeping the original aspect ratio when no height is given.
pub fn fit_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: u32,
    target_height: Option<u32>,
) -> (u32, u32) {
    match target_height {
        Some(height) if height > 0 => (target_width, height),
        _ if original_width == 0 => (target_width, 0),
        _ => {
            let ratio = original_height as f64 / original_width as f64;
            (target_width, (target_width as f64 * ratio).round() as u32)
        }
    }
}
