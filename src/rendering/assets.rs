//! Rewrites known cloud-storage sharing links into direct-fetchable URLs.

use regex::Regex;
use std::sync::OnceLock;

/// Width hint carried on every rewritten URL.
const WIDTH_HINT: &str = "w1600";

fn share_link_signatures() -> &'static [Regex; 4] {
    static SIGNATURES: OnceLock<[Regex; 4]> = OnceLock::new();
    SIGNATURES.get_or_init(|| {
        [
            Regex::new(r"drive\.google\.com/file/d/([A-Za-z0-9_-]+)").unwrap(),
            Regex::new(r"drive\.google\.com/open\?id=([A-Za-z0-9_-]+)").unwrap(),
            Regex::new(r"drive\.google\.com/uc\?id=([A-Za-z0-9_-]+)").unwrap(),
            Regex::new(r"docs\.google\.com/uc\?id=([A-Za-z0-9_-]+)").unwrap(),
        ]
    })
}

/// Rewrite a sharing link into its canonical direct-content form.
///
/// Matching is case-sensitive on the literal URL text. Anything that does
/// not carry one of the known signatures passes through unchanged (modulo
/// surrounding whitespace). Never fails.
pub fn normalize_asset_url(url: &str) -> String {
    let trimmed = url.trim();

    for signature in share_link_signatures() {
        if let Some(caps) = signature.captures(trimmed) {
            return format!(
                "https://lh3.googleusercontent.com/d/{}={}",
                &caps[1],
                WIDTH_HINT
            );
        }
    }

    trimmed.to_string()
}
