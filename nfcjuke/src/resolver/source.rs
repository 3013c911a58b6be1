// nfcjuke/src/resolver/source.rs

//! Media-source URL validation.
//!
//! Only one streaming source is recognized; anything else found in an NDEF
//! record falls through to UID-based lookup.

/// Path shapes on the canonical host that carry a video id.
const VIDEO_PATHS: [&str; 4] = ["watch?v=", "embed/", "v/", "shorts/"];

/// Whether `url` points at the recognized streaming source.
///
/// Accepts `youtube.com` (optionally `www.` or `m.`) with a `watch?v=`,
/// `embed/`, `v/` or `shorts/` path, and `youtu.be` short links, over
/// either scheme. The id itself is not validated beyond being non-empty.
pub fn is_media_source_url(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let host_and_path = rest
        .strip_prefix("www.")
        .or_else(|| rest.strip_prefix("m."))
        .unwrap_or(rest);

    if let Some(path) = host_and_path.strip_prefix("youtube.com/") {
        return VIDEO_PATHS
            .iter()
            .any(|p| path.strip_prefix(p).is_some_and(|id| !id.is_empty()));
    }
    if let Some(id) = host_and_path.strip_prefix("youtu.be/") {
        return !id.is_empty();
    }
    false
}
