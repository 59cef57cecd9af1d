//! Utility functions for the planner
//!
//! Common helpers used by the media pipeline and the view-model projections.

/// Turn a plan type tag into a display title: `"quick_plan"` becomes `"Quick Plan"`
pub fn format_title(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased extension of the path component of a URL.
///
/// Query strings and fragments are ignored, so
/// `https://cdn/v/clip.MP4?sig=1` yields `mp4`.
pub fn url_extension(url: &str) -> Option<String> {
    let path = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let file_name = path.rsplit('/').next()?;
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
