//! Anchor slugs and keyword index links.

use std::collections::HashSet;

/// Generate an index link to a keyword's anchor.
pub fn render_toc_link(text: &str, anchor: &str) -> String {
    format!("[{}](#{})", text, anchor)
}

/// Generate an index list item.
pub fn render_toc_item(text: &str, anchor: &str) -> String {
    format!("- {}", render_toc_link(text, anchor))
}

/// Anchor slug for a display name.
///
/// - lowercase
/// - alphanumerics kept
/// - every run of other characters becomes one `-`
/// - leading and trailing `-` trimmed
pub fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Unique anchors for `names`, in order. Repeats of a slug get `-1`, `-2`, …
pub fn anchors<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let mut base = slug(name);
        if base.is_empty() {
            base = "keyword".to_string();
        }
        let mut candidate = base.clone();
        let mut n = 0;
        while used.contains(&candidate) {
            n += 1;
            candidate = format!("{}-{}", base, n);
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
