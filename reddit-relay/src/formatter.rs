//! Status text composition under a hard character budget.
//!
//! Lengths are counted in `char`s, so truncation never splits a code point.

pub const DEFAULT_MAX_LENGTH: usize = 280;

/// Slack left below `max_length` once truncation kicks in.
pub const TRUNCATION_MARGIN: usize = 10;

/// Short links always start with `https://`, which is dropped for display.
pub const SHORTLINK_PREFIX_LEN: usize = 8;

pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("fixed suffix needs {needed} characters but the limit is {max_length}")]
    SuffixTooLong { needed: usize, max_length: usize },
}

/// Drop the scheme prefix from a short link.
pub fn display_shortlink(shortlink: &str) -> &str {
    match shortlink.char_indices().nth(SHORTLINK_PREFIX_LEN) {
        Some((idx, _)) => &shortlink[idx..],
        None => "",
    }
}

fn compose(title: &str, link: &str, tag: &str, source_url: &str, embed_preview: bool) -> String {
    if embed_preview {
        format!("\"{title}\" {link} #{tag} {source_url}")
    } else {
        format!("\"{title}\" {link} #{tag}")
    }
}

/// Build the status text for a post.
///
/// When the composition is longer than `max_length`, the title loses
/// `len - (max_length - TRUNCATION_MARGIN)` characters from its end and gains
/// an ellipsis; the link, tag and (when embedding) source URL are kept
/// verbatim. Fails only when even an emptied title cannot fit.
pub fn format_status(
    title: &str,
    shortlink: &str,
    source_url: &str,
    tag: &str,
    embed_preview: bool,
    max_length: usize,
) -> Result<String, FormatError> {
    let link = display_shortlink(shortlink);
    let composed = compose(title, link, tag, source_url, embed_preview);
    let length = composed.chars().count();
    if length <= max_length {
        return Ok(composed);
    }

    let overflow = length - max_length.saturating_sub(TRUNCATION_MARGIN);
    let keep = title.chars().count().saturating_sub(overflow);
    let mut shortened: String = title.chars().take(keep).collect();
    shortened.push_str(ELLIPSIS);

    let truncated = compose(&shortened, link, tag, source_url, embed_preview);
    let truncated_length = truncated.chars().count();
    if truncated_length > max_length {
        let needed = compose(ELLIPSIS, link, tag, source_url, embed_preview).chars().count();
        return Err(FormatError::SuffixTooLong { needed, max_length });
    }
    Ok(truncated)
}
