//! Filesystem-safe names for galleries and staging directories.

/// Basename used when a title sanitizes to nothing usable.
pub const FALLBACK_BASENAME: &str = "gallery";

/// Longest basename in bytes: room for `.zip.part` within NAME_MAX (255).
pub const MAX_BASENAME_BYTES: usize = 255 - ".zip.part".len();

/// Derives the archive/subdirectory basename from a gallery title.
///
/// Surrounding whitespace is trimmed and `|`, `:` and `/` are removed; every
/// other character keeps its position (`"A|B:C/D"` → `"ABCD"`). Long titles
/// are cut at a char boundary so `<basename>.zip.part` is still one path segment.
pub fn title_to_basename(title: &str) -> String {
    let basename: String = title
        .trim()
        .chars()
        .filter(|c| !matches!(*c, '|' | ':' | '/'))
        .collect();
    let basename = truncate_at_boundary(&basename, MAX_BASENAME_BYTES);
    if basename.trim().is_empty() || basename == "." || basename == ".." || basename.contains('\0') {
        FALLBACK_BASENAME.to_string()
    } else {
        basename.to_string()
    }
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
fn truncate_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

/// Sanitizes an arbitrary string into one Linux path segment.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes (Linux NAME_MAX)
pub fn sanitize_segment(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let unsafe_char = c == '/' || c == '\\' || c.is_control() || c.is_whitespace();
        let replacement = if unsafe_char { '_' } else { c };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    truncate_at_boundary(trimmed, NAME_MAX).to_string()
}
