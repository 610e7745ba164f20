//! String transforms between view file paths, view references and labels.

/// Extension marking a path as a renderable view rather than a plain value.
pub const VIEW_SUFFIX: &str = ".blade.php";

const OBJECT_ROOT: &str = "/object";

/// True when `path` names a view file.
pub fn is_view_path(path: &str) -> bool {
    path.ends_with(VIEW_SUFFIX)
}

/// Turn a view file path into a dotted view reference.
///
/// `/object/pages/home.blade.php` becomes `pages.home`.
pub fn view_by_path(path: &str) -> String {
    let path = path.replace(VIEW_SUFFIX, "");
    let path = match path.strip_prefix(OBJECT_ROOT) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path.as_str(),
    };
    path.trim_start_matches('/').replace('/', ".")
}

/// Human readable label for a view file: `view/big_hero-banner.blade.php` → `Big Hero Banner`.
pub fn file_name_to_label(file: &str) -> String {
    let base = file.trim_end_matches('/').rsplit('/').next().unwrap_or(file);
    let name = match base.strip_suffix(VIEW_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => base,
    };
    let name = name.replace(['-', '_'], " ");
    capitalize_words(&name)
}

/// Upper-case the first letter of every whitespace separated word, leaving the rest as is.
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}
