//! Lexical path helpers.
//!
//! Toolchain paths, unit file lists and build-data targets are all
//! slash-separated strings that must compare byte-for-byte, so they are
//! normalized lexically here instead of through the filesystem.

use std::path::Path;

/// Return the shortest lexically equivalent form of a slash-separated path.
///
/// Repeated separators collapse, `.` elements are dropped, and `..` elements
/// consume the preceding element where one exists. A rooted path never climbs
/// above `/`. The empty path cleans to `.`.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join path elements with `/` and clean the result.
///
/// Empty elements are ignored; joining nothing yields the empty string.
pub fn join(elems: &[&str]) -> String {
    let non_empty: Vec<&str> = elems.iter().copied().filter(|e| !e.is_empty()).collect();
    if non_empty.is_empty() {
        return String::new();
    }
    clean(&non_empty.join("/"))
}

/// Clean `path` into a form that stays below whatever root it is joined to.
///
/// A leading `/` is dropped, so `/a/b` names `a/b` under the root. Returns
/// `None` when nothing is left or the path climbs above the root.
pub fn root_relative(path: &str) -> Option<String> {
    let cleaned = clean(path);
    let rel = cleaned.trim_start_matches('/');
    if rel.is_empty() || rel == "." || escapes_root(rel) {
        return None;
    }
    Some(rel.to_string())
}

/// Whether a cleaned relative path climbs out of its root.
pub fn escapes_root(cleaned: &str) -> bool {
    cleaned == ".." || cleaned.starts_with("../")
}

/// Express `path` relative to `base` using `/` separators.
pub fn relative_to(path: &Path, base: &Path) -> Option<String> {
    let rel = pathdiff::diff_paths(path, base)?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}

/// Last element of a slash-separated path.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, base)) => base,
        None => trimmed,
    }
}
