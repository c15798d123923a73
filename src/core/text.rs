use regex::Regex;
use std::sync::LazyLock;

/// Joins main-tree folder paths for the expanded-folders setting.
pub const TREE_PATH_SEPARATOR: &str = "\t";

/// Joins fave subfolder paths carried by rename/creation requests.
pub const FAVE_PATH_SEPARATOR: &str = "/";

static COUNTER_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" \((\d+)\)$").unwrap_or_else(|e| panic!("invalid counter regex: {e}"))
});

/* ============================== Name helpers =============================== */

/// Returns `name` unchanged when it is free, otherwise the first `base (n)`
/// (n >= 2) absent from `existing`. An existing ` (n)` suffix on `name` is
/// replaced rather than stacked.
#[must_use]
pub fn make_unique_name(name: &str, existing: &[String]) -> String {
    if !existing.iter().any(|e| e == name) {
        return name.to_string();
    }

    let base = COUNTER_SUFFIX.replace(name, "").into_owned();
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{base} ({n})");
        if !existing.iter().any(|e| *e == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[must_use]
pub fn join_tree_path(path: &[String]) -> String {
    path.join(TREE_PATH_SEPARATOR)
}

#[must_use]
pub fn join_fave_path(path: &[String]) -> String {
    path.join(FAVE_PATH_SEPARATOR)
}

/// Splits a fave path string back into segments. Empty segments are dropped,
/// so `""` maps to the fave root itself.
#[must_use]
pub fn split_fave_path(raw: &str) -> Vec<String> {
    raw.split(FAVE_PATH_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn free_name_is_kept() {
        assert_eq!(make_unique_name("New folder", &names(&["Other"])), "New folder");
    }

    #[test]
    fn taken_name_gets_first_free_counter() {
        let existing = names(&["New folder", "New folder (2)"]);
        assert_eq!(make_unique_name("New folder", &existing), "New folder (3)");
    }

    #[test]
    fn counter_suffix_is_replaced_not_stacked() {
        let existing = names(&["Shots (2)"]);
        assert_eq!(make_unique_name("Shots (2)", &existing), "Shots (3)");
    }

    #[test]
    fn fave_path_roundtrip_drops_empty_segments() {
        assert!(split_fave_path("").is_empty());
        assert_eq!(split_fave_path("a//b"), names(&["a", "b"]));
        assert_eq!(join_fave_path(&names(&["a", "b"])), "a/b");
    }
}
