//! Path Utilities
//!
//! Lexical path arithmetic. Nothing here touches the filesystem except
//! [`absolutize`], which reads the current directory for relative input.

use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically: drop `.` components and fold `..` into the
/// preceding component. Leading `..` on a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Compute the path to `target` relative to the directory `base`.
///
/// Both paths are normalized first. Equal paths yield `"."`. When the two
/// paths do not share a root (different Windows drives, or one absolute and
/// one relative) the normalized `target` is returned unchanged.
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target = normalize(target);
    let base = normalize(base);

    if target.has_root() != base.has_root() {
        return target;
    }

    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    if let (Some(Component::Prefix(a)), Some(Component::Prefix(b))) =
        (target_parts.first(), base_parts.first())
    {
        if a != b {
            return target;
        }
    }

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(t, b)| t == b)
        .count();

    let mut rel = PathBuf::new();
    for part in &base_parts[common..] {
        if !matches!(part, Component::CurDir) {
            rel.push("..");
        }
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let input = input.trim();

    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    PathBuf::from(input)
}

/// Make a path absolute against the current directory and normalize it.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        let cwd = std::env::current_dir()?;
        Ok(normalize(&cwd.join(path)))
    }
}

/// Expand `~` and make absolute. Used for every path read from the console.
pub fn expand_path(input: &str) -> std::io::Result<PathBuf> {
    absolutize(&expand_home(input))
}

/// Render a path for substitution into a generated file.
///
/// Generated files are Makefiles, so separators are always `/`.
pub fn to_slash(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if path.has_root() && parts.first().map(|p| p == "/").unwrap_or(false) {
        format!("/{}", parts[1..].join("/"))
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_cur_dir() {
        assert_eq!(normalize(Path::new("./a/./b")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_normalize_folds_parent_dir() {
        assert_eq!(normalize(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent_dir() {
        assert_eq!(normalize(Path::new("../../a")), PathBuf::from("../../a"));
    }

    #[test]
    fn test_normalize_empty_is_dot() {
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_relative_path_equal_is_dot() {
        assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b")), PathBuf::from("."));
    }

    #[test]
    fn test_relative_path_descendant() {
        assert_eq!(
            relative_path(Path::new("/src/parse.c"), Path::new("/src")),
            PathBuf::from("parse.c")
        );
    }

    #[test]
    fn test_relative_path_ancestor() {
        assert_eq!(
            relative_path(Path::new("/proj/proofs"), Path::new("/proj/proofs/parse_header")),
            PathBuf::from("..")
        );
    }

    #[test]
    fn test_relative_path_sibling_trees() {
        assert_eq!(
            relative_path(Path::new("/proj/proofs"), Path::new("/src")),
            PathBuf::from("../proj/proofs")
        );
        assert_eq!(
            relative_path(Path::new("/work/source"), Path::new("/work/test/cbmc/proofs")),
            PathBuf::from("../../../source")
        );
    }

    #[test]
    fn test_relative_path_with_dots_in_input() {
        assert_eq!(
            relative_path(Path::new("/a/./b/../c"), Path::new("/a/d/.")),
            PathBuf::from("../c")
        );
    }

    #[test]
    fn test_relative_path_resolves_back() {
        let target = Path::new("/x/y/z/file.c");
        let base = Path::new("/x/q/r");
        let rel = relative_path(target, base);
        assert_eq!(normalize(&base.join(rel)), PathBuf::from(target));
    }

    #[test]
    fn test_relative_path_mixed_roots_returns_target() {
        assert_eq!(relative_path(Path::new("a/b"), Path::new("/c")), PathBuf::from("a/b"));
    }

    #[test]
    fn test_expand_home_plain_path_untouched() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
        assert_eq!(expand_home("  rel/x \n"), PathBuf::from("rel/x"));
    }

    #[test]
    fn test_expand_home_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/src"), home.join("src"));
        }
    }

    #[test]
    fn test_absolutize_relative() {
        let abs = absolutize(Path::new("some/dir")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("some/dir"));
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("../proj/proofs")), "../proj/proofs");
        assert_eq!(to_slash(Path::new(".")), ".");
        assert_eq!(to_slash(Path::new("/a/b")), "/a/b");
    }
}
