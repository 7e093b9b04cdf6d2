//! Lexical path helpers. Nothing here touches the filesystem or reads the
//! working directory; callers pass it in.

use std::path::{Component, Path, PathBuf};

/// Removes `.` components and folds `name/..` pairs.
///
/// Leading `..` components of a relative path are kept since there is
/// nothing to fold them into.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Returns `true` if both paths name the same file after normalization.
#[must_use]
pub fn same_file(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// Directory containing `path`, or an empty path for a bare file name.
#[must_use]
pub fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

/// File name of `path` as UTF-8, or `""`.
#[must_use]
pub fn base_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// Path from directory `from` to `to`, with `/` separators.
///
/// With `force_relative`, a result that does not already start with `.`
/// gets a `./` prefix so it reads as a relative module specifier.
#[must_use]
pub fn make_relative(from: &Path, to: &Path, force_relative: bool) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts.iter().zip(&to_parts).take_while(|(a, b)| a == b).count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from_parts.len() {
        segments.push("..".to_string());
    }
    for part in &to_parts[common..] {
        segments.push(part.as_os_str().to_string_lossy().into_owned());
    }

    let relative = segments.join("/");
    if force_relative && !relative.starts_with('.') {
        format!("./{relative}")
    } else {
        relative
    }
}

/// Puts `file` on the same base as the targets discovered under `root`.
///
/// Both sides are first resolved against `cwd`. A file inside the root
/// comes back joined onto `root` as given (bare when `root` is `.`), so
/// it compares equal to the matching target. A file outside the root
/// stays absolute.
#[must_use]
pub fn rebase(file: &Path, root: &Path, cwd: &Path) -> PathBuf {
    let absolute_root = normalize(&cwd.join(root));
    let absolute_file = normalize(&cwd.join(file));
    match absolute_file.strip_prefix(&absolute_root) {
        Ok(rel) => normalize(&root.join(rel)),
        Err(_) => absolute_file,
    }
}
