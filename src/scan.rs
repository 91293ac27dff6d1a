//! Path resolution: expand user-supplied roots into the browsable image list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Error;

/// Options controlling path resolution.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Whether to follow symbolic links while walking.
    pub follow_links: bool,
    /// Whether to keep only files whose extension looks like an image.
    pub filter_images: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            follow_links: false,
            filter_images: true,
        }
    }
}

/// Result of resolving the supplied roots.
#[derive(Debug, Clone)]
pub struct Scan {
    /// Discovered image paths, per-root ordered, roots in argument order.
    pub images: Vec<PathBuf>,
    /// Index of the first root that was itself a file, 0 otherwise.
    pub start_index: usize,
}

/// Return `true` if `path` has an allowed image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    let exts: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| *e == ext)
        })
}

/// Expand `roots` into a flat ordered list of image locations.
///
/// A root that is a file walks its containing directory instead and is
/// remembered as the trigger the caller should start from. Within one root
/// the ordering key is (depth below the root, full path); roots are appended
/// in argument order with no cross-root deduplication.
///
/// # Errors
/// Returns [`Error::BadPath`] naming every root that does not exist.
pub fn resolve(roots: &[PathBuf], opts: &ScanOptions) -> Result<Scan, Error> {
    // Validate inputs first (collect all bad ones).
    let bad: Vec<_> = roots.iter().filter(|p| !p.exists()).collect();
    if !bad.is_empty() {
        let joined = bad
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::BadPath(joined));
    }

    let mut images = Vec::new();
    let mut triggers = Vec::new();
    for root in roots {
        let walk_root = if root.is_dir() {
            root.clone()
        } else {
            triggers.push(root.clone());
            match root.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            }
        };
        let found = walk_one_root(&walk_root, opts);
        debug!(root = %walk_root.display(), count = found.len(), "walked root");
        images.extend(found);
    }

    let start_index = triggers
        .iter()
        .find_map(|t| images.iter().position(|p| p == t))
        .unwrap_or(0);

    info!(
        count = images.len(),
        start = start_index,
        "path resolution complete"
    );
    Ok(Scan {
        images,
        start_index,
    })
}

fn walk_one_root(root: &Path, opts: &ScanOptions) -> Vec<PathBuf> {
    let mut wd = WalkDir::new(root)
        .follow_links(opts.follow_links)
        .sort_by_file_name();
    if !opts.recursive {
        wd = wd.max_depth(1);
    }

    // Each directory is visited at most once per walk, tracked by canonical
    // identity, so symlink cycles and aliased subtrees cannot re-enter.
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut found: Vec<(usize, PathBuf)> = Vec::new();
    for entry in wd
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() {
                return true;
            }
            match e.path().canonicalize() {
                Ok(id) => visited.insert(id),
                Err(_) => true,
            }
        })
        .flatten()
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if opts.filter_images && !is_supported_image(path) {
            continue;
        }
        found.push((entry.depth(), path.to_path_buf()));
    }

    // Shallow entries first, then lexicographic within a depth.
    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    found.into_iter().map(|(_, p)| p).collect()
}
