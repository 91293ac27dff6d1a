//! The browsable image collection: ordered list plus navigation cursor.
//!
//! The cursor only ever moves through [`Collection::move_by`]; entries the
//! backend cannot open are evicted in place, so the list shrinks over time
//! and can drain to empty.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::warn;

use crate::backend::ImageBackend;

/// Ordered image list owned together with its cursor.
#[derive(Debug)]
pub struct Collection {
    images: Vec<PathBuf>,
    cursor: Option<usize>,
}

impl Collection {
    /// Build a collection positioned at `start` (clamped; `None` if empty).
    #[must_use]
    pub fn new(images: Vec<PathBuf>, start: usize) -> Self {
        let cursor = if images.is_empty() {
            None
        } else {
            Some(start.min(images.len() - 1))
        };
        Self { images, cursor }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Current cursor position, `None` once the collection has drained.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Path under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Path> {
        self.cursor.map(|i| self.images[i].as_path())
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.images
    }

    /// Move the cursor by `offset` entries with wraparound, opening the
    /// target through `backend`.
    ///
    /// On success the cursor commits to the candidate and the opened handle
    /// is returned. On failure the candidate is evicted; with `retry` the
    /// same relative offset is re-applied against the shrunken list (scanning
    /// past several broken files in one call), without it the call reports
    /// failure immediately and the cursor does not move.
    ///
    /// Each failed attempt evicts exactly one entry and the loop is bounded
    /// by the list length at call start, so an all-unopenable list drains to
    /// empty and the cursor becomes `None`. A retry that wraps all the way
    /// back to the starting entry makes one final attempt on it: if that
    /// opens, the call still reports failure to advance and leaves the
    /// cursor where it was. A zero net offset instead reloads the entry
    /// under the cursor, scanning onward as evictions slide later entries
    /// into its place.
    pub fn move_by<B: ImageBackend>(
        &mut self,
        offset: i64,
        retry: bool,
        backend: &B,
    ) -> Option<B::Handle> {
        if self.images.is_empty() {
            self.cursor = None;
            return None;
        }
        let mut start = self.cursor.unwrap_or(0);
        let mut attempts = self.images.len();
        // A zero net offset is a reload request: the candidate equals the
        // start on every pass, and eviction slides the next entry under it.
        // Only a real advance can wrap back around to its starting index.
        let advancing = offset.rem_euclid(self.images.len() as i64) != 0;
        let mut failed = false;
        loop {
            let len = self.images.len();
            if len == 0 {
                self.cursor = None;
                return None;
            }
            let candidate = (start as i64 + offset).rem_euclid(len as i64) as usize;
            let wrapped_to_start = advancing && failed && candidate == start;
            match backend.open(&self.images[candidate]) {
                Ok(handle) => {
                    if wrapped_to_start {
                        // Every other entry failed; staying put is not an
                        // advance.
                        self.cursor = Some(start);
                        return None;
                    }
                    self.cursor = Some(candidate);
                    return Some(handle);
                }
                Err(err) => {
                    warn!(path = %self.images[candidate].display(), error = %err, "evicting unreadable image");
                    self.images.remove(candidate);
                    if candidate < start {
                        start -= 1;
                    }
                    if self.images.is_empty() {
                        self.cursor = None;
                        return None;
                    }
                    failed = true;
                    attempts -= 1;
                    if !retry || attempts == 0 || wrapped_to_start {
                        self.cursor = Some(start.min(self.images.len() - 1));
                        return None;
                    }
                }
            }
        }
    }

    /// Random slideshow advance: draw non-zero offsets until one opens.
    ///
    /// The offset is uniform in `[1, len-1]`, so a successful advance never
    /// lands on the entry it started from. Failed draws evict their target
    /// (no retry inside `move_by`), which bounds the loop by list shrinkage.
    pub fn advance_random<B: ImageBackend, R: Rng + ?Sized>(
        &mut self,
        backend: &B,
        rng: &mut R,
    ) -> Option<B::Handle> {
        loop {
            let len = self.images.len() as i64;
            if len < 2 {
                return None;
            }
            let offset = rng.random_range(1..len);
            if let Some(handle) = self.move_by(offset, false, backend) {
                return Some(handle);
            }
        }
    }

    /// Net offset that crosses `count` group boundaries in `direction`.
    ///
    /// A group boundary is a position whose enclosing directory differs from
    /// the immediately preceding entry's (in list order, with wraparound).
    /// A scan that wraps without finding one contributes a full cycle, which
    /// the modulo arithmetic turns into a no-op.
    #[must_use]
    pub fn group_jump_offset(&self, direction: i64, count: usize) -> i64 {
        let len = self.images.len() as i64;
        let Some(cursor) = self.cursor else { return 0 };
        if len == 0 {
            return 0;
        }
        let mut pos = cursor as i64;
        let mut total = 0i64;
        for _ in 0..count {
            let mut step = len;
            for k in 1..=len {
                let idx = (pos + direction * k).rem_euclid(len) as usize;
                let prev = (idx as i64 - 1).rem_euclid(len) as usize;
                if self.parent_of(idx) != self.parent_of(prev) {
                    step = k;
                    break;
                }
            }
            total += direction * step;
            pos = (pos + direction * step).rem_euclid(len);
        }
        total
    }

    fn parent_of(&self, idx: usize) -> Option<&Path> {
        self.images[idx].parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(names: &[&str]) -> Collection {
        Collection::new(names.iter().map(PathBuf::from).collect(), 0)
    }

    #[test]
    fn empty_collection_has_sentinel_cursor() {
        let c = Collection::new(Vec::new(), 5);
        assert!(c.is_empty());
        assert_eq!(c.cursor(), None);
        assert_eq!(c.current(), None);
    }

    #[test]
    fn start_is_clamped_into_range() {
        let c = Collection::new(vec![PathBuf::from("a.png")], 9);
        assert_eq!(c.cursor(), Some(0));
    }

    #[test]
    fn group_offsets_walk_directory_boundaries() {
        let c = collection(&["x/1.png", "x/2.png", "y/3.png", "y/4.png", "z/5.png"]);
        assert_eq!(c.group_jump_offset(1, 1), 2); // first entry of y
        assert_eq!(c.group_jump_offset(1, 2), 4); // then z
        // Backwards from the head wraps to the start of z.
        assert_eq!(c.group_jump_offset(-1, 1), -1);
    }

    #[test]
    fn homogeneous_list_group_jump_is_full_cycle() {
        let c = collection(&["x/1.png", "x/2.png", "x/3.png"]);
        assert_eq!(c.group_jump_offset(1, 1), 3);
        assert_eq!(c.group_jump_offset(1, 1).rem_euclid(c.len() as i64), 0);
    }
}
