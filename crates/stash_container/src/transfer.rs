//! Copying subtrees between and within containers.

use stash_foundation::{Value, intern};
use tracing::debug;

use crate::container::Container;
use crate::prefix;

/// Options shared by the transfer operations.
struct Plan<'p> {
    source_prefix: &'p str,
    dest_prefix: &'p str,
    force_objects: bool,
}

impl Plan<'_> {
    /// Collects the cells to write, under their destination paths, before
    /// anything is written.
    fn snapshot(&self, source: &Container) -> Vec<(String, Value)> {
        source
            .iter()
            .filter_map(|(key, value)| {
                let target = prefix::retarget(&key.name(), self.source_prefix, self.dest_prefix)?;
                let value = if self.force_objects {
                    value.duplicate()
                } else {
                    value.clone()
                };
                Some((target, value))
            })
            .collect()
    }
}

fn write(dest: &mut Container, cells: Vec<(String, Value)>, keep_existing: bool) -> usize {
    let mut written = 0;
    for (path, value) in cells {
        let key = intern(&path);
        if keep_existing && dest.contains(key) {
            continue;
        }
        if dest.store(key, value) {
            written += 1;
        }
    }
    written
}

impl Container {
    /// Copies every cell of `source` at or below `source_prefix` to the
    /// same relative place below `dest_prefix` in this container.
    ///
    /// With `keep_existing`, destination cells that already exist are left
    /// alone. With `force_objects`, objects are duplicated instead of
    /// shared. Returns the number of cells that changed.
    pub fn transfer_from(
        &mut self,
        source: &Container,
        source_prefix: &str,
        dest_prefix: &str,
        keep_existing: bool,
        force_objects: bool,
    ) -> usize {
        let plan = Plan {
            source_prefix,
            dest_prefix,
            force_objects,
        };
        let cells = plan.snapshot(source);
        debug!(source_prefix, dest_prefix, count = cells.len(), "transferring cells");
        write(self, cells, keep_existing)
    }

    /// Like [`Container::transfer_from`] with this container as the source.
    ///
    /// Overlapping prefixes are fine: only the cells present before the
    /// call are copied.
    pub fn transfer_within(
        &mut self,
        source_prefix: &str,
        dest_prefix: &str,
        keep_existing: bool,
        force_objects: bool,
    ) -> usize {
        let plan = Plan {
            source_prefix,
            dest_prefix,
            force_objects,
        };
        let cells = plan.snapshot(self);
        debug!(source_prefix, dest_prefix, count = cells.len(), "transferring cells within container");
        write(self, cells, keep_existing)
    }
}

/// Copies cells from `source` to `dest`. See [`Container::transfer_from`].
pub fn transfer(
    source: &Container,
    dest: &mut Container,
    source_prefix: &str,
    dest_prefix: &str,
    keep_existing: bool,
    force_objects: bool,
) -> usize {
    dest.transfer_from(source, source_prefix, dest_prefix, keep_existing, force_objects)
}
