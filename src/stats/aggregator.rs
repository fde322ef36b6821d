//! Shared collection of partial frequency maps
//!
//! Dataspace counter workers each build a private [`FrequencyMap`] and
//! publish it here once their share of the token space is exhausted. The
//! collection has two states:
//!
//! 1. **Open** ([`PartialSpace`]): any number of workers may `publish`
//!    concurrently. Nothing can be read back.
//! 2. **Sealed** ([`SealedPartials`]): produced by the driving thread after
//!    the counting barrier. Read-only, shared by every merge worker.
//!
//! Sealing consumes the open space, so no map can be published after the
//! merge phase has started.
//!
//! # Example
//!
//! ```
//! use termfreq::stats::{FrequencyMap, aggregator::PartialSpace};
//!
//! let space = PartialSpace::new();
//! space.publish(["fox", "fox"].into_iter().collect::<FrequencyMap>());
//! space.publish(["fox", "dog"].into_iter().collect::<FrequencyMap>());
//!
//! let sealed = space.seal();
//! assert_eq!(sealed.len(), 2);
//! assert_eq!(sealed.total(), 4);
//! ```

use crate::stats::FrequencyMap;
use crossbeam::queue::SegQueue;
use std::sync::Arc;

/// Open, concurrently writable collection of partial maps
#[derive(Debug, Default)]
pub struct PartialSpace {
    maps: SegQueue<FrequencyMap>,
}

impl PartialSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a finished partial map
    ///
    /// The map is read-only from here on.
    pub fn publish(&self, partial: FrequencyMap) {
        self.maps.push(partial);
    }

    /// Number of maps published so far
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Close the space and hand out the published maps read-only
    pub fn seal(self) -> SealedPartials {
        let mut maps = Vec::with_capacity(self.maps.len());
        while let Some(map) = self.maps.pop() {
            maps.push(map);
        }
        SealedPartials { maps: maps.into() }
    }
}

/// Immutable, cheaply clonable view of every published partial map
#[derive(Debug, Clone)]
pub struct SealedPartials {
    maps: Arc<[FrequencyMap]>,
}

impl SealedPartials {
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyMap> {
        self.maps.iter()
    }

    /// Sum of counts over every partial map
    pub fn total(&self) -> u64 {
        self.maps.iter().map(FrequencyMap::total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_space_new() {
        let space = PartialSpace::new();
        assert!(space.is_empty());
        assert!(space.seal().is_empty());
    }

    #[test]
    fn test_publish_from_many_threads() {
        let space = Arc::new(PartialSpace::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let space = Arc::clone(&space);
                thread::spawn(move || {
                    space.publish(["aa", "bb", "aa"].into_iter().collect());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let space = Arc::try_unwrap(space).unwrap();
        assert_eq!(space.len(), 8);

        let sealed = space.seal();
        assert_eq!(sealed.len(), 8);
        assert_eq!(sealed.total(), 24);
        assert!(sealed.iter().all(|map| map.get("aa") == Some(2)));
    }

    #[test]
    fn test_sealed_clones_share_maps() {
        let space = PartialSpace::new();
        space.publish(["fox"].into_iter().collect());

        let sealed = space.seal();
        let view = sealed.clone();
        assert_eq!(view.len(), 1);
        assert!(Arc::ptr_eq(&sealed.maps, &view.maps));
    }
}
