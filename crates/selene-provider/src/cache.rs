//! Process-wide, de-duplicating image asset cache.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::{FetchError, TileImage};

type CacheCell = OnceLock<Result<Arc<TileImage>, Arc<FetchError>>>;

/// Keyed cache of decoded tile imagery.
///
/// Guarantees at most one loader runs per asset path: concurrent requesters
/// for the same path block on the same cell and share the result. Entries —
/// including failures — are never evicted; growth is bounded by the texture
/// level cap, which bounds the number of distinct image paths.
#[derive(Default)]
pub struct ImageCache {
    entries: DashMap<String, Arc<CacheCell>>,
}

impl ImageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached image for `path`, running `load` if this is the
    /// first request. Later requests for a failed path receive
    /// [`FetchError::Shared`] wrapping the original failure.
    pub fn get_or_load<F>(&self, path: &str, load: F) -> Result<Arc<TileImage>, FetchError>
    where
        F: FnOnce() -> Result<TileImage, FetchError>,
    {
        // Clone the cell out of the map so the shard lock is not held while
        // the loader runs.
        let cell = Arc::clone(&self.entries.entry(path.to_string()).or_default());

        match cell.get_or_init(|| load().map(Arc::new).map_err(Arc::new)) {
            Ok(image) => Ok(Arc::clone(image)),
            Err(err) => Err(FetchError::Shared(Arc::clone(err))),
        }
    }

    /// Number of paths ever requested.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no path has been requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gray(size: u32) -> TileImage {
        TileImage::solid(size, [128, 128, 128, 255])
    }

    #[test]
    fn test_loader_runs_once_per_path() {
        let cache = ImageCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..5 {
            let img = cache
                .get_or_load("Z+0/0-0-albedo.png", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(gray(4))
                })
                .unwrap();
            assert_eq!(img.width, 4);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_paths_load_separately() {
        let cache = ImageCache::new();
        let a = cache.get_or_load("a.png", || Ok(gray(2))).unwrap();
        let b = cache.get_or_load("b.png", || Ok(gray(8))).unwrap();
        assert_eq!(a.width, 2);
        assert_eq!(b.width, 8);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_same_path_shares_one_allocation() {
        let cache = ImageCache::new();
        let first = cache.get_or_load("a.png", || Ok(gray(4))).unwrap();
        let second = cache.get_or_load("a.png", || Ok(gray(4))).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failures_are_cached_and_replayed() {
        let cache = ImageCache::new();
        let calls = AtomicUsize::new(0);

        let fail = || -> Result<TileImage, FetchError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Io {
                path: "a.png".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        };

        assert!(matches!(
            cache.get_or_load("a.png", fail),
            Err(FetchError::Shared(_))
        ));
        // Second request must not re-run the loader.
        assert!(matches!(
            cache.get_or_load("a.png", fail),
            Err(FetchError::Shared(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_requests_share_one_load() {
        let cache = Arc::new(ImageCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache
                        .get_or_load("shared.png", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            // Give other threads time to pile up on the cell.
                            std::thread::sleep(std::time::Duration::from_millis(20));
                            Ok(gray(16))
                        })
                        .unwrap()
                })
            })
            .collect();

        let images: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1, "only one loader may run");
        for img in &images[1..] {
            assert!(Arc::ptr_eq(&images[0], img));
        }
    }
}
