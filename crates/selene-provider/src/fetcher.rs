//! Background tile fetch pipeline.
//!
//! Fetches run on a small worker-thread pool and complete on their own
//! schedule; the frame thread submits addresses by reference and drains
//! completed results once per frame. Frame updates never block on I/O.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use dashmap::DashMap;
use selene_cubesphere::TileAddress;

use crate::{FetchError, TileData, TileProvider};

/// A completed fetch, delivered on the frame thread.
#[derive(Debug)]
pub struct FetchedTile {
    /// The address the fetch was issued for.
    pub address: TileAddress,
    /// The resolved data, or the terminal failure for this tile.
    pub result: Result<TileData, FetchError>,
    /// Wall time the provider spent, in microseconds.
    pub fetch_time_us: u64,
}

/// Hands tile fetches to worker threads and collects the results.
///
/// At most one fetch is ever in flight per address: duplicate submissions
/// are rejected until the first result has been drained. There is no
/// cancellation; an issued fetch runs to completion or failure.
pub struct TileFetcher {
    task_sender: Sender<TileAddress>,
    completed_receiver: Receiver<FetchedTile>,
    pending: Arc<DashMap<TileAddress, ()>>,
    in_flight: Arc<AtomicU64>,
}

impl TileFetcher {
    /// Create a fetcher with `thread_count` worker threads over `provider`.
    ///
    /// # Panics
    ///
    /// Panics if `thread_count` is zero or a worker thread cannot be spawned.
    pub fn new(provider: Arc<dyn TileProvider>, thread_count: usize) -> Self {
        assert!(thread_count > 0, "fetcher needs at least one worker thread");

        let (task_sender, task_receiver) = unbounded::<TileAddress>();
        let (completed_sender, completed_receiver) = unbounded::<FetchedTile>();
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = completed_sender.clone();
            let provider = Arc::clone(&provider);
            let in_flight = Arc::clone(&in_flight);

            std::thread::Builder::new()
                .name("tile-fetch-worker".into())
                .spawn(move || {
                    while let Ok(address) = receiver.recv() {
                        let start = Instant::now();
                        let result = provider.fetch(address);
                        let fetch_time_us = start.elapsed().as_micros() as u64;

                        tracing::trace!(tile = %address, us = fetch_time_us, ok = result.is_ok(), "tile fetch finished");

                        // The frame thread may have dropped the fetcher.
                        let _ = sender.send(FetchedTile {
                            address,
                            result,
                            fetch_time_us,
                        });
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("failed to spawn tile fetch worker thread");
        }

        Self {
            task_sender,
            completed_receiver,
            pending: Arc::new(DashMap::new()),
            in_flight,
        }
    }

    /// Create a fetcher sized for the host: all cores minus two for the
    /// frame and render threads, minimum one.
    pub fn with_default_threads(provider: Arc<dyn TileProvider>) -> Self {
        let threads = num_cpus::get().saturating_sub(2).max(1);
        Self::new(provider, threads)
    }

    /// Queue a fetch for `address`.
    ///
    /// Returns `false` (and queues nothing) if a fetch for the same address
    /// is already pending.
    pub fn submit(&self, address: TileAddress) -> bool {
        if self.pending.insert(address, ()).is_some() {
            return false;
        }
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        // The task channel is unbounded; a dropped submission would freeze
        // the tile's quadtree branch forever, and the per-frame subdivision
        // budget already bounds the submission rate.
        self.task_sender
            .send(address)
            .expect("fetch workers terminated");
        true
    }

    /// Drain all fetches completed since the last call.
    ///
    /// Called once per frame on the frame thread; this is where results
    /// cross back onto the tile tree's thread.
    pub fn drain_completed(&self) -> Vec<FetchedTile> {
        let mut completed = Vec::new();
        while let Ok(fetched) = self.completed_receiver.try_recv() {
            self.pending.remove(&fetched.address);
            completed.push(fetched);
        }
        completed
    }

    /// Number of fetches queued or executing.
    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// True if a fetch for `address` has been submitted and not yet drained.
    #[must_use]
    pub fn is_pending(&self, address: &TileAddress) -> bool {
        self.pending.contains_key(address)
    }
}
