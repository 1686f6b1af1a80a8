//! An ordered `i64 -> i64` map built on a skip list.
//!
//! ```
//! use skipindex::OrderedIndex;
//!
//! let mut index = OrderedIndex::new();
//! for k in &[1, 2, 3, 5, 8] {
//!     index.put(*k, k * 100);
//! }
//! assert_eq!(index.get(5), Some(500));
//! assert_eq!(index.ceiling(4), Some((5, 500)));
//! assert_eq!(index.floor(4), Some((3, 300)));
//! assert_eq!(index.range(2, 5), vec![(2, 200), (3, 300), (5, 500)]);
//! ```
//!
//! The index does no locking of its own. Share it between threads behind a
//! `Mutex` or `RwLock`. The default RNG is thread-local, so a shared index
//! needs a `Send` RNG passed through `with_rng`:
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use skipindex::OrderedIndex;
//! use std::sync::{Arc, Mutex};
//! use std::thread;
//!
//! let index = Arc::new(Mutex::new(OrderedIndex::with_rng(StdRng::seed_from_u64(1))));
//! let writer = Arc::clone(&index);
//! thread::spawn(move || writer.lock().unwrap().put(1, 10))
//!     .join()
//!     .unwrap();
//! assert_eq!(index.lock().unwrap().get(1), Some(10));
//! ```

mod level;
mod skiplist;

pub use level::{Config, BRANCH_PROBABILITY, MAX_HEIGHT};
pub use skiplist::{Iter, OrderedIndex, Range};
