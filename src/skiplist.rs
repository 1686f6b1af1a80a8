use crate::level::{Config, LevelGenerator};
use rand::{rngs::ThreadRng, thread_rng, Rng};
use std::fmt::Debug;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::{null, null_mut};
use tracing::{debug, trace};

struct SkipNode {
    key: i64,
    val: i64,
    next: Vec<*mut SkipNode>,
}

impl SkipNode {
    fn head() -> Self {
        Self {
            key: 0,
            val: 0,
            next: vec![],
        }
    }
    fn new_with_kv(key: i64, val: i64, height: usize) -> Self {
        Self {
            key,
            val,
            next: vec![null_mut(); height],
        }
    }
}

/// Link of `node` at level `l`.
///
/// `node` must be a live node owned by an index and span more than `l` levels.
unsafe fn link(node: *const SkipNode, l: usize) -> *mut SkipNode {
    let node = &*node;
    node.next[l]
}

unsafe fn set_link(node: *mut SkipNode, l: usize, to: *mut SkipNode) {
    let node = &mut *node;
    node.next[l] = to;
}

/// What `locate` reports when no node holds the target key.
#[derive(Clone, Copy)]
enum Mode {
    Exact,
    Ceiling,
    Floor,
}

/// An ordered map from `i64` keys to `i64` values backed by a skip list.
///
/// The head is a sentinel whose link count is the number of levels in use.
/// It starts with zero levels, grows when a taller node is inserted and
/// shrinks again once deletions leave its top levels empty.
pub struct OrderedIndex<R = ThreadRng> {
    head: *mut SkipNode,
    len: usize,
    levels: LevelGenerator<R>,
}

// Nodes are exclusively owned by the index and only reached through it.
unsafe impl<R: Send> Send for OrderedIndex<R> {}
unsafe impl<R: Sync> Sync for OrderedIndex<R> {}

impl OrderedIndex<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(thread_rng())
    }
}

impl Default for OrderedIndex<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> OrderedIndex<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_config(rng, Config::default())
    }

    /// # Panics
    ///
    /// If `config.p` is not in `(0, 1)` or `config.max_height` is zero.
    pub fn with_config(rng: R, config: Config) -> Self {
        Self {
            head: Box::into_raw(Box::new(SkipNode::head())),
            len: 0,
            levels: LevelGenerator::new(rng, config),
        }
    }

    /// Inserts `key`, or overwrites its value in place if already present.
    pub fn put(&mut self, key: i64, val: i64) {
        let found = self.locate(key, Mode::Exact);
        if !found.is_null() {
            unsafe { (*found).val = val };
            return;
        }

        let level = self.levels.random();
        let height = self.height();
        if level >= height {
            // SAFETY: the head is owned by the index and lives until drop.
            let head = unsafe { &mut *self.head };
            head.next.resize(level + 1, null_mut());
            trace!(from = height, to = level + 1, "raised max level");
        }

        let node = Box::into_raw(Box::new(SkipNode::new_with_kv(key, val, level + 1)));
        let mut prev = self.head;
        // SAFETY: every node reached from the head is owned by the index, and
        // a node reached at level `l` spans at least `l + 1` levels.
        unsafe {
            for l in (0..self.height()).rev() {
                let mut curr = link(prev, l);
                while !curr.is_null() && (*curr).key < key {
                    prev = curr;
                    curr = link(curr, l);
                }
                if l <= level {
                    set_link(node, l, curr);
                    set_link(prev, l, node);
                }
            }
        }
        self.len += 1;
    }
}

impl<R> OrderedIndex<R> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: i64) -> Option<i64> {
        let node = self.locate(key, Mode::Exact);
        if node.is_null() {
            None
        } else {
            Some(unsafe { (*node).val })
        }
    }

    pub fn contains_key(&self, key: i64) -> bool {
        !self.locate(key, Mode::Exact).is_null()
    }

    /// Smallest entry whose key is `>= target`.
    pub fn ceiling(&self, target: i64) -> Option<(i64, i64)> {
        Self::entry(self.locate(target, Mode::Ceiling))
    }

    /// Largest entry whose key is `<= target`.
    pub fn floor(&self, target: i64) -> Option<(i64, i64)> {
        Self::entry(self.locate(target, Mode::Floor))
    }

    /// All entries with `start <= key <= end`, in key order.
    pub fn range(&self, start: i64, end: i64) -> Vec<(i64, i64)> {
        self.range_iter(start, end).collect()
    }

    /// Lazy form of [`range`](Self::range).
    pub fn range_iter(&self, start: i64, end: i64) -> Range<'_> {
        let curr = if start > end {
            null_mut()
        } else {
            self.locate(start, Mode::Ceiling)
        };
        Range {
            curr,
            end,
            _marker: PhantomData,
        }
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            curr: self.first(),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Removes `key` if present.
    pub fn delete(&mut self, key: i64) {
        let target = self.locate(key, Mode::Exact);
        if target.is_null() {
            return;
        }
        let mut prev = self.head;
        // SAFETY: as in `put`; `target` is unlinked everywhere before it is freed.
        unsafe {
            for l in (0..self.height()).rev() {
                let mut curr = link(prev, l);
                while !curr.is_null() && (*curr).key < key {
                    prev = curr;
                    curr = link(curr, l);
                }
                if curr == target {
                    set_link(prev, l, link(target, l));
                }
            }
            drop(Box::from_raw(target));
        }
        self.len -= 1;
        self.shrink();
    }

    pub fn clear(&mut self) {
        let dropped = self.len;
        // SAFETY: the level-0 chain holds every node exactly once.
        unsafe {
            free_chain(self.first());
            let head = &mut *self.head;
            head.next.clear();
        }
        self.len = 0;
        debug!(dropped, "cleared index");
    }

    fn height(&self) -> usize {
        // SAFETY: the head is owned by the index and lives until drop.
        let head = unsafe { &*self.head };
        head.next.len()
    }

    fn first(&self) -> *mut SkipNode {
        // SAFETY: the head is owned by the index and lives until drop.
        let head = unsafe { &*self.head };
        head.next.first().copied().unwrap_or(null_mut())
    }

    /// Drops trailing levels that no longer hold any node.
    fn shrink(&mut self) {
        let height = self.height();
        // SAFETY: the head is owned by the index and lives until drop.
        let head = unsafe { &mut *self.head };
        let next = &mut head.next;
        while next.last().map_or(false, |p| p.is_null()) {
            next.pop();
        }
        if next.len() < height {
            trace!(from = height, to = next.len(), "shrunk max level");
        }
    }

    /// Walks from the top level down, moving right while the next key is
    /// smaller than `target` and returning early on an exact hit. Without a
    /// hit, `prev` ends on the last level-0 node whose key is below `target`.
    fn locate(&self, target: i64, mode: Mode) -> *mut SkipNode {
        let mut prev = self.head;
        // SAFETY: as in `put`.
        unsafe {
            for l in (0..self.height()).rev() {
                let mut curr = link(prev, l);
                while !curr.is_null() && (*curr).key < target {
                    prev = curr;
                    curr = link(curr, l);
                }
                if !curr.is_null() && (*curr).key == target {
                    return curr;
                }
            }
            match mode {
                Mode::Exact => null_mut(),
                Mode::Ceiling if self.height() == 0 => null_mut(),
                Mode::Ceiling => link(prev, 0),
                Mode::Floor if prev == self.head => null_mut(),
                Mode::Floor => prev,
            }
        }
    }

    fn entry(node: *mut SkipNode) -> Option<(i64, i64)> {
        if node.is_null() {
            None
        } else {
            // SAFETY: non-null results of `locate` are live nodes.
            let node = unsafe { &*node };
            Some((node.key, node.val))
        }
    }
}

/// Frees `ptr` and every node after it at level 0.
unsafe fn free_chain(mut ptr: *mut SkipNode) {
    while !ptr.is_null() {
        let next_ptr = link(ptr, 0);
        drop(Box::from_raw(ptr));
        ptr = next_ptr;
    }
}

impl<R> Drop for OrderedIndex<R> {
    fn drop(&mut self) {
        // SAFETY: nothing can reach the nodes once the index is dropped.
        unsafe {
            free_chain(self.first());
            drop(Box::from_raw(self.head));
        }
    }
}

impl<R> Debug for OrderedIndex<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for l in (0..self.height()).rev() {
            // SAFETY: as in `put`.
            unsafe {
                let mut curr = link(self.head, l);
                write!(f, "{}:", l)?;
                while !curr.is_null() {
                    write!(f, " {:?}", (*curr).key)?;
                    curr = link(curr, l);
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Entries with keys in `[start, end]`, produced by [`OrderedIndex::range_iter`].
pub struct Range<'a> {
    curr: *const SkipNode,
    end: i64,
    _marker: PhantomData<&'a SkipNode>,
}

impl<'a> Iterator for Range<'a> {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.curr.is_null() {
            return None;
        }
        let node = unsafe { &*self.curr };
        if node.key > self.end {
            self.curr = null();
            return None;
        }
        self.curr = node.next[0];
        Some((node.key, node.val))
    }
}

impl<'a> FusedIterator for Range<'a> {}

/// All entries in key order, produced by [`OrderedIndex::iter`].
pub struct Iter<'a> {
    curr: *const SkipNode,
    remaining: usize,
    _marker: PhantomData<&'a SkipNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.curr.is_null() {
            return None;
        }
        let node = unsafe { &*self.curr };
        self.curr = node.next[0];
        self.remaining -= 1;
        Some((node.key, node.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> FusedIterator for Iter<'a> {}

impl<'a, R> IntoIterator for &'a OrderedIndex<R> {
    type Item = (i64, i64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
