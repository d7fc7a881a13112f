//! LRU Tracker Module
//!
//! Implements Least Recently Used ordering for cache eviction.

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    key: String,
    prev: usize,
    next: usize,
}

// == LRU Tracker ==
/// Tracks access order for the LRU eviction strategy.
///
/// Keys live in an arena-backed doubly-linked list addressed by slot index:
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
///
/// The store keeps each key's slot index next to its entry, so touching and
/// removing are O(1). Freed slots are recycled.
#[derive(Debug)]
pub struct LruTracker {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl Default for LruTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Insert ==
    /// Adds a key at the most recently used end and returns its slot.
    pub fn insert(&mut self, key: String) -> usize {
        let node = Node {
            key,
            prev: NIL,
            next: NIL,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.attach_front(slot);
        self.len += 1;
        slot
    }

    // == Touch ==
    /// Marks a slot as most recently used.
    pub fn touch(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }
        self.detach(slot);
        self.attach_front(slot);
    }

    // == Remove ==
    /// Removes a slot from the tracker and returns its key.
    ///
    /// Returns None if the slot is not occupied.
    pub fn remove(&mut self, slot: usize) -> Option<String> {
        if !matches!(self.slots.get(slot), Some(Some(_))) {
            return None;
        }
        self.detach(slot);
        let node = self.slots[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(node.key)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        if self.tail == NIL {
            return None;
        }
        self.remove(self.tail)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.node(self.tail).map(|n| n.key.as_str())
    }

    // == Iterate ==
    /// Iterates keys from least to most recently used.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.tail;
        std::iter::from_fn(move || {
            let node = self.node(cursor)?;
            cursor = node.prev;
            Some(node.key.as_str())
        })
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, slot: usize) -> Option<&Node> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = match self.node(slot) {
            Some(n) => (n.prev, n.next),
            None => return,
        };

        match self.node_mut(prev) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match self.node_mut(next) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }

        if let Some(n) = self.node_mut(slot) {
            n.prev = NIL;
            n.next = NIL;
        }
    }

    fn attach_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(n) = self.node_mut(slot) {
            n.prev = NIL;
            n.next = old_head;
        }
        match self.node_mut(old_head) {
            Some(h) => h.prev = slot,
            None => self.tail = slot,
        }
        self.head = slot;
    }
}
