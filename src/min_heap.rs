use std::collections::HashMap;
use std::hash::Hash;

/// A min-priority queue. The item with the lowest priority comes out first.
pub trait PriorityQueue<T, P: Ord> {
    fn is_empty(&self) -> bool;

    fn insert(&mut self, item: T, priority: P);

    /// Remove and return the minimum item, or `None` if the queue is empty.
    fn extract_min(&mut self) -> Option<T>;
}

#[derive(Debug, Clone)]
struct Entry<T, P> {
    priority: P,
    // insertion sequence, breaks ties first-in first-out
    seq: u64,
    item: T,
}

impl<T, P: Ord> Entry<T, P> {
    fn less_than(&self, other: &Self) -> bool {
        (&self.priority, self.seq) < (&other.priority, other.seq)
    }
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

/// Binary min-heap with stable (FIFO) ordering among equal priorities.
#[derive(Debug, Clone)]
pub struct MinHeap<T, P> {
    elements: Vec<Entry<T, P>>,
    next_seq: u64,
}

impl<T, P> MinHeap<T, P> {
    pub fn new() -> Self {
        MinHeap {
            elements: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

impl<T, P: Ord> MinHeap<T, P> {
    pub fn peek_min(&self) -> Option<(&T, &P)> {
        self.elements.first().map(|e| (&e.item, &e.priority))
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.len()).all(|i| !self.elements[i].less_than(&self.elements[parent(i)]))
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 && self.elements[i].less_than(&self.elements[parent(i)]) {
            self.elements.swap(i, parent(i));
            i = parent(i);
        }
    }

    fn min_heapify(&mut self, mut i: usize) {
        loop {
            let l = left(i);
            let r = right(i);
            let mut smallest = i;

            if l < self.len() && self.elements[l].less_than(&self.elements[smallest]) {
                smallest = l;
            }
            if r < self.len() && self.elements[r].less_than(&self.elements[smallest]) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T, P: Ord> PriorityQueue<T, P> for MinHeap<T, P> {
    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn insert(&mut self, item: T, priority: P) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.elements.push(Entry {
            priority,
            seq,
            item,
        });
        self.sift_up(self.len() - 1);
    }

    fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop()?;
        self.min_heapify(0);
        Some(min.item)
    }
}

impl<T, P> Default for MinHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Min-heap that tracks where each item lives so its priority can be changed
/// in place (decrease-key). Inserting an item that is already queued updates
/// its priority instead of adding a duplicate.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap<T, P> {
    elements: Vec<Entry<T, P>>,
    index: HashMap<T, usize>,
    next_seq: u64,
}

impl<T: Hash + Eq + Clone, P: Ord> IndexedMinHeap<T, P> {
    pub fn new() -> Self {
        IndexedMinHeap {
            elements: Vec::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    pub fn peek_min(&self) -> Option<(&T, &P)> {
        self.elements.first().map(|e| (&e.item, &e.priority))
    }

    pub fn priority(&self, item: &T) -> Option<&P> {
        self.index.get(item).map(|&i| &self.elements[i].priority)
    }

    /// Change the priority of a queued item. Does nothing if it is not queued.
    pub fn adjust_priority(&mut self, item: &T, priority: P) {
        let Some(&i) = self.index.get(item) else {
            return;
        };
        let decreased = priority < self.elements[i].priority;
        self.elements[i].priority = priority;
        if decreased {
            self.sift_up(i);
        } else {
            self.min_heapify(i);
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.elements.swap(i, j);
        self.index.insert(self.elements[i].item.clone(), i);
        self.index.insert(self.elements[j].item.clone(), j);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 && self.elements[i].less_than(&self.elements[parent(i)]) {
            self.swap(i, parent(i));
            i = parent(i);
        }
    }

    fn min_heapify(&mut self, mut i: usize) {
        loop {
            let l = left(i);
            let r = right(i);
            let mut smallest = i;

            if l < self.len() && self.elements[l].less_than(&self.elements[smallest]) {
                smallest = l;
            }
            if r < self.len() && self.elements[r].less_than(&self.elements[smallest]) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T: Hash + Eq + Clone, P: Ord> PriorityQueue<T, P> for IndexedMinHeap<T, P> {
    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn insert(&mut self, item: T, priority: P) {
        if self.index.contains_key(&item) {
            self.adjust_priority(&item, priority);
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let slot = self.len();
        self.index.insert(item.clone(), slot);
        self.elements.push(Entry {
            priority,
            seq,
            item,
        });
        self.sift_up(slot);
    }

    fn extract_min(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.len() - 1;
        self.swap(0, last);
        let min = self.elements.pop()?;
        self.index.remove(&min.item);
        self.min_heapify(0);
        Some(min.item)
    }
}

impl<T: Hash + Eq + Clone, P: Ord> Default for IndexedMinHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
