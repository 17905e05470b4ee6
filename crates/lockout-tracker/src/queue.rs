/// Position of an identity inside an [`EvictionQueue`].
///
/// Only valid until the node it points at is removed. The tracker keeps each
/// handle inside the record it belongs to and drops both together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueHandle(usize);

#[derive(Debug)]
struct Node {
    identity: String,
    prev: Option<usize>,
    next: Option<usize>,
}

/// FIFO of identities ordered by when they started failing, oldest at the head.
///
/// A doubly linked list stored in a slab so that removal by handle is O(1)
/// and freed slots are reused instead of growing the backing vector.
#[derive(Debug, Default)]
pub struct EvictionQueue {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl EvictionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append an identity at the tail and return its handle.
    pub fn push_back(&mut self, identity: String) -> QueueHandle {
        let node = Node {
            identity,
            prev: self.tail,
            next: None,
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

        match self.tail {
            Some(tail) => {
                if let Some(Some(prev)) = self.slots.get_mut(tail) {
                    prev.next = Some(slot);
                }
            }
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
        QueueHandle(slot)
    }

    /// Unlink the node behind `handle`, returning its identity.
    pub fn remove(&mut self, handle: QueueHandle) -> Option<String> {
        let node = self.slots.get_mut(handle.0)?.take()?;

        match node.prev {
            Some(prev) => {
                if let Some(Some(n)) = self.slots.get_mut(prev) {
                    n.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(Some(n)) = self.slots.get_mut(next) {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(handle.0);
        self.len -= 1;
        Some(node.identity)
    }

    /// Remove and return the oldest identity.
    pub fn pop_front(&mut self) -> Option<String> {
        let head = self.head?;
        self.remove(QueueHandle(head))
    }

    pub fn front(&self) -> Option<&str> {
        self.head
            .and_then(|slot| self.slots.get(slot))
            .and_then(Option::as_ref)
            .map(|node| node.identity.as_str())
    }

    /// Identities from oldest to newest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            queue: self,
            cursor: self.head,
        }
    }
}

pub struct Iter<'a> {
    queue: &'a EvictionQueue,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.slots.get(self.cursor?)?.as_ref()?;
        self.cursor = node.next;
        Some(node.identity.as_str())
    }
}
