//! BucketList: singly linked sequence with positional insert and remove.
//!
//! Nodes live in a slot arena and link to their successor by key, so the
//! list never juggles raw pointers. A tail key gives O(1) append; any
//! other position is reached by walking from the head.

use crate::error::TableError;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    struct NodeKey;
}

#[derive(Debug)]
struct Node<T> {
    item: T,
    next: Option<NodeKey>,
}

#[derive(Debug)]
pub struct BucketList<T> {
    nodes: SlotMap<NodeKey, Node<T>>,
    head: Option<NodeKey>,
    tail: Option<NodeKey>,
}

impl<T> BucketList<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    /// Number of nodes; the arena keeps this count, so it is O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Key of the node at `index`, or `None` past the end.
    fn key_at(&self, index: usize) -> Option<NodeKey> {
        let mut cur = self.head;
        for _ in 0..index {
            cur = self.nodes[cur?].next;
        }
        cur
    }

    /// Insert `item` so it becomes the `index`-th node; `index == len` appends.
    pub fn insert_at(&mut self, index: usize, item: T) -> Result<(), TableError> {
        let len = self.len();
        if index > len {
            return Err(TableError::IndexOutOfRange { index, len });
        }
        if index == len {
            self.push_back(item);
        } else if index == 0 {
            let k = self.nodes.insert(Node {
                item,
                next: self.head,
            });
            self.head = Some(k);
        } else {
            let prev = self
                .key_at(index - 1)
                .ok_or(TableError::IndexOutOfRange { index, len })?;
            let next = self.nodes[prev].next;
            let k = self.nodes.insert(Node { item, next });
            self.nodes[prev].next = Some(k);
        }
        Ok(())
    }

    pub fn push_back(&mut self, item: T) {
        let k = self.nodes.insert(Node { item, next: None });
        match self.tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let k = self.head?;
        let node = self.nodes.remove(k)?;
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        Some(node.item)
    }

    /// Unlink the `index`-th node and hand its item back. `None` if
    /// `index >= len`, which includes every index on an empty list.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        if index == 0 {
            return self.pop_front();
        }
        let prev = self.key_at(index - 1)?;
        let k = self.nodes[prev].next?;
        let node = self.nodes.remove(k)?;
        self.nodes[prev].next = node.next;
        if self.tail == Some(k) {
            self.tail = Some(prev);
        }
        Some(node.item)
    }

    /// Position of the first item matching `pred`, in list order.
    pub fn position<F>(&self, mut pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(|item| pred(item))
    }

    pub fn find<F>(&self, mut pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|item| pred(item))
    }

    pub fn find_mut<F>(&mut self, mut pred: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if pred(&node.item) {
                return Some(&mut self.nodes[k].item);
            }
            cur = node.next;
        }
        None
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cur: self.head,
        }
    }

    /// Visit every item mutably, head to tail.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = &mut self.nodes[k];
            f(&mut node.item);
            cur = node.next;
        }
    }

    /// Remove items from the front, one per `next()`. Items not consumed
    /// stay in the list.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { list: self }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}

impl<T> Default for BucketList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over items in list order.
pub struct Iter<'a, T> {
    list: &'a BucketList<T>,
    cur: Option<NodeKey>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.list.nodes[self.cur?];
        self.cur = node.next;
        Some(&node.item)
    }
}

pub struct Drain<'a, T> {
    list: &'a mut BucketList<T>,
}

impl<'a, T> Iterator for Drain<'a, T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}
