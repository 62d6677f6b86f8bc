//! Rotating queue of active players.
//!
//! The queue is a circular doubly linked list threaded through an arena
//! indexed by `PlayerId`, so popping the front and rotating are both O(1)
//! and a removed player can never come back: nothing re-links a slot once
//! it has been unlinked.

use crate::board::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    prev: usize,
    next: usize,
    queued: bool,
}

/// Ordered ring of players still taking turns. The front is the player
/// whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnScheduler {
    links: Vec<Link>,
    head: Option<usize>,
    len: usize,
}

impl TurnScheduler {
    /// Queues players `0..count` in selection order.
    pub fn new(count: usize) -> Self {
        let links = (0..count)
            .map(|i| Link {
                prev: (i + count - 1) % count,
                next: (i + 1) % count,
                queued: true,
            })
            .collect();
        TurnScheduler {
            links,
            head: if count == 0 { None } else { Some(0) },
            len: count,
        }
    }

    /// The player whose turn it is.
    pub fn peek_current(&self) -> Option<PlayerId> {
        self.head.map(PlayerId)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if `id` is still waiting for or taking a turn.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.links.get(id.0).is_some_and(|l| l.queued)
    }

    /// Moves the current player to the back of the queue.
    pub fn rotate(&mut self) {
        if let Some(h) = self.head {
            self.head = Some(self.links[h].next);
        }
    }

    /// Removes the current player for good and returns them.
    pub fn remove_current(&mut self) -> Option<PlayerId> {
        let h = self.head?;
        if self.len == 1 {
            self.head = None;
        } else {
            let Link { prev, next, .. } = self.links[h];
            self.links[prev].next = next;
            self.links[next].prev = prev;
            self.head = Some(next);
        }
        self.links[h].queued = false;
        self.len -= 1;
        Some(PlayerId(h))
    }

    /// Ends the current player's turn segment: removes them if they just
    /// went terminal, otherwise rotates them to the back. Returns the new
    /// current player.
    pub fn advance(&mut self, terminal: bool) -> Option<PlayerId> {
        if terminal {
            self.remove_current();
        } else {
            self.rotate();
        }
        self.peek_current()
    }

    /// Empties the queue, returning its members in turn order.
    pub fn drain(&mut self) -> Vec<PlayerId> {
        let mut drained = Vec::with_capacity(self.len);
        while let Some(id) = self.remove_current() {
            drained.push(id);
        }
        drained
    }

    /// Members in turn order, starting with the current player.
    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        let mut cursor = self.head;
        (0..self.len).filter_map(move |_| {
            let at = cursor?;
            cursor = Some(self.links[at].next);
            Some(PlayerId(at))
        })
    }
}
