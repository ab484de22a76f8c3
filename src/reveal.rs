//! Paginated reveal: a growing window over an ordered list.
//!
//! The window is always a prefix of the source list, so an item can never be
//! shown twice and the window can never run past the end. Loads are modelled
//! as tickets so a load that started before a [`Reveal::reset`] cannot land
//! on the new list:
//!
//! ```text
//! let ticket = reveal.begin_load(20)?;   // is_loading() == true
//! reveal.reset(other_items, 20);         // generation bumped, load cancelled
//! reveal.complete(ticket);               // false: stale ticket, no change
//! ```

use tracing::debug;

/// An in-flight "load more" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    batch: usize,
}

#[derive(Debug, Clone)]
pub struct Reveal<T> {
    items: Vec<T>,
    exposed: usize,
    generation: u64,
    in_flight: Option<LoadTicket>,
}

impl<T: Clone> Reveal<T> {
    /// Expose the first `initial_batch` items (or all of them, if fewer).
    pub fn init(items: Vec<T>, initial_batch: usize) -> Self {
        let exposed = initial_batch.min(items.len());
        Self {
            items,
            exposed,
            generation: 0,
            in_flight: None,
        }
    }

    /// The currently exposed prefix.
    pub fn visible(&self) -> &[T] {
        &self.items[..self.exposed]
    }

    /// True iff items remain beyond the exposed window.
    pub fn has_more(&self) -> bool {
        self.exposed < self.items.len()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Start a load of up to `batch` more items.
    ///
    /// Returns `None` (a no-op) while another load is in flight or when
    /// nothing remains.
    pub fn begin_load(&mut self, batch: usize) -> Option<LoadTicket> {
        if self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        let ticket = LoadTicket {
            generation: self.generation,
            batch,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Finish a load. A ticket from before the last reset is ignored.
    pub fn complete(&mut self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.generation || self.in_flight != Some(ticket) {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale load"
            );
            return false;
        }
        self.in_flight = None;
        self.exposed = (self.exposed + ticket.batch).min(self.items.len());
        true
    }

    /// Begin and immediately complete a load. Returns whether anything grew.
    pub fn load_more(&mut self, batch: usize) -> bool {
        let before = self.exposed;
        match self.begin_load(batch) {
            Some(ticket) => self.complete(ticket) && self.exposed > before,
            None => false,
        }
    }

    /// Swap in a new list. Any in-flight load is superseded.
    pub fn reset(&mut self, items: Vec<T>, initial_batch: usize) {
        self.generation += 1;
        self.in_flight = None;
        self.exposed = initial_batch.min(items.len());
        self.items = items;
    }
}
