//! Card handle registry.
//!
//! Maps deck positions to the handles of currently mounted cards. Only the
//! virtualization pass inserts or removes entries; everyone else reads.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::card::{CardHandle, CardKey, MountTicket};

pub(crate) struct MountedCard {
    pub(crate) key: CardKey,
    pub(crate) ticket: MountTicket,
    pub(crate) handle: Arc<dyn CardHandle>,
}

/// Mounted card handles, keyed by deck position.
///
/// A handle stays in the registry for as long as its position stays in the
/// mounted set, so moving the active index never recreates a card.
#[derive(Default)]
pub struct CardRegistry {
    cards: BTreeMap<usize, MountedCard>,
}

impl CardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle mounted at `position`, if any.
    pub fn get(&self, position: usize) -> Option<Arc<dyn CardHandle>> {
        self.cards.get(&position).map(|card| card.handle.clone())
    }

    /// Whether a card is mounted at `position`.
    pub fn contains(&self, position: usize) -> bool {
        self.cards.contains_key(&position)
    }

    /// The live mount ticket at `position`.
    pub fn ticket(&self, position: usize) -> Option<MountTicket> {
        self.cards.get(&position).map(|card| card.ticket)
    }

    /// The key of the item mounted at `position`.
    pub fn key(&self, position: usize) -> Option<&CardKey> {
        self.cards.get(&position).map(|card| &card.key)
    }

    /// Number of mounted cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Mounted positions in ascending order.
    pub fn positions(&self) -> Vec<usize> {
        self.cards.keys().copied().collect()
    }

    pub(crate) fn insert(&mut self, position: usize, card: MountedCard) -> Option<MountedCard> {
        self.cards.insert(position, card)
    }

    pub(crate) fn remove(&mut self, position: usize) -> Option<MountedCard> {
        self.cards.remove(&position)
    }
}

impl fmt::Debug for CardRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.cards.iter().map(|(position, card)| (position, (&card.key, card.ticket))))
            .finish()
    }
}
