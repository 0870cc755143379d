//! Virtualization window.
//!
//! Decides which deck positions are materialized for a given active index.
//! Work is bounded by a fixed look-ahead, so a deck of 10,000 items costs the
//! same as one of 50.

/// Number of positions mounted ahead of (and including) the active one.
pub const WINDOW_SIZE: usize = 5;

/// A mounted position and the deck item it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Position in the traversal.
    pub position: usize,
    /// Index into the deck. Differs from `position` only when looping.
    pub item_index: usize,
}

/// Computes mount sets from the active index and deck length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualWindow {
    size: usize,
}

impl Default for VirtualWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualWindow {
    /// A window of [`WINDOW_SIZE`] slots.
    pub fn new() -> Self {
        Self { size: WINDOW_SIZE }
    }

    /// A window of `size` slots (at least one).
    pub fn with_size(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// The look-ahead.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots visible from `active`, ascending.
    ///
    /// Without looping this is `{p : active <= p < len, p - active < size}`.
    /// With looping positions keep counting past `len` and wrap onto items,
    /// capped at `len` visible slots.
    pub fn slots(&self, active: usize, len: usize, looping: bool) -> Vec<Slot> {
        if len == 0 {
            return Vec::new();
        }
        if looping {
            let count = self.size.min(len);
            (active..active + count)
                .map(|position| Slot {
                    position,
                    item_index: position % len,
                })
                .collect()
        } else {
            (active..len)
                .take(self.size)
                .map(|position| Slot {
                    position,
                    item_index: position,
                })
                .collect()
        }
    }

    /// The already-swiped card kept mounted off-screen so it can be brought
    /// back, if there is one.
    pub fn retained(&self, active: usize, len: usize, looping: bool) -> Option<Slot> {
        if active == 0 || len == 0 {
            return None;
        }
        let position = active - 1;
        if looping {
            // May show the same item as a visible slot; this copy is off-screen.
            Some(Slot {
                position,
                item_index: position % len,
            })
        } else if position < len {
            Some(Slot {
                position,
                item_index: position,
            })
        } else {
            None
        }
    }

    /// Everything that should be mounted: the retained slot followed by the
    /// visible ones, ascending by position.
    pub fn mount_set(&self, active: usize, len: usize, looping: bool) -> Vec<Slot> {
        let mut set = Vec::with_capacity(self.size + 1);
        set.extend(self.retained(active, len, looping));
        set.extend(self.slots(active, len, looping));
        set
    }
}

/// Paint order for mounted positions: the reverse of ascending order, so the
/// next card to act is painted last and ends up on top.
pub fn paint_order(mut positions: Vec<usize>) -> Vec<usize> {
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(slots: &[Slot]) -> Vec<usize> {
        slots.iter().map(|slot| slot.position).collect()
    }

    #[test]
    fn test_window_bounds() {
        let window = VirtualWindow::new();
        for len in 0..12 {
            for active in 0..=len {
                let slots = window.slots(active, len, false);
                assert!(slots.len() <= WINDOW_SIZE);
                if active < len {
                    assert_eq!(slots[0].position, active);
                } else {
                    assert!(slots.is_empty());
                }
                assert!(slots.iter().all(|slot| slot.position < len));
            }
        }
    }

    #[test]
    fn test_large_deck_is_bounded() {
        let window = VirtualWindow::new();
        let slots = window.slots(4_000, 10_000, false);
        assert_eq!(positions(&slots), vec![4_000, 4_001, 4_002, 4_003, 4_004]);
    }

    #[test]
    fn test_looping_wraps_items() {
        let window = VirtualWindow::new();
        let slots = window.slots(2, 3, true);
        assert_eq!(positions(&slots), vec![2, 3, 4]);
        let items: Vec<usize> = slots.iter().map(|slot| slot.item_index).collect();
        assert_eq!(items, vec![2, 0, 1]);

        // a looping deck of one keeps a single slot
        assert_eq!(window.slots(7, 1, true).len(), 1);
    }

    #[test]
    fn test_retained_previous_card() {
        let window = VirtualWindow::new();
        assert_eq!(window.retained(0, 3, false), None);
        assert_eq!(
            window.retained(3, 3, false),
            Some(Slot {
                position: 2,
                item_index: 2
            })
        );
        assert_eq!(positions(&window.mount_set(1, 10, false)), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            window.retained(4, 3, true),
            Some(Slot {
                position: 3,
                item_index: 0
            })
        );
    }

    #[test]
    fn test_paint_order_is_reversed() {
        assert_eq!(paint_order(vec![3, 1, 2]), vec![3, 2, 1]);
        assert!(paint_order(Vec::new()).is_empty());
    }
}
