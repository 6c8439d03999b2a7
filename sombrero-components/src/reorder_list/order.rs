use sombrero_ui::numeric::move_item;

/// Current visual order of a list: `slots[slot] == original index`.
///
/// Always a permutation of `0..len`; the length never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderedIndexList {
    slots: Vec<usize>,
}

impl OrderedIndexList {
    /// Identity order for `len` items.
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).collect(),
        }
    }

    /// Builds an order from an explicit slot list, rejecting anything that is
    /// not a permutation of `0..slots.len()`.
    pub fn from_slots(slots: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; slots.len()];
        for &original in &slots {
            let slot = seen.get_mut(original)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self { slots })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot currently occupied by `original`.
    pub fn position(&self, original: usize) -> Option<usize> {
        self.slots.iter().position(|&index| index == original)
    }

    /// Original index shown at `slot`.
    pub fn get(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied()
    }

    /// Slots as a slice of original indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }

    /// A new order with the item at slot `from` relocated to slot `to`.
    ///
    /// Both slots are clamped into bounds, so the result is always a
    /// permutation.
    pub fn moved(&self, from: usize, to: usize) -> Self {
        Self {
            slots: move_item(&self.slots, from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(order: &OrderedIndexList) -> bool {
        let mut sorted = order.as_slice().to_vec();
        sorted.sort_unstable();
        sorted == (0..order.len()).collect::<Vec<_>>()
    }

    #[test]
    fn identity_order() {
        let order = OrderedIndexList::new(4);
        assert_eq!(order.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(order.position(2), Some(2));
        assert_eq!(order.position(9), None);
        assert_eq!(order.get(3), Some(3));
        assert_eq!(order.get(4), None);
    }

    #[test]
    fn from_slots_rejects_non_permutations() {
        assert!(OrderedIndexList::from_slots(vec![2, 0, 1]).is_some());
        assert!(OrderedIndexList::from_slots(vec![0, 0, 1]).is_none());
        assert!(OrderedIndexList::from_slots(vec![0, 3, 1]).is_none());
        assert!(OrderedIndexList::from_slots(Vec::new()).is_some());
    }

    #[test]
    fn every_move_keeps_a_permutation() {
        let base = OrderedIndexList::from_slots(vec![3, 1, 4, 0, 2]).unwrap();
        for from in 0..base.len() {
            for to in 0..base.len() + 2 {
                let moved = base.moved(from, to);
                assert!(is_permutation(&moved), "{from}->{to}: {moved:?}");

                let original = base.get(from).unwrap();
                let landed = to.min(base.len() - 1);
                assert_eq!(moved.position(original), Some(landed));

                // Everyone else keeps their relative order.
                let others_before: Vec<_> =
                    base.as_slice().iter().filter(|&&i| i != original).collect();
                let others_after: Vec<_> =
                    moved.as_slice().iter().filter(|&&i| i != original).collect();
                assert_eq!(others_before, others_after);
            }
        }
    }
}
