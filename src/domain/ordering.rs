//! Manual ordering shared by deal stages, deal types and lead flow rules.

/// Computes the new `sort` of every item after moving `moved` to `position`.
///
/// `ordered` is the current order. The position is zero-based and clamped to
/// the end of the list. Returns `None` when `moved` is not part of the list.
pub fn reorder<T>(ordered: &[T], moved: T, position: usize) -> Option<Vec<(T, i32)>>
where
    T: Copy + PartialEq,
{
    let current = ordered.iter().position(|id| *id == moved)?;

    let mut ids = ordered.to_vec();
    let item = ids.remove(current);
    let position = position.min(ids.len());
    ids.insert(position, item);

    Some(renumber(&ids))
}

/// Assigns consecutive `sort` values starting from zero.
pub fn renumber<T: Copy>(ordered: &[T]) -> Vec<(T, i32)> {
    ordered
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_item_forward() {
        let result = reorder(&[10, 20, 30, 40], 10, 2).unwrap();
        assert_eq!(result, vec![(20, 0), (30, 1), (10, 2), (40, 3)]);
    }

    #[test]
    fn moves_item_backward() {
        let result = reorder(&[10, 20, 30, 40], 40, 0).unwrap();
        assert_eq!(result, vec![(40, 0), (10, 1), (20, 2), (30, 3)]);
    }

    #[test]
    fn clamps_position_past_the_end() {
        let result = reorder(&[1, 2, 3], 1, 99).unwrap();
        assert_eq!(result, vec![(2, 0), (3, 1), (1, 2)]);
    }

    #[test]
    fn unknown_item_is_rejected() {
        assert!(reorder(&[1, 2, 3], 7, 0).is_none());
    }

    #[test]
    fn renumber_closes_gaps() {
        assert_eq!(renumber(&[5, 9]), vec![(5, 0), (9, 1)]);
    }
}
