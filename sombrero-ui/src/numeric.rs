//! Small scalar helpers shared by the gesture and animation code.

/// Clamps `value` into `[min, max]`.
///
/// Argument order follows the `clamp(min, max, v)` convention used throughout
/// the controllers. If `min > max` the result is `min`.
///
/// ```
/// use sombrero_ui::numeric::clamp;
///
/// assert_eq!(clamp(0.0, 7.0, 9.5), 7.0);
/// assert_eq!(clamp(0.0, 7.0, -3.0), 0.0);
/// ```
pub fn clamp(min: f32, max: f32, value: f32) -> f32 {
    value.min(max).max(min)
}

/// Linearly remaps `value` from the `from` range onto the `to` range.
///
/// The result is not clamped, so values outside `from` extrapolate. A
/// degenerate `from` range maps everything onto `to.0`.
///
/// ```
/// use sombrero_ui::numeric::remap;
///
/// assert_eq!(remap((0.0, 1.0), (10.0, 20.0), 0.5), 15.0);
/// assert_eq!(remap((-1.0, 1.0), (0.0, 2.0), 2.0), 3.0);
/// ```
pub fn remap(from: (f32, f32), to: (f32, f32), value: f32) -> f32 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    let progress = (value - from.0) / span;
    to.0 + progress * (to.1 - to.0)
}

/// Rounds `value` to the nearest multiple of `step`.
///
/// A non-positive `step` leaves the value untouched.
pub fn snap_to_interval(step: f32, value: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

/// Snaps `value` to a point of an ascending set, returning the point and its
/// index.
///
/// The scan walks forward while the distance keeps shrinking: an exact hit
/// returns immediately, the first growth in distance returns the previous
/// point, and running off the end returns the last point. Returns `None` for
/// an empty set.
///
/// ```
/// use sombrero_ui::numeric::snap_to_points;
///
/// let points = [0.0, 10.0, 20.0];
/// assert_eq!(snap_to_points(&points, 3.0), Some((0.0, 0)));
/// assert_eq!(snap_to_points(&points, 7.0), Some((10.0, 1)));
/// assert_eq!(snap_to_points(&points, 20.0), Some((20.0, 2)));
/// ```
pub fn snap_to_points(points: &[f32], value: f32) -> Option<(f32, usize)> {
    let (&first, rest) = points.split_first()?;
    let mut last_distance = (first - value).abs();

    for (offset, &point) in rest.iter().enumerate() {
        let index = offset + 1;
        let distance = (point - value).abs();

        if distance == 0.0 {
            return Some((point, index));
        }
        if distance > last_distance {
            return Some((points[index - 1], index - 1));
        }
        if index == points.len() - 1 {
            return Some((point, index));
        }
        last_distance = distance;
    }

    Some((first, 0))
}

/// Returns a copy of `items` with the element at `from` relocated to `to`.
///
/// Every other element keeps its relative order. Both indices are clamped
/// into the slice bounds; an empty slice yields an empty vector.
///
/// ```
/// use sombrero_ui::numeric::move_item;
///
/// assert_eq!(move_item(&[0, 1, 2, 3], 0, 2), vec![1, 2, 0, 3]);
/// assert_eq!(move_item(&[0, 1, 2, 3], 3, 1), vec![0, 3, 1, 2]);
/// ```
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if moved.is_empty() {
        return moved;
    }
    let last = moved.len() - 1;
    let item = moved.remove(from.min(last));
    moved.insert(to.min(last), item);
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_both_bounds() {
        assert_eq!(clamp(0.0, 1.0, 0.5), 0.5);
        assert_eq!(clamp(0.0, 1.0, 2.0), 1.0);
        assert_eq!(clamp(0.0, 1.0, -2.0), 0.0);
        assert_eq!(clamp(0.0, 1.0, f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn remap_maps_ripple_domain_onto_scale_range() {
        let d = 0.217;
        assert!((remap((-d, d), (1.0 - d, 1.0 + d), 0.0) - 1.0).abs() < 1e-6);
        assert!((remap((-d, d), (1.0 - d, 1.0 + d), d) - (1.0 + d)).abs() < 1e-6);
        assert!((remap((-d, d), (1.0 - d, 1.0 + d), -d) - (1.0 - d)).abs() < 1e-6);
    }

    #[test]
    fn remap_degenerate_range() {
        assert_eq!(remap((1.0, 1.0), (4.0, 8.0), 3.0), 4.0);
    }

    #[test]
    fn snap_to_interval_rounds() {
        assert_eq!(snap_to_interval(10.0, 14.0), 10.0);
        assert_eq!(snap_to_interval(10.0, 15.0), 20.0);
        assert_eq!(snap_to_interval(0.0, 3.3), 3.3);
    }

    #[test]
    fn snap_to_points_examples() {
        let points = [0.0, 10.0, 20.0];
        assert_eq!(snap_to_points(&points, 3.0), Some((0.0, 0)));
        assert_eq!(snap_to_points(&points, 7.0), Some((10.0, 1)));
        assert_eq!(snap_to_points(&points, 20.0), Some((20.0, 2)));
        assert_eq!(snap_to_points(&points, 0.0), Some((0.0, 0)));
        assert_eq!(snap_to_points(&points, 99.0), Some((20.0, 2)));
    }

    #[test]
    fn snap_to_points_small_sets() {
        assert_eq!(snap_to_points(&[], 1.0), None);
        assert_eq!(snap_to_points(&[4.0], 100.0), Some((4.0, 0)));
    }

    #[test]
    fn move_item_preserves_other_elements() {
        assert_eq!(move_item(&['a', 'b', 'c'], 1, 1), vec!['a', 'b', 'c']);
        assert_eq!(move_item(&['a', 'b', 'c'], 2, 0), vec!['c', 'a', 'b']);
        assert_eq!(move_item(&['a', 'b', 'c'], 0, 99), vec!['b', 'c', 'a']);
        assert!(move_item::<u8>(&[], 0, 0).is_empty());
    }
}
