//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value between a minimum and a maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        // Identity map
        assert_eq!(lin_map((0f64, 1f64), (0f64, 1f64), 0.5), 0.5);

        // Offset and scale
        assert_eq!(lin_map((0f64, 255f64), (30f64, 255f64), 0.0), 30.0);
        assert_eq!(lin_map((0f64, 255f64), (30f64, 255f64), 255.0), 255.0);

        // Inverted target range
        assert_eq!(lin_map((0f64, 10f64), (10f64, 0f64), 2.5), 7.5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&1.5f64, &0f64, &1f64), 1.0);
        assert_eq!(clamp(&-0.5f64, &0f64, &1f64), 0.0);
        assert_eq!(clamp(&0.5f64, &0f64, &1f64), 0.5);
    }
}
