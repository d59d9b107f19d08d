//! Range mapping helpers used by the peer to turn positions into LED
//! parameters.

/// Linear → linear.
///
/// With `clamp`, inputs outside `[in_min, in_max]` map to the nearest end
/// of the output range.
pub fn linlin(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32, clamp: bool) -> f32 {
    if clamp {
        if value <= in_min {
            return out_min;
        }
        if value >= in_max {
            return out_max;
        }
    }
    out_min + ((value - in_min) / (in_max - in_min)) * (out_max - out_min)
}

/// Linear → exponential. `out_min` and `out_max` must share a sign and be
/// non-zero.
pub fn linexp(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32, clamp: bool) -> f32 {
    if clamp {
        if value <= in_min {
            return out_min;
        }
        if value >= in_max {
            return out_max;
        }
    }
    (out_max / out_min).powf((value - in_min) / (in_max - in_min)) * out_min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linlin_reversed_output() {
        assert!((linlin(0.25, 0.0, 1.0, 1.0, 0.0, true) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_linexp_midpoint_is_geometric_mean() {
        assert!((linexp(0.5, 0.0, 1.0, 1.0, 100.0, true) - 10.0).abs() < 1e-4);
    }
}
