/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for positions and velocities in the orbital plane
pub type Vector = bevy::math::DVec2;

/// `count` evenly spaced samples over the closed interval `[start, end]`.
///
/// A single sample yields `start`; zero samples yield an empty vector.
pub fn linspace(start: Scalar, end: Scalar, count: usize) -> Vec<Scalar> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as Scalar;
            (0..count)
                .map(|i| {
                    // Pin the final sample so the interval is closed exactly
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as Scalar
                    }
                })
                .collect()
        }
    }
}
