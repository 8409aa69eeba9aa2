use glam::Vec3;

/// Unity-style forward axis used when a body has no usable direction.
pub const FORWARD: Vec3 = Vec3::Z;

/// Cap the magnitude of `v` at `max_magnitude`, preserving direction.
/// Vectors already under the ceiling come back untouched, and a zero vector
/// stays zero.
pub fn clamp_magnitude(v: Vec3, max_magnitude: f32) -> Vec3 {
    if max_magnitude <= 0.0 {
        return Vec3::ZERO;
    }

    let mag_sq = v.length_squared();
    if mag_sq <= max_magnitude * max_magnitude {
        return v;
    }

    match direction_of(v) {
        Some(direction) => direction * max_magnitude,
        None => Vec3::ZERO,
    }
}

// Unit vector along `v`, scaled down first so huge components cannot overflow
// and tiny ones cannot underflow. `None` for a zero or non-finite vector.
fn direction_of(v: Vec3) -> Option<Vec3> {
    if !v.is_finite() {
        return None;
    }
    let largest = v.abs().max_element();
    if largest == 0.0 {
        return None;
    }
    (v / largest).try_normalize()
}

/// Rescale `velocity` so its speed lies in `[min_speed, max_speed]`.
///
/// Only a zero (or non-finite) velocity loses its direction; it is rebuilt
/// from `fallback_heading`, or [`FORWARD`] when that is degenerate as well.
pub fn clamp_speed(velocity: Vec3, min_speed: f32, max_speed: f32, fallback_heading: Vec3) -> Vec3 {
    let Some(direction) = direction_of(velocity) else {
        let heading = fallback_heading.try_normalize().unwrap_or(FORWARD);
        return heading * min_speed;
    };

    // May be 0 or inf when the components under- or overflow when squared
    let speed = velocity.length();
    if speed < min_speed {
        direction * min_speed
    } else if speed > max_speed {
        direction * max_speed
    } else {
        velocity
    }
}
