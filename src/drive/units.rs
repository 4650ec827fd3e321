// Unit conversions between wheel angles, encoder ticks and servo pulses

use std::f64::consts::TAU;

use crate::config::{SERVO_CENTER_US, SERVO_MAX_US, SERVO_MIN_US, SERVO_US_PER_DEG};

/// Convert a wheel angle (rad) to the nearest whole number of encoder ticks
///
/// Halfway values round away from zero.
pub fn radians_to_ticks(angle_rad: f64, ticks_per_revolution: u32) -> i64 {
    (angle_rad / TAU * ticks_per_revolution as f64).round() as i64
}

/// Convert encoder ticks back to a wheel angle (rad)
pub fn ticks_to_radians(ticks: i64, ticks_per_revolution: u32) -> f64 {
    ticks as f64 * TAU / ticks_per_revolution as f64
}

/// Convert a pan angle (rad) to a servo pulse width in microseconds
///
/// 0 rad maps to 1500us, +/-90 degrees to 2000/1000us. Anything beyond is
/// clamped so animation overshoot never reaches the servo.
pub fn rotation_to_microseconds(angle_rad: f64) -> f64 {
    let us = SERVO_CENTER_US + angle_rad.to_degrees() * SERVO_US_PER_DEG;
    us.clamp(SERVO_MIN_US, SERVO_MAX_US)
}
