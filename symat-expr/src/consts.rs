//! The scalar type used throughout the tree, and the tolerance used to recognize the identities
//! `0`, `1` and `-1` that trigger algebraic shortcuts.

/// The scalar stored in constants, and in the quantity and exponent of variables.
pub type Value = f64;

/// The single-precision machine epsilon.
///
/// Values closer than this to `0`, `1` or `-1` are treated as exactly that value when deciding
/// whether an algebraic shortcut applies (`x * 1 = x`, `x + 0 = x`, and so on).
pub const EPSILON: Value = f32::EPSILON as Value;

/// Returns true if `a` and `b` differ by less than [`EPSILON`].
pub fn approx_eq(a: Value, b: Value) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if the value is within [`EPSILON`] of zero.
pub fn approx_zero(value: Value) -> bool {
    approx_eq(value, 0.0)
}

pub fn approx_one(value: Value) -> bool {
    approx_eq(value, 1.0)
}

pub fn approx_minus_one(value: Value) -> bool {
    approx_eq(value, -1.0)
}
