//! Deterministic fixed-point math shared by the resolver and its consumers.
//!
//! All positions are fixed-point integers, so there is no hardware float
//! involved anywhere on the movement path: the same inputs produce the same
//! results on every architecture. Trigonometry uses binary angles (a
//! power-of-two circle subdivision) with Q16 sine/cosine values, and square
//! roots use a constant-iteration Newton-Raphson loop.

use glam::IVec2;

/// Subdivisions of a full turn. All facing values and turn rates are
/// expressed in these units and wrap with [`ANGLE_MASK`].
pub const ANGLE_STEPS: i32 = 2048;

/// Bitmask that wraps an angle into `[0, ANGLE_STEPS)`.
pub const ANGLE_MASK: i32 = ANGLE_STEPS - 1;

/// Half a turn (180 degrees).
pub const HALF_TURN: i32 = ANGLE_STEPS / 2;

/// A quarter turn (90 degrees).
pub const QUARTER_TURN: i32 = ANGLE_STEPS / 4;

/// Fixed-point scale of [`sin_bam`]/[`cos_bam`] results.
pub const TRIG_SHIFT: u32 = 16;

/// `1.0` in trig fixed-point.
pub const TRIG_UNIT: i32 = 1 << TRIG_SHIFT;

/// Newton-Raphson rounds in [`isqrt`]. Enough for full `u64` range; kept
/// constant so every call costs the same.
const ISQRT_ROUNDS: u32 = 8;

/// 2D cross product with 64-bit intermediates.
///
/// Sign convention: positive when `b` lies to the left of `a`.
#[inline]
pub fn cross2(a: IVec2, b: IVec2) -> i64 {
    a.x as i64 * b.y as i64 - a.y as i64 * b.x as i64
}

/// 2D dot product with 64-bit intermediates.
#[inline]
pub fn dot2(a: IVec2, b: IVec2) -> i64 {
    a.x as i64 * b.x as i64 + a.y as i64 * b.y as i64
}

/// Scale a base-unit vector into a mover's fine units.
#[inline]
pub fn scale_up(v: IVec2, shift: u8) -> IVec2 {
    IVec2::new(v.x << shift, v.y << shift)
}

/// Re-express a fixed-point value from one precision shift in another.
#[inline]
pub fn rescale(value: i32, from: u8, to: u8) -> i64 {
    if to >= from {
        (value as i64) << (to - from)
    } else {
        (value as i64) >> (from - to)
    }
}

/// Integer square root via Newton-Raphson with a constant iteration count.
///
/// The initial guess comes from the bit length of the input, which puts it
/// within a factor of two of the true root, so the fixed number of rounds
/// converges for the whole `u64` range.
pub fn isqrt(value: u64) -> u32 {
    if value == 0 {
        return 0;
    }
    let bits = 64 - value.leading_zeros();
    let mut guess = 1u64 << ((bits + 1) / 2);
    for _ in 0..ISQRT_ROUNDS {
        guess = (guess + value / guess) >> 1;
    }
    // Integer Newton lands on floor(sqrt) or one above it.
    if guess.checked_mul(guess).map_or(true, |sq| sq > value) {
        guess -= 1;
    }
    guess as u32
}

/// Planar distance between two fine-unit points.
#[inline]
pub fn dist2(a: IVec2, b: IVec2) -> i64 {
    let d = b - a;
    isqrt((d.x as i64 * d.x as i64 + d.y as i64 * d.y as i64) as u64) as i64
}

/// Squared planar distance between two fine-unit points.
#[inline]
pub fn dist2_sq(a: IVec2, b: IVec2) -> i64 {
    let d = b - a;
    d.x as i64 * d.x as i64 + d.y as i64 * d.y as i64
}

/// Sine of a binary angle, in Q16.
///
/// Bhaskara I's approximation over a half turn:
/// `sin(x) ~= 16x(H-x) / (5H^2 - 4x(H-x))`, exact at 0, H/2 and H.
pub fn sin_bam(angle: i32) -> i32 {
    let a = angle & ANGLE_MASK;
    let (x, sign) = if a >= HALF_TURN {
        ((a - HALF_TURN) as i64, -1)
    } else {
        (a as i64, 1)
    };
    let h = HALF_TURN as i64;
    let num = 16 * x * (h - x) * TRIG_UNIT as i64;
    let den = 5 * h * h - 4 * x * (h - x);
    sign * (num / den) as i32
}

/// Cosine of a binary angle, in Q16.
#[inline]
pub fn cos_bam(angle: i32) -> i32 {
    sin_bam(angle + QUARTER_TURN)
}

/// Arctangent of `y/x` as a binary angle in `[0, ANGLE_STEPS)`.
///
/// Octant reduction plus a small polynomial on the Q16 ratio of the shorter
/// leg over the longer one. Worst-case error is about one angle unit.
pub fn atan2_bam(y: i32, x: i32) -> i32 {
    if x == 0 && y == 0 {
        return 0;
    }
    let ax = (x as i64).abs();
    let ay = (y as i64).abs();
    let steep = ay > ax;
    let (num, den) = if steep { (ax, ay) } else { (ay, ax) };
    let z = (num << TRIG_SHIFT) / den; // Q16 ratio in [0, 1]

    // atan(z) in angle units: linear term plus a z(1-z) correction.
    let correction = ((z * ((TRIG_UNIT as i64) - z)) >> TRIG_SHIFT)
        * (80 + ((22 * z) >> TRIG_SHIFT));
    let mut a = ((z * (QUARTER_TURN / 2) as i64 + correction) >> TRIG_SHIFT) as i32;

    if steep {
        a = QUARTER_TURN - a;
    }
    if x < 0 {
        a = HALF_TURN - a;
    }
    if y < 0 {
        a = -a;
    }
    a & ANGLE_MASK
}

/// Shortest signed rotation from `from` to `to`, in `[-HALF_TURN, HALF_TURN)`.
#[inline]
pub fn angle_diff(from: i32, to: i32) -> i32 {
    ((to - from + HALF_TURN) & ANGLE_MASK) - HALF_TURN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isqrt_exact_squares() {
        for v in [0u64, 1, 4, 9, 144, 65536, 1 << 40] {
            let r = isqrt(v) as u64;
            assert_eq!(r * r, v, "sqrt({v})");
        }
    }

    #[test]
    fn isqrt_floors_between_squares() {
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(10_000_001), 3162);
    }

    #[test]
    fn isqrt_full_range() {
        let r = isqrt(u64::MAX) as u64;
        assert_eq!(r, u32::MAX as u64);
    }

    #[test]
    fn sin_cos_key_angles() {
        assert_eq!(sin_bam(0), 0);
        assert_eq!(sin_bam(QUARTER_TURN), TRIG_UNIT);
        assert_eq!(sin_bam(HALF_TURN), 0);
        assert_eq!(sin_bam(HALF_TURN + QUARTER_TURN), -TRIG_UNIT);
        assert_eq!(cos_bam(0), TRIG_UNIT);
        assert_eq!(cos_bam(HALF_TURN), -TRIG_UNIT);
    }

    #[test]
    fn sin_45_close() {
        // sin(45 degrees) = 0.7071 -> 46341 in Q16; Bhaskara is good to ~0.2%.
        let s = sin_bam(QUARTER_TURN / 2);
        assert!((s - 46341).abs() < 150, "got {s}");
    }

    #[test]
    fn atan2_octants() {
        assert_eq!(atan2_bam(0, 100), 0);
        assert_eq!(atan2_bam(100, 0), QUARTER_TURN);
        assert_eq!(atan2_bam(0, -100), HALF_TURN);
        assert_eq!(atan2_bam(-100, 0), HALF_TURN + QUARTER_TURN);

        let diag = atan2_bam(100, 100);
        assert!((diag - QUARTER_TURN / 2).abs() <= 2, "got {diag}");
        let diag = atan2_bam(100, -100);
        assert!((diag - (HALF_TURN - QUARTER_TURN / 2)).abs() <= 2, "got {diag}");
    }

    #[test]
    fn atan2_matches_float_reference() {
        for i in 0..64 {
            let a = (i * ANGLE_STEPS) / 64;
            let rad = a as f64 * std::f64::consts::TAU / ANGLE_STEPS as f64;
            let (y, x) = ((rad.sin() * 1000.0) as i32, (rad.cos() * 1000.0) as i32);
            let got = atan2_bam(y, x);
            let err = angle_diff(a, got).abs();
            assert!(err <= 3, "angle {a}: got {got} (err {err})");
        }
    }

    #[test]
    fn angle_diff_wraps() {
        assert_eq!(angle_diff(0, 10), 10);
        assert_eq!(angle_diff(10, 0), -10);
        assert_eq!(angle_diff(ANGLE_STEPS - 10, 10), 20);
        assert_eq!(angle_diff(10, ANGLE_STEPS - 10), -20);
        assert_eq!(angle_diff(0, HALF_TURN), -HALF_TURN);
    }

    #[test]
    fn cross_sign_convention() {
        // +X cross +Y is positive: left of the direction.
        assert!(cross2(IVec2::new(10, 0), IVec2::new(0, 10)) > 0);
        assert!(cross2(IVec2::new(10, 0), IVec2::new(0, -10)) < 0);
        assert_eq!(cross2(IVec2::new(10, 0), IVec2::new(5, 0)), 0);
    }

    #[test]
    fn rescale_round_trips_upward() {
        assert_eq!(rescale(100, 0, 3), 800);
        assert_eq!(rescale(800, 3, 0), 100);
        assert_eq!(rescale(-64, 0, 2), -256);
    }

    #[test]
    fn repeat_runs_are_identical() {
        let run = || {
            (0..200)
                .map(|i| {
                    let a = i * 11;
                    (sin_bam(a), cos_bam(a), atan2_bam(i * 7 - 300, 400 - i))
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
