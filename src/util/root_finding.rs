/// Outcome of a root search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RootResult {
    Converged(f64),
    /// The iteration budget ran out; holds the midpoint of the last bracket.
    Unconverged(f64),
}

impl RootResult {
    pub const fn value(self) -> f64 {
        match self {
            Self::Converged(x) | Self::Unconverged(x) => x,
        }
    }

    pub const fn is_converged(self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

pub struct RootFinding;

impl RootFinding {
    const MAX_ITERATIONS: usize = 100;
    const MAX_EXPANSIONS: usize = 64;
    const EXPANSION_FACTOR: f64 = 2.0;

    /// Finds a root of `f` in `[lower, upper]` or beyond.
    ///
    /// `f` is assumed monotone. If `f(lower)` and `f(upper)` share a sign,
    /// the upper bound is pushed away geometrically from `lower` until the
    /// sign changes.
    pub fn find_root_expand<F>(mut f: F, lower: f64, upper: f64, accuracy: f64) -> RootResult
    where
        F: FnMut(f64) -> f64,
    {
        let mut a = lower;
        let mut fa = f(a);

        if fa == 0.0 {
            return RootResult::Converged(a);
        }

        let mut b = if upper > lower { upper } else { lower + 1.0 };
        let mut fb = f(b);
        let mut expansions = 0;

        while fa * fb > 0.0 {
            if expansions == Self::MAX_EXPANSIONS || !fb.is_finite() {
                log::warn!(
                    "no sign change of root function in [{lower}, {b}] after {expansions} expansions"
                );

                return RootResult::Unconverged(b);
            }

            // The old upper bound becomes the tightest known lower bound.
            a = b;
            fa = fb;
            b = lower + (b - lower) * Self::EXPANSION_FACTOR;
            fb = f(b);
            expansions += 1;
        }

        log::trace!("bracketed root in [{a}, {b}] after {expansions} expansions");

        Self::find_root_brent(f, (a, fa), (b, fb), accuracy)
    }

    /// Brent's method on a bracket whose endpoints have opposite signs.
    fn find_root_brent<F>(
        mut f: F,
        (mut a, mut fa): (f64, f64),
        (mut b, mut fb): (f64, f64),
        accuracy: f64,
    ) -> RootResult
    where
        F: FnMut(f64) -> f64,
    {
        if fb == 0.0 {
            return RootResult::Converged(b);
        }

        let mut c = b;
        let mut fc = fb;
        let mut d = 0.0;
        let mut e = 0.0;

        for iteration in 0..Self::MAX_ITERATIONS {
            if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }

            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * accuracy;
            let xm = 0.5 * (c - b);

            if xm.abs() <= tol || fb == 0.0 {
                log::trace!("brent converged after {iteration} iterations at {b}");

                return RootResult::Converged(b);
            }

            if e.abs() >= tol && fa.abs() > fb.abs() {
                // Inverse quadratic interpolation, or secant if only two points
                let s = fb / fa;

                let (mut p, mut q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;

                    (
                        s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };

                if p > 0.0 {
                    q = -q;
                }

                p = p.abs();

                let min1 = 3.0 * xm * q - (tol * q).abs();
                let min2 = (e * q).abs();

                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;

            b += if d.abs() > tol { d } else { tol.copysign(xm) };
            fb = f(b);
        }

        let best = 0.5 * (b + c);

        log::warn!(
            "root finder did not converge within {} iterations, using bracket midpoint {best}",
            Self::MAX_ITERATIONS
        );

        RootResult::Unconverged(best)
    }
}
