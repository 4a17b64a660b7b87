use crate::constants::EPSILON;

/// A quadratic equation `a·x² + b·x + c = 0`, classified on construction.
///
/// Near-zero `a` degrades to the linear equation `b·x + c = 0`; near-zero
/// `a` and `b` together has no roots.
#[derive(Debug, Clone, Copy)]
pub struct Quadratic {
    a: f64,
    b: f64,
    c: f64,
    delta: f64,
    num_roots: usize,
    is_quadratic: bool,
}

impl Quadratic {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        let delta = b * b - 4.0 * a * c;
        let (is_quadratic, num_roots) = if a.abs() < EPSILON {
            (false, if b.abs() < EPSILON { 0 } else { 1 })
        } else if delta > EPSILON {
            (true, 2)
        } else if delta < -EPSILON {
            (true, 0)
        } else {
            (true, 1)
        };

        Self {
            a,
            b,
            c,
            delta,
            num_roots,
            is_quadratic,
        }
    }

    /// False when the equation degraded to a linear (or constant) one.
    #[inline]
    pub fn is_quadratic(&self) -> bool {
        self.is_quadratic
    }

    /// Number of distinct real roots: 0, 1 or 2.
    #[inline]
    pub fn num_roots(&self) -> usize {
        self.num_roots
    }

    /// Roots as `(smaller, larger)`.
    ///
    /// - two roots: ascending
    /// - double root: the same value twice
    /// - linear: `(root, NaN)`
    /// - no real roots: `(NaN, NaN)`
    pub fn roots(&self) -> (f64, f64) {
        match (self.is_quadratic, self.num_roots) {
            (false, 1) => (-self.c / self.b, f64::NAN),
            (true, 2) => {
                let sq = self.delta.sqrt();
                let r1 = (-self.b - sq) / (2.0 * self.a);
                let r2 = (-self.b + sq) / (2.0 * self.a);
                (r1.min(r2), r1.max(r2))
            }
            (true, 1) => {
                let r = -self.b / (2.0 * self.a);
                (r, r)
            }
            _ => (f64::NAN, f64::NAN),
        }
    }

    /// Distinct real roots in ascending order.
    pub fn real_roots(&self) -> impl Iterator<Item = f64> {
        let (r1, r2) = self.roots();
        let second = (self.num_roots == 2).then_some(r2);
        std::iter::once(r1)
            .filter(|r| !r.is_nan())
            .chain(second)
    }
}
