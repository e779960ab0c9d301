pub trait FloatExt: Sized {
    const EPSILON: Self;

    /// `self == other`
    fn eq(self, other: Self) -> bool;

    /// Whether `self` and `other` are at most `acceptable_difference` apart.
    fn almost_eq(self, other: Self, acceptable_difference: Self) -> bool;
}

impl FloatExt for f64 {
    const EPSILON: Self = f64::EPSILON;

    fn eq(self, other: Self) -> bool {
        (self - other).abs() < Self::EPSILON
    }

    fn almost_eq(self, other: Self, acceptable_difference: Self) -> bool {
        (self - other).abs() <= acceptable_difference
    }
}
