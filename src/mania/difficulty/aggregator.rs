/// Smoothed signals of a single corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CornerSignals {
    /// Same-column pressure.
    pub jack: f64,
    /// Cross-column pressure.
    pub cross: f64,
    /// Press intensity.
    pub press: f64,
    /// Unevenness factor.
    pub unevenness: f64,
    /// Release pressure.
    pub release: f64,
    /// Local note density.
    pub density: f64,
    /// Active key count.
    pub key_count: f64,
}

/// Aggregated difficulty of a single corner.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CornerStrain {
    pub s: f64,
    pub t: f64,
    pub d: f64,
}

pub struct DifficultyAggregator;

impl DifficultyAggregator {
    const W_0: f64 = 0.4;
    const W_1: f64 = 2.7;
    const P_1: f64 = 1.5;
    const W_2: f64 = 0.27;

    pub fn aggregate(signals: &CornerSignals) -> CornerStrain {
        let CornerSignals {
            jack,
            cross,
            press,
            unevenness,
            release,
            density,
            key_count,
        } = *signals;

        let key_scaling = unevenness.powf(3.0 / key_count);

        let term_1 = (key_scaling * jack.min(8.0 + 0.85 * jack)).powf(1.5);
        let term_2 =
            (unevenness.powf(2.0 / 3.0) * (0.8 * press + 35.0 * release / (density + 8.0))).powf(1.5);

        let s = (Self::W_0 * term_1 + (1.0 - Self::W_0) * term_2).powf(2.0 / 3.0);
        let t = key_scaling * cross / (cross + s + 1.0);
        let d = Self::W_1 * s.sqrt() * t.powf(Self::P_1) + Self::W_2 * s;

        CornerStrain { s, t, d }
    }
}
