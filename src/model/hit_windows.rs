use crate::{model::mods::GameMods, util::difficulty::difficulty_range};

/// Hit windows of osu!mania in milliseconds, tightest to loosest.
///
/// A hit outside of `meh` is a miss.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HitWindows {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    pub ok: f64,
    pub meh: f64,
}

impl HitWindows {
    const HARD_ROCK_DIVISOR: f64 = 1.4;
    const EASY_MULTIPLIER: f64 = 1.4;

    /// Hit windows at rate 1.0 after applying HardRock or Easy.
    pub fn new(od: f64, mods: GameMods, is_classic: bool) -> Self {
        let windows = if is_classic {
            // stable truncates the OD-scaled windows to integer ms
            let window = |base: f64| (base - 3.0 * od).floor() + 0.5;

            Self {
                perfect: 16.5,
                great: window(64.0),
                good: window(97.0),
                ok: window(127.0),
                meh: window(151.0),
            }
        } else {
            Self {
                perfect: difficulty_range(od, 22.4, 19.4, 13.9),
                great: difficulty_range(od, 64.0, 49.0, 34.0),
                good: difficulty_range(od, 97.0, 82.0, 67.0),
                ok: difficulty_range(od, 127.0, 112.0, 97.0),
                meh: difficulty_range(od, 151.0, 136.0, 121.0),
            }
        };

        if mods.hr() {
            windows.scale(Self::HARD_ROCK_DIVISOR.recip())
        } else if mods.ez() {
            windows.scale(Self::EASY_MULTIPLIER)
        } else {
            windows
        }
    }

    /// Convert the windows into real time for the given clock rate.
    pub fn with_clock_rate(self, clock_rate: f64) -> Self {
        self.scale(clock_rate.recip())
    }

    /// Scale every window by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            perfect: self.perfect * factor,
            great: self.great * factor,
            good: self.good * factor,
            ok: self.ok * factor,
            meh: self.meh * factor,
        }
    }

    pub const fn as_array(&self) -> [f64; 5] {
        [self.perfect, self.great, self.good, self.ok, self.meh]
    }

    /// Timing leniency in seconds used by the corner pipeline.
    ///
    /// Derived from the great window and capped for very lenient windows.
    pub fn leniency(&self) -> f64 {
        let x = 0.3 * (self.great.max(0.0) / 500.0).sqrt();

        x.min(0.6 * (x - 0.09) + 0.09)
    }
}
