use rosu_mods::GameModsLegacy;

/// The mods that affect osu!mania difficulty.
///
/// Created from legacy bits, e.g. a `u32` or [`GameModsLegacy`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GameMods {
    bits: u32,
}

impl GameMods {
    const NO_FAIL: u32 = 1 << 0;
    const EASY: u32 = 1 << 1;
    const HARD_ROCK: u32 = 1 << 4;
    const DOUBLE_TIME: u32 = 1 << 6;
    const HALF_TIME: u32 = 1 << 8;
    const NIGHTCORE: u32 = 1 << 9;

    /// No mods.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub const fn nf(self) -> bool {
        self.bits & Self::NO_FAIL != 0
    }

    pub const fn ez(self) -> bool {
        self.bits & Self::EASY != 0
    }

    pub const fn hr(self) -> bool {
        self.bits & Self::HARD_ROCK != 0
    }

    pub const fn dt(self) -> bool {
        self.bits & (Self::DOUBLE_TIME | Self::NIGHTCORE) != 0
    }

    pub const fn ht(self) -> bool {
        self.bits & Self::HALF_TIME != 0
    }

    /// The clock rate implied by the mods.
    pub const fn clock_rate(self) -> f64 {
        if self.dt() {
            1.5
        } else if self.ht() {
            0.75
        } else {
            1.0
        }
    }
}

impl From<u32> for GameMods {
    fn from(bits: u32) -> Self {
        Self { bits }
    }
}

impl From<GameModsLegacy> for GameMods {
    fn from(mods: GameModsLegacy) -> Self {
        Self { bits: mods.bits() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_from_bits() {
        let mods = GameMods::from(2 + 64);

        assert!(mods.ez());
        assert!(mods.dt());
        assert!(!mods.hr());
        assert!((mods.clock_rate() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn nightcore_counts_as_double_time() {
        assert!((GameMods::from(512).clock_rate() - 1.5).abs() < f64::EPSILON);
        assert!((GameMods::from(256).clock_rate() - 0.75).abs() < f64::EPSILON);
        assert!((GameMods::default().clock_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn from_legacy() {
        let mods = GameMods::from(GameModsLegacy::HardRock | GameModsLegacy::NoFail);

        assert!(mods.hr());
        assert!(mods.nf());
    }
}
