pub mod beatmap;
pub mod error;
pub mod hit_object;
pub mod hit_windows;
pub mod mods;
