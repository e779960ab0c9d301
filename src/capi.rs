use std::{
    ffi::{c_void, CStr},
    os::raw::c_char,
    panic::{catch_unwind, AssertUnwindSafe},
};

use crate::{
    model::error::BeatmapError, Difficulty, ManiaBeatmap, ManiaDifficultyAttributes,
    ManiaPerformance, ManiaPerformanceAttributes,
};

/// Error codes returned by the C API.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RosuManiaError {
    Ok = 0,
    NullPointer = 1,
    InvalidUtf8 = 2,
    IoError = 3,
    Panic = 4,
    NotMania = 5,
    InvalidBeatmap = 6,
}

impl From<BeatmapError> for RosuManiaError {
    fn from(err: BeatmapError) -> Self {
        match err {
            BeatmapError::Io(_) => Self::IoError,
            BeatmapError::NotMania { .. } => Self::NotMania,
            BeatmapError::InvalidKeyCount { .. }
            | BeatmapError::InvalidColumn { .. }
            | BeatmapError::InvalidLongNote { .. } => Self::InvalidBeatmap,
        }
    }
}

/// Scalar values of [`ManiaDifficultyAttributes`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct RosuManiaDifficultyAttributes {
    pub stars: f64,
    pub variety: f64,
    pub acc_scalar: f64,
    pub spikiness: f64,
    pub switches: f64,
    pub total_notes: f64,
    pub acc_skill: f64,
    pub fc_skill: f64,
    pub strain_stars: f64,
    pub n_objects: u32,
    pub n_hold_notes: u32,
    pub max_combo: u32,
    pub key_count: u32,
}

impl From<&ManiaDifficultyAttributes> for RosuManiaDifficultyAttributes {
    fn from(attrs: &ManiaDifficultyAttributes) -> Self {
        Self {
            stars: attrs.stars,
            variety: attrs.variety,
            acc_scalar: attrs.acc_scalar,
            spikiness: attrs.spikiness,
            switches: attrs.switches,
            total_notes: attrs.total_notes,
            acc_skill: attrs.acc_skill,
            fc_skill: attrs.fc_skill,
            strain_stars: attrs.strain_stars,
            n_objects: attrs.n_objects,
            n_hold_notes: attrs.n_hold_notes,
            max_combo: attrs.max_combo,
            key_count: attrs.key_count,
        }
    }
}

/// Result of a performance calculation.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct RosuManiaPerformanceAttributes {
    pub pp: f64,
    pub pp_difficulty: f64,
    pub stars: f64,
    pub max_combo: u32,
}

impl From<&ManiaPerformanceAttributes> for RosuManiaPerformanceAttributes {
    fn from(attrs: &ManiaPerformanceAttributes) -> Self {
        Self {
            pp: attrs.pp,
            pp_difficulty: attrs.pp_difficulty,
            stars: attrs.stars(),
            max_combo: attrs.max_combo(),
        }
    }
}

/// Run `f` and turn both errors and panics into error codes.
fn guard(f: impl FnOnce() -> Result<(), RosuManiaError>) -> RosuManiaError {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => RosuManiaError::Ok,
        Ok(Err(err)) => err,
        Err(_) => RosuManiaError::Panic,
    }
}

fn difficulty(mods: u32, clock_rate: f64, lazer: bool) -> Difficulty {
    let difficulty = Difficulty::new().mods(mods).lazer(lazer);

    if clock_rate > 0.0 {
        difficulty.clock_rate(clock_rate)
    } else {
        difficulty
    }
}

/// Convert an error code into a static, NUL-terminated string.
#[no_mangle]
pub extern "C" fn rosu_mania_error_str(err: i32) -> *const c_char {
    match err {
        x if x == RosuManiaError::Ok as i32 => b"Ok\0".as_ptr(),
        x if x == RosuManiaError::NullPointer as i32 => b"NullPointer\0".as_ptr(),
        x if x == RosuManiaError::InvalidUtf8 as i32 => b"InvalidUtf8\0".as_ptr(),
        x if x == RosuManiaError::IoError as i32 => b"IoError\0".as_ptr(),
        x if x == RosuManiaError::Panic as i32 => b"Panic\0".as_ptr(),
        x if x == RosuManiaError::NotMania as i32 => b"NotMania\0".as_ptr(),
        x if x == RosuManiaError::InvalidBeatmap as i32 => b"InvalidBeatmap\0".as_ptr(),
        _ => b"Unknown\0".as_ptr(),
    }
    .cast::<c_char>()
}

/// Parse a beatmap from a `.osu` file path.
///
/// # Safety
/// - `path` must be a valid, NUL-terminated UTF-8 string.
/// - `out` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_beatmap_from_path(
    path: *const c_char,
    out: *mut *mut c_void,
) -> RosuManiaError {
    if path.is_null() || out.is_null() {
        return RosuManiaError::NullPointer;
    }

    guard(|| {
        let path = CStr::from_ptr(path)
            .to_str()
            .map_err(|_| RosuManiaError::InvalidUtf8)?;

        let map = ManiaBeatmap::from_path(path)?;
        out.write(Box::into_raw(Box::new(map)).cast::<c_void>());

        Ok(())
    })
}

/// Parse a beatmap from an in-memory `.osu` file.
///
/// # Safety
/// - If `len != 0`, `bytes` must be valid for reads of `len` bytes.
/// - `out` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_beatmap_from_bytes(
    bytes: *const u8,
    len: usize,
    out: *mut *mut c_void,
) -> RosuManiaError {
    if out.is_null() || (bytes.is_null() && len != 0) {
        return RosuManiaError::NullPointer;
    }

    guard(|| {
        let bytes = if len == 0 {
            &[]
        } else {
            std::slice::from_raw_parts(bytes, len)
        };

        let map = ManiaBeatmap::from_bytes(bytes)?;
        out.write(Box::into_raw(Box::new(map)).cast::<c_void>());

        Ok(())
    })
}

/// Free a beatmap created through `rosu_mania_beatmap_from_*`.
///
/// # Safety
/// - `map` must either be `NULL` or a pointer returned by `rosu_mania_beatmap_from_*`.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_beatmap_free(map: *mut c_void) {
    if map.is_null() {
        return;
    }

    let _ = catch_unwind(AssertUnwindSafe(|| {
        drop(Box::from_raw(map.cast::<ManiaBeatmap>()));
    }));
}

/// Calculate difficulty attributes from a parsed beatmap.
///
/// `clock_rate <= 0.0` means "use the default clock rate based on mods".
///
/// # Safety
/// - `map` must be a valid pointer returned by `rosu_mania_beatmap_from_*`.
/// - `out` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_difficulty_calculate(
    map: *const c_void,
    mods: u32,
    clock_rate: f64,
    lazer: bool,
    out: *mut *mut c_void,
) -> RosuManiaError {
    if map.is_null() || out.is_null() {
        return RosuManiaError::NullPointer;
    }

    guard(|| {
        let map = &*map.cast::<ManiaBeatmap>();
        let attrs = difficulty(mods, clock_rate, lazer).calculate(map);
        out.write(Box::into_raw(Box::new(attrs)).cast::<c_void>());

        Ok(())
    })
}

/// Free difficulty attributes created through `rosu_mania_difficulty_calculate`.
///
/// # Safety
/// - `attrs` must either be `NULL` or a pointer returned by `rosu_mania_difficulty_calculate`.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_difficulty_attrs_free(attrs: *mut c_void) {
    if attrs.is_null() {
        return;
    }

    let _ = catch_unwind(AssertUnwindSafe(|| {
        drop(Box::from_raw(attrs.cast::<ManiaDifficultyAttributes>()));
    }));
}

/// Extract the scalar values of difficulty attributes.
///
/// # Safety
/// - `attrs` must be a valid pointer returned by `rosu_mania_difficulty_calculate`.
/// - `out` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_difficulty_attrs_values(
    attrs: *const c_void,
    out: *mut RosuManiaDifficultyAttributes,
) -> RosuManiaError {
    if attrs.is_null() || out.is_null() {
        return RosuManiaError::NullPointer;
    }

    guard(|| {
        let attrs = &*attrs.cast::<ManiaDifficultyAttributes>();
        out.write(RosuManiaDifficultyAttributes::from(attrs));

        Ok(())
    })
}

/// Copy up to `len` values of the accuracy curve into `out`.
///
/// The amount of copied values is written into `written`.
///
/// # Safety
/// - `attrs` must be a valid pointer returned by `rosu_mania_difficulty_calculate`.
/// - `out` must be valid for writes of `len` values.
/// - `written` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_difficulty_attrs_accuracy_curve(
    attrs: *const c_void,
    out: *mut f64,
    len: usize,
    written: *mut usize,
) -> RosuManiaError {
    if attrs.is_null() || out.is_null() || written.is_null() {
        return RosuManiaError::NullPointer;
    }

    guard(|| {
        let attrs = &*attrs.cast::<ManiaDifficultyAttributes>();
        let count = len.min(attrs.accuracy_curve.len());

        std::ptr::copy_nonoverlapping(attrs.accuracy_curve.as_ptr(), out, count);
        written.write(count);

        Ok(())
    })
}

/// Calculate performance attributes from previously calculated difficulty attributes.
///
/// `accuracy` is between `0.0` and `100.0`. `lazer` must match the value
/// used for the difficulty calculation.
///
/// # Safety
/// - `difficulty` must be a valid pointer returned by `rosu_mania_difficulty_calculate`.
/// - `out` must be a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn rosu_mania_performance_calculate(
    difficulty: *const c_void,
    mods: u32,
    lazer: bool,
    accuracy: f64,
    misses: u32,
    out: *mut RosuManiaPerformanceAttributes,
) -> RosuManiaError {
    if difficulty.is_null() || out.is_null() {
        return RosuManiaError::NullPointer;
    }

    guard(|| {
        let difficulty = (*difficulty.cast::<ManiaDifficultyAttributes>()).clone();

        let attrs = ManiaPerformance::new(difficulty)
            .mods(mods)
            .lazer(lazer)
            .accuracy(accuracy)
            .misses(misses)
            .calculate();

        out.write(RosuManiaPerformanceAttributes::from(&attrs));

        Ok(())
    })
}
