//! Snapping utilities (eg. snap to a grid).
//!
//! All functions operate on raw tick counts.

/// Snaps `pos` to the nearest multiple of `grid`.
///
/// Positions exactly halfway between two multiples snap toward positive infinity.
pub const fn snap_to_grid(pos: i64, grid: i64) -> i64 {
    assert!(grid > 0);

    let rem = pos.rem_euclid(grid);
    if rem < grid - rem {
        pos - rem
    } else {
        pos + grid - rem
    }
}

/// Snaps `pos` to the largest multiple of `grid` that is not greater than `pos`.
pub const fn floor_to_grid(pos: i64, grid: i64) -> i64 {
    assert!(grid > 0);
    pos - pos.rem_euclid(grid)
}

/// Snaps `pos` to the smallest multiple of `grid` that is not less than `pos`.
pub const fn ceil_to_grid(pos: i64, grid: i64) -> i64 {
    assert!(grid > 0);
    let rem = pos.rem_euclid(grid);
    if rem == 0 {
        pos
    } else {
        pos + grid - rem
    }
}
