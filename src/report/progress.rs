//! Ten-segment progress bar.

/// Number of segments in a bar
pub const PROGRESS_SEGMENTS: u8 = 10;
/// Transferred share
pub const FILLED_SEGMENT: &str = "⬜️";
/// Remaining share
pub const EMPTY_SEGMENT: &str = "⬛️";

/// `floor(downloaded / total * 10)`, clamped to `0..=10`; 0 when `total` is 0.
pub fn progress_segments(downloaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = u128::from(downloaded.min(total));
    let filled = done * u128::from(PROGRESS_SEGMENTS) / u128::from(total);
    // done <= total, so filled <= PROGRESS_SEGMENTS
    u8::try_from(filled).unwrap_or(PROGRESS_SEGMENTS)
}

/// Bar with [`progress_segments`] filled segments
pub fn progress_bar(downloaded: u64, total: u64) -> String {
    let filled = usize::from(progress_segments(downloaded, total));
    let empty = usize::from(PROGRESS_SEGMENTS) - filled;
    format!("{}{}", FILLED_SEGMENT.repeat(filled), EMPTY_SEGMENT.repeat(empty))
}
