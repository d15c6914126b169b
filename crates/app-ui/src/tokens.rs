//! Design tokens for the gallery views
//!
//! Motion timings for the modal viewer and the thumbnail grid geometry.

use std::time::Duration;

// =============================================================================
// Animation Tokens
// =============================================================================

/// Animation duration tokens (in milliseconds)
pub mod duration {
    /// Moderate (200ms), modal exit before unmount
    pub const MODERATE: u32 = 200;
    /// Slow (300ms), modal enter after mount
    pub const SLOW: u32 = 300;

    /// Convert a token to a [`std::time::Duration`]
    pub fn as_duration(ms: u32) -> super::Duration {
        super::Duration::from_millis(u64::from(ms))
    }
}

// =============================================================================
// Thumbnail Tokens
// =============================================================================

/// Grid thumbnail size requested from the image CDN (in pixels)
pub mod thumbnail {
    /// Thumbnail width
    pub const WIDTH: u32 = 600;
    /// Thumbnail height
    pub const HEIGHT: u32 = 400;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_values() {
        assert_eq!(duration::MODERATE, 200);
        assert_eq!(duration::SLOW, 300);
        assert_eq!(duration::as_duration(duration::SLOW), Duration::from_millis(300));
    }

    #[test]
    fn test_thumbnail_ratio() {
        assert_eq!(thumbnail::WIDTH * 2, thumbnail::HEIGHT * 3);
    }
}
