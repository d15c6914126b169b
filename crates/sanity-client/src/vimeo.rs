//! Video hosting URL helpers

/// Player host
pub const PLAYER_HOST: &str = "https://player.vimeo.com/video";

/// Thumbnail proxy host
pub const THUMBNAIL_HOST: &str = "https://vumbnail.com";

/// Thumbnail image for a video id
pub fn thumbnail_url(vimeo_id: &str) -> String {
    format!("{}/{}.jpg", THUMBNAIL_HOST, vimeo_id)
}

/// Embed flags for the player iframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Start playing on load
    pub autoplay: bool,
    /// Start muted
    pub muted: bool,
    /// Show player controls
    pub controls: bool,
    /// Loop playback
    pub looping: bool,
}

impl PlayerOptions {
    /// Full-screen modal playback: autoplay with sound and controls
    pub fn modal() -> Self {
        Self {
            autoplay: true,
            muted: false,
            controls: true,
            looping: false,
        }
    }

    /// Homepage background: muted, looping, no chrome
    pub fn background() -> Self {
        Self {
            autoplay: true,
            muted: true,
            controls: false,
            looping: true,
        }
    }
}

/// Player embed URL. Title, byline and portrait overlays are always hidden and
/// do-not-track is always set.
pub fn player_url(vimeo_id: &str, options: PlayerOptions) -> String {
    let flag = |b: bool| if b { 1 } else { 0 };
    let mut url = format!(
        "{}/{}?autoplay={}&muted={}&title=0&byline=0&portrait=0&dnt=1",
        PLAYER_HOST,
        vimeo_id,
        flag(options.autoplay),
        flag(options.muted)
    );
    if !options.controls {
        url.push_str("&controls=0");
    }
    if options.looping {
        url.push_str("&loop=1&autopause=0");
    }
    url
}
