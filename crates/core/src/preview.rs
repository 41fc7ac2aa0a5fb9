//! Audio preview playback flag.
//!
//! The browser's media element does the actual playback; this only records
//! which single clip, if any, is currently flagged as playing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPlayer {
    playing: Option<String>,
}

impl PreviewPlayer {
    /// Play event for `url`. Playing the flagged clip again clears the flag.
    pub fn play(&mut self, url: &str) {
        if self.playing.as_deref() == Some(url) {
            self.playing = None;
        } else {
            self.playing = Some(url.to_string());
        }
    }

    /// Pause event.
    pub fn pause(&mut self) {
        self.playing = None;
    }

    /// Clip played to the end.
    pub fn ended(&mut self) {
        self.playing = None;
    }

    /// URL of the flagged clip.
    #[must_use]
    pub fn playing(&self) -> Option<&str> {
        self.playing.as_deref()
    }

    /// Whether `url` is the flagged clip.
    #[must_use]
    pub fn is_playing(&self, url: &str) -> bool {
        self.playing.as_deref() == Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_toggles_same_clip() {
        let mut player = PreviewPlayer::default();
        player.play("/a.wav");
        assert!(player.is_playing("/a.wav"));
        player.play("/a.wav");
        assert_eq!(player.playing(), None);
    }

    #[test]
    fn test_play_other_clip_switches() {
        let mut player = PreviewPlayer::default();
        player.play("/a.wav");
        player.play("/b.wav");
        assert!(!player.is_playing("/a.wav"));
        assert!(player.is_playing("/b.wav"));
    }

    #[test]
    fn test_pause_and_end_clear() {
        let mut player = PreviewPlayer::default();
        player.play("/a.wav");
        player.pause();
        assert_eq!(player.playing(), None);

        player.play("/a.wav");
        player.ended();
        assert_eq!(player.playing(), None);
    }
}
