//! Audio front for the simulation
//!
//! The host loads every clip in [`SoundClip::ALL`] before the first frame and
//! hands over an [`AudioSink`]. Without one, every call is a no-op.

/// Sound clip keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundClip {
    /// Background loop while playing
    Music,
    /// Ball leaves the paddle
    Launch,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits a window edge
    WallHit,
    /// Block destroyed
    BlockBreak,
    /// Ball fell off the bottom
    BallLost,
    Win,
    Lose,
}

impl SoundClip {
    pub const ALL: [SoundClip; 8] = [
        SoundClip::Music,
        SoundClip::Launch,
        SoundClip::PaddleHit,
        SoundClip::WallHit,
        SoundClip::BlockBreak,
        SoundClip::BallLost,
        SoundClip::Win,
        SoundClip::Lose,
    ];

    /// Key the host loads the clip under
    pub fn key(&self) -> &'static str {
        match self {
            SoundClip::Music => "music",
            SoundClip::Launch => "launch",
            SoundClip::PaddleHit => "paddle",
            SoundClip::WallHit => "wall",
            SoundClip::BlockBreak => "break",
            SoundClip::BallLost => "lost",
            SoundClip::Win => "win",
            SoundClip::Lose => "lose",
        }
    }

    pub fn group(&self) -> AudioGroup {
        match self {
            SoundClip::Music => AudioGroup::Music,
            _ => AudioGroup::Effects,
        }
    }
}

/// Mixer group a clip plays in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioGroup {
    Effects,
    Music,
}

/// Seconds the music fades out over when a run ends
pub const MUSIC_FADE_SECONDS: f32 = 1.0;

/// Playback capability provided by the host. Calls are fire-and-forget.
pub trait AudioSink {
    fn play(&mut self, clip: SoundClip, group: AudioGroup, looped: bool);
    fn stop(&mut self, clip: SoundClip, group: AudioGroup, fade_seconds: f32);
}

/// Audio manager for the game
pub struct Audio {
    sink: Option<Box<dyn AudioSink>>,
    muted: bool,
}

impl Default for Audio {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Audio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Audio")
            .field("enabled", &self.is_enabled())
            .field("muted", &self.muted)
            .finish()
    }
}

impl Audio {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            muted: false,
        }
    }

    /// No audio subsystem - gameplay continues silently
    pub fn disabled() -> Self {
        log::warn!("No audio sink available - audio disabled");
        Self {
            sink: None,
            muted: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Play a clip; music loops
    pub fn play(&mut self, clip: SoundClip) {
        if self.muted {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        sink.play(clip, clip.group(), clip == SoundClip::Music);
    }

    pub fn stop(&mut self, clip: SoundClip, fade_seconds: f32) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        sink.stop(clip, clip.group(), fade_seconds);
    }

    pub fn stop_music(&mut self) {
        self.stop(SoundClip::Music, MUSIC_FADE_SECONDS);
    }
}
