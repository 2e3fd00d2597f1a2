pub const DEFAULT_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("playback rejected: {reason}")]
pub struct PlaybackRejected {
    pub reason: String,
}

impl PlaybackRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Something that can play the background track.
pub trait AudioOutput {
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
}

/// Output with no device behind it; it accepts every request.
#[derive(Debug, Clone, Default)]
pub struct NullOutput {
    volume: f32,
    playing: bool,
}

impl NullOutput {
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AudioOutput for NullOutput {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioIcon {
    VolumeUp,
    VolumeMute,
}

impl AudioIcon {
    pub fn class(self) -> &'static str {
        match self {
            AudioIcon::VolumeUp => "fa-volume-up",
            AudioIcon::VolumeMute => "fa-volume-mute",
        }
    }
}

#[derive(Debug)]
pub struct AudioControl<O> {
    output: O,
    playing: bool,
    autoplay_attempted: bool,
}

impl<O: AudioOutput> AudioControl<O> {
    pub fn new(mut output: O) -> Self {
        output.set_volume(DEFAULT_VOLUME);
        Self {
            output,
            playing: false,
            autoplay_attempted: false,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn icon(&self) -> AudioIcon {
        if self.playing {
            AudioIcon::VolumeUp
        } else {
            AudioIcon::VolumeMute
        }
    }

    /// Plays when paused and pauses when playing; returns the new icon.
    pub fn toggle(&mut self) -> AudioIcon {
        if self.playing {
            self.output.pause();
            self.playing = false;
        } else {
            self.start();
        }
        self.icon()
    }

    /// Tries to start playback on the first user interaction only. Returns
    /// whether an attempt was made.
    pub fn first_interaction(&mut self) -> bool {
        if self.autoplay_attempted {
            return false;
        }
        self.autoplay_attempted = true;
        if !self.playing {
            self.start();
        }
        true
    }

    fn start(&mut self) {
        match self.output.play() {
            Ok(()) => self.playing = true,
            Err(err) => {
                tracing::warn!(%err, "background audio stays muted");
                self.playing = false;
            }
        }
    }
}
