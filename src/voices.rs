use std::sync::{Arc, Mutex};

use crate::tone::{ToneStage, ToneState};

/// Time for a voice to fade in after start or out after stop.
const DECLICK_SECONDS: f32 = 0.005;

pub struct OscillatorVoice {
    state: Arc<Mutex<ToneState>>,
    phase: f32,
    gain: f32,
    retired: bool,
    finished: bool,
}

impl OscillatorVoice {
    fn new(state: Arc<Mutex<ToneState>>) -> Self {
        Self {
            state,
            phase: 0.0,
            gain: 0.0,
            retired: false,
            finished: false,
        }
    }

    /// `hold` keeps the gain down while an earlier voice is still sounding.
    fn sample(&mut self, sample_rate: f32, hold: bool) -> f32 {
        let snapshot = self.state.lock().ok().map(|guard| {
            (
                guard.frequency,
                guard.waveform,
                guard.is_audible(),
                guard.stage == ToneStage::Stopped,
            )
        });
        let Some((frequency, waveform, audible, stopped)) = snapshot else {
            self.finished = true;
            return 0.0;
        };

        let ramp = 1.0 / (DECLICK_SECONDS * sample_rate).max(1.0);
        let target = if audible && !self.retired && !hold {
            1.0
        } else {
            0.0
        };
        if self.gain < target {
            self.gain = (self.gain + ramp).min(target);
        } else if self.gain > target {
            self.gain = (self.gain - ramp).max(target);
        }
        if (stopped || self.retired) && self.gain <= 0.0 {
            self.finished = true;
        }

        let phase_delta = frequency / sample_rate;
        self.phase = (self.phase + phase_delta).fract();
        waveform.sample(self.phase) * self.gain
    }
}

/// Every tone connected to the output. Only the newest voice may sound:
/// connecting a tone retires the earlier ones, and it stays silent until they
/// have faded out. Retired and stopped voices are dropped once silent.
#[derive(Default)]
pub struct VoiceBank {
    voices: Vec<OscillatorVoice>,
}

impl VoiceBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, state: Arc<Mutex<ToneState>>) {
        for voice in &mut self.voices {
            voice.retired = true;
        }
        self.voices.push(OscillatorVoice::new(state));
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let mut sounding = false;
        let mut mixed = 0.0;
        for voice in &mut self.voices {
            mixed += voice.sample(sample_rate, sounding);
            sounding |= voice.gain > 0.0;
        }
        self.voices.retain(|voice| !voice.finished);
        mixed
    }
}
