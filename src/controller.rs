use log::debug;

use crate::{
    mapping::FrequencyRange,
    scheduler::{FrameScheduler, FrameToken},
    tone::{OscillatorProvider, Tone},
};

pub const DEFAULT_LINEAR_STEP_HZ: f32 = 10.0;
pub const DEFAULT_EXPONENTIAL_FACTOR: f32 = 1.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepMode {
    /// Constant Hz per frame.
    Linear,
    /// Constant ratio per frame, i.e. constant pitch speed.
    Exponential,
}

/// Per-frame sweep increments. Tuned for a ~60 Hz frame rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepSteps {
    pub linear_hz: f32,
    pub exponential_factor: f32,
}

impl Default for SweepSteps {
    fn default() -> Self {
        Self {
            linear_hz: DEFAULT_LINEAR_STEP_HZ,
            exponential_factor: DEFAULT_EXPONENTIAL_FACTOR,
        }
    }
}

impl SweepSteps {
    pub fn advance(&self, mode: SweepMode, frequency: f32) -> f32 {
        match mode {
            SweepMode::Linear => frequency + self.linear_hz,
            SweepMode::Exponential => frequency * self.exponential_factor,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Sweep {
    mode: SweepMode,
    frequency: f32,
    token: FrameToken,
}

/// Owns the single sounding tone and the frequency every view reads from.
pub struct OscillatorController<P: OscillatorProvider> {
    provider: P,
    tone: Option<P::Tone>,
    engaged: bool,
    frequency: f32,
    range: FrequencyRange,
    steps: SweepSteps,
    sweep: Option<Sweep>,
}

impl<P: OscillatorProvider> OscillatorController<P> {
    pub fn new(provider: P, range: FrequencyRange, initial: f32, steps: SweepSteps) -> Self {
        Self {
            provider,
            tone: None,
            engaged: false,
            frequency: initial,
            range,
            steps,
            sweep: None,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn range(&self) -> FrequencyRange {
        self.range
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    pub fn sweep_mode(&self) -> Option<SweepMode> {
        self.sweep.map(|sweep| sweep.mode)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Replaces any sounding tone with a new one at `frequency`.
    pub fn start(&mut self, frequency: f32) {
        if let Some(mut previous) = self.tone.take() {
            previous.stop();
        }
        let mut tone = self.provider.create_tone(frequency);
        tone.start();
        self.tone = Some(tone);
        self.engaged = true;
        self.frequency = frequency;
        debug!("tone started at {frequency:.1} Hz");
    }

    /// Moves the current frequency, retuning the live tone in place.
    pub fn retune(&mut self, frequency: f32) {
        self.frequency = frequency;
        if let Some(tone) = self.tone.as_mut() {
            tone.set_frequency(frequency);
        }
    }

    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        self.cancel_sweep(scheduler);
        if let Some(mut tone) = self.tone.take() {
            tone.stop();
            debug!("tone stopped at {:.1} Hz", self.frequency);
        }
        self.engaged = false;
    }

    /// Starts a tone at `frequency`, abandoning any sweep in progress.
    pub fn play(&mut self, frequency: f32, scheduler: &mut impl FrameScheduler) {
        self.cancel_sweep(scheduler);
        self.start(frequency);
    }

    /// Pointer went down on a slider: sound the current frequency.
    pub fn press(&mut self, scheduler: &mut impl FrameScheduler) {
        self.play(self.frequency, scheduler);
    }

    pub fn start_sweep(&mut self, mode: SweepMode, scheduler: &mut impl FrameScheduler) {
        self.cancel_sweep(scheduler);
        let frequency = self.range.min;
        self.start(frequency);
        let token = scheduler.request_frame();
        self.sweep = Some(Sweep {
            mode,
            frequency,
            token,
        });
        debug!("{mode:?} sweep from {frequency:.1} Hz");
    }

    /// Frame callback. Returns false for tokens that no longer belong to a
    /// running sweep.
    pub fn on_frame(&mut self, token: FrameToken, scheduler: &mut impl FrameScheduler) -> bool {
        let Some(sweep) = self.sweep else {
            return false;
        };
        if sweep.token != token {
            return false;
        }
        if sweep.frequency < self.range.max {
            let frequency = self.steps.advance(sweep.mode, sweep.frequency);
            self.retune(frequency);
            self.sweep = Some(Sweep {
                frequency,
                token: scheduler.request_frame(),
                ..sweep
            });
        } else {
            self.sweep = None;
            self.stop(scheduler);
            self.frequency = sweep.frequency;
            debug!("sweep finished at {:.1} Hz", sweep.frequency);
        }
        true
    }

    fn cancel_sweep(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(sweep) = self.sweep.take() {
            scheduler.cancel_frame(sweep.token);
            debug!("sweep cancelled at {:.1} Hz", sweep.frequency);
        }
    }
}
