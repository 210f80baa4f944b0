use std::sync::{Arc, Mutex, mpsc};

use clap::ValueEnum;
use log::debug;
use tokio::runtime::Handle;

use crate::output::SharedPipeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Pulse,
    Triangle,
}

impl Waveform {
    pub fn label(&self) -> &'static str {
        match self {
            Waveform::Sine => "SINE",
            Waveform::Saw => "SAW",
            Waveform::Pulse => "PULSE",
            Waveform::Triangle => "TRI",
        }
    }

    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * std::f32::consts::TAU).sin(),
            Waveform::Saw => 2.0 * (phase - 0.5),
            Waveform::Pulse => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneStage {
    Created,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct ToneState {
    pub waveform: Waveform,
    pub frequency: f32,
    pub stage: ToneStage,
}

impl ToneState {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
            stage: ToneStage::Created,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn start(&mut self) {
        if self.stage == ToneStage::Created {
            self.stage = ToneStage::Running;
        }
    }

    /// A stopped tone cannot be restarted; a new one has to be created.
    pub fn stop(&mut self) {
        self.stage = ToneStage::Stopped;
    }

    pub fn is_audible(&self) -> bool {
        self.stage == ToneStage::Running
    }
}

#[derive(Debug)]
pub enum ToneCommand {
    SetFrequency(f32),
    Start,
    Stop,
}

/// A single oscillator tone, already connected to the output.
pub trait Tone {
    fn set_frequency(&mut self, frequency: f32);
    fn start(&mut self);
    fn stop(&mut self);
}

/// Source of new tones. Created tones are connected but silent until started.
pub trait OscillatorProvider {
    type Tone: Tone;

    fn create_tone(&mut self, frequency: f32) -> Self::Tone;
}

pub type ToneHandle = (Arc<Mutex<ToneState>>, mpsc::Sender<ToneCommand>);

pub fn spawn_tone(runtime: &Handle, waveform: Waveform, frequency: f32) -> ToneHandle {
    let (tx, rx) = mpsc::channel();
    let state = Arc::new(Mutex::new(ToneState::new(waveform, frequency)));
    let thread_state = state.clone();

    runtime.spawn_blocking(move || {
        while let Ok(cmd) = rx.recv() {
            let Ok(mut guard) = thread_state.lock() else {
                break;
            };
            match cmd {
                ToneCommand::SetFrequency(frequency) => guard.set_frequency(frequency),
                ToneCommand::Start => guard.start(),
                ToneCommand::Stop => guard.stop(),
            }
        }
    });

    (state, tx)
}

/// Tone living in the audio engine. Dropping it ends its command task; the
/// voice itself is released by the pipeline once it has faded out.
pub struct EngineTone {
    state: Arc<Mutex<ToneState>>,
    tx: mpsc::Sender<ToneCommand>,
}

impl EngineTone {
    #[cfg(test)]
    fn state(&self) -> Arc<Mutex<ToneState>> {
        self.state.clone()
    }

    fn send(&self, cmd: ToneCommand) {
        if self.tx.send(cmd).is_err() {
            debug!("tone command task already finished");
        }
    }
}

impl Tone for EngineTone {
    fn set_frequency(&mut self, frequency: f32) {
        self.send(ToneCommand::SetFrequency(frequency));
    }

    fn start(&mut self) {
        self.send(ToneCommand::Start);
    }

    fn stop(&mut self) {
        self.send(ToneCommand::Stop);
    }
}

pub struct EngineProvider {
    runtime: Handle,
    pipeline: SharedPipeline,
    waveform: Waveform,
}

impl EngineProvider {
    pub fn new(runtime: Handle, pipeline: SharedPipeline, waveform: Waveform) -> Self {
        Self {
            runtime,
            pipeline,
            waveform,
        }
    }
}

impl OscillatorProvider for EngineProvider {
    type Tone = EngineTone;

    fn create_tone(&mut self, frequency: f32) -> EngineTone {
        let (state, tx) = spawn_tone(&self.runtime, self.waveform, frequency);
        if let Ok(mut synth) = self.pipeline.lock() {
            synth.connect(state.clone());
        }
        EngineTone { state, tx }
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use tokio::runtime::Runtime;

    use super::*;
    use crate::output::SynthPipeline;

    fn wait_for(state: &Arc<Mutex<ToneState>>, check: impl Fn(&ToneState) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if check(&state.lock().unwrap()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn waveforms_stay_in_unit_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Saw,
            Waveform::Pulse,
            Waveform::Triangle,
        ] {
            for step in 0..100 {
                let value = waveform.sample(step as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&value), "{} {value}", waveform.label());
            }
        }
    }

    #[test]
    fn stopped_tone_does_not_restart() {
        let mut state = ToneState::new(Waveform::Sine, 220.0);
        state.start();
        assert!(state.is_audible());
        state.stop();
        state.start();
        assert_eq!(state.stage, ToneStage::Stopped);
    }

    #[test]
    fn commands_reach_tone_state() {
        let runtime = Runtime::new().unwrap();
        let (state, tx) = spawn_tone(runtime.handle(), Waveform::Sine, 220.0);
        tx.send(ToneCommand::Start).unwrap();
        tx.send(ToneCommand::SetFrequency(440.0)).unwrap();
        assert!(wait_for(&state, |s| s.is_audible() && s.frequency == 440.0));
        tx.send(ToneCommand::Stop).unwrap();
        assert!(wait_for(&state, |s| s.stage == ToneStage::Stopped));
    }

    #[test]
    fn provider_connects_tones_to_pipeline() {
        let runtime = Runtime::new().unwrap();
        let pipeline = Arc::new(Mutex::new(SynthPipeline::new(0.5)));
        let mut provider =
            EngineProvider::new(runtime.handle().clone(), pipeline.clone(), Waveform::Saw);
        let mut tone = provider.create_tone(330.0);
        assert_eq!(pipeline.lock().unwrap().voice_count(), 1);
        tone.start();
        let state = tone.state();
        assert!(wait_for(&state, |s| s.is_audible()));
        assert_eq!(state.lock().unwrap().waveform, Waveform::Saw);
    }
}
