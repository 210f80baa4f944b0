use anyhow::{Result, ensure};
use clap::Parser;

use crate::{
    controller::{DEFAULT_EXPONENTIAL_FACTOR, DEFAULT_LINEAR_STEP_HZ, SweepSteps},
    mapping::{DEFAULT_MAX_HZ, DEFAULT_MIN_HZ, FrequencyRange},
    tone::Waveform,
};

pub const DEFAULT_INITIAL_HZ: f32 = 220.0;
pub const DEFAULT_PITCH_STEP: f32 = 0.001;
pub const FREQUENCY_STEP: f32 = 0.001;
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Interactive frequency / pitch slider with a live oscillator.
#[derive(Parser, Debug)]
#[command(name = "pitch-slider", version)]
pub struct Args {
    /// Frequency of a preset button in Hz. Repeat for more buttons.
    #[arg(long = "preset", value_name = "HZ")]
    pub presets: Vec<f32>,
    /// Show the frequency and pitch sweep buttons.
    #[arg(long)]
    pub animatable: bool,
    /// Plot the frequency history.
    #[arg(long)]
    pub plot: bool,
    /// Show the logarithmic pitch slider.
    #[arg(long)]
    pub show_pitch_slider: bool,
    /// Hide the linear frequency slider.
    #[arg(long)]
    pub hide_frequency_slider: bool,
    /// Step of the pitch slider, as a fraction of its travel.
    #[arg(long, default_value_t = DEFAULT_PITCH_STEP)]
    pub pitch_step: f32,
    #[arg(long, default_value_t = DEFAULT_MIN_HZ, value_name = "HZ")]
    pub min: f32,
    #[arg(long, default_value_t = DEFAULT_MAX_HZ, value_name = "HZ")]
    pub max: f32,
    #[arg(long, default_value_t = DEFAULT_INITIAL_HZ, value_name = "HZ")]
    pub initial: f32,
    /// Hz added per frame by the frequency sweep.
    #[arg(long, default_value_t = DEFAULT_LINEAR_STEP_HZ, value_name = "HZ")]
    pub linear_step: f32,
    /// Ratio applied per frame by the pitch sweep.
    #[arg(long, default_value_t = DEFAULT_EXPONENTIAL_FACTOR)]
    pub exponential_factor: f32,
    #[arg(long, value_enum, default_value_t = Waveform::Sine)]
    pub waveform: Waveform,
    /// Output level between 0 and 1.
    #[arg(long, default_value_t = DEFAULT_VOLUME)]
    pub volume: f32,
    /// Show the output waveform and spectrum.
    #[arg(long)]
    pub scope: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub presets: Vec<f32>,
    pub animatable: bool,
    pub plot: bool,
    pub show_pitch_slider: bool,
    pub show_frequency_slider: bool,
    pub pitch_step: f32,
    pub range: FrequencyRange,
    pub initial: f32,
    pub sweep_steps: SweepSteps,
    pub waveform: Waveform,
    pub volume: f32,
    pub scope: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            presets: Vec::new(),
            animatable: false,
            plot: false,
            show_pitch_slider: false,
            show_frequency_slider: true,
            pitch_step: DEFAULT_PITCH_STEP,
            range: FrequencyRange::default(),
            initial: DEFAULT_INITIAL_HZ,
            sweep_steps: SweepSteps::default(),
            waveform: Waveform::Sine,
            volume: DEFAULT_VOLUME,
            scope: false,
        }
    }
}

impl From<Args> for WidgetConfig {
    fn from(args: Args) -> Self {
        Self {
            presets: args.presets,
            animatable: args.animatable,
            plot: args.plot,
            show_pitch_slider: args.show_pitch_slider,
            show_frequency_slider: !args.hide_frequency_slider,
            pitch_step: args.pitch_step,
            range: FrequencyRange::new(args.min, args.max),
            initial: args.initial,
            sweep_steps: SweepSteps {
                linear_hz: args.linear_step,
                exponential_factor: args.exponential_factor,
            },
            waveform: args.waveform,
            volume: args.volume,
            scope: args.scope,
        }
    }
}

impl WidgetConfig {
    pub fn validate(&self) -> Result<()> {
        let FrequencyRange { min, max } = self.range;
        ensure!(min > 0.0, "--min must be positive, got {min}");
        ensure!(min < max, "--min ({min}) must be below --max ({max})");
        ensure!(self.initial > 0.0, "--initial must be positive");
        ensure!(
            self.presets.iter().all(|hz| *hz > 0.0),
            "preset frequencies must be positive"
        );
        ensure!(
            self.pitch_step > 0.0 && self.pitch_step <= 1.0,
            "--pitch-step must be in (0, 1]"
        );
        ensure!(
            self.sweep_steps.linear_hz > 0.0,
            "--linear-step must be positive"
        );
        ensure!(
            self.sweep_steps.exponential_factor > 1.0,
            "--exponential-factor must be greater than 1"
        );
        ensure!(
            (0.0..=1.0).contains(&self.volume),
            "--volume must be between 0 and 1"
        );
        Ok(())
    }
}
