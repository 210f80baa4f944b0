use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use cpal::{
    SampleFormat, SizedSample, Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use log::{error, info};

use crate::{tone::ToneState, voices::VoiceBank};

pub type SharedPipeline = Arc<Mutex<SynthPipeline>>;
pub type ScopeHandle = Arc<Mutex<ScopeBuffer>>;

pub struct SynthPipeline {
    bank: VoiceBank,
    master: f32,
    sample_rate: f32,
}

impl SynthPipeline {
    pub fn new(master: f32) -> Self {
        Self {
            bank: VoiceBank::new(),
            master: master.clamp(0.0, 1.0),
            sample_rate: 44_100.0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, rate: f32) {
        self.sample_rate = rate.max(1.0);
    }

    pub fn connect(&mut self, state: Arc<Mutex<ToneState>>) {
        self.bank.connect(state);
    }

    pub fn voice_count(&self) -> usize {
        self.bank.len()
    }

    pub fn next_sample(&mut self) -> f32 {
        self.bank.next_sample(self.sample_rate) * self.master
    }
}

/// The most recent output samples, oldest first.
pub struct ScopeBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl ScopeBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn snapshot(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}

pub struct AudioEngine {
    _stream: Stream,
}

impl AudioEngine {
    pub fn start(pipeline: SharedPipeline, scope: ScopeHandle) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No default audio output"))?;
        let supported = device
            .default_output_config()
            .context("query default output config")?;
        let config = supported.config();
        let sample_rate = config.sample_rate.0 as f32;
        if let Ok(mut guard) = pipeline.lock() {
            guard.set_sample_rate(sample_rate);
        }
        info!(
            "audio output: {} Hz, {} channel(s), {:?}",
            config.sample_rate.0,
            config.channels,
            supported.sample_format()
        );
        let stream = match supported.sample_format() {
            SampleFormat::I16 => build_stream(&device, &config, pipeline, scope, i16_sample)?,
            SampleFormat::U16 => build_stream(&device, &config, pipeline, scope, u16_sample)?,
            _ => build_stream(&device, &config, pipeline, scope, f32_sample)?,
        };
        stream.play().context("start output stream")?;
        Ok(Self { _stream: stream })
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    pipeline: SharedPipeline,
    scope: ScopeHandle,
    convert: fn(f32) -> T,
) -> Result<Stream>
where
    T: SizedSample + Send + 'static,
{
    let channels = config.channels as usize;
    let stream = device.build_output_stream(
        config,
        move |output: &mut [T], _| {
            fill_output_buffer(output, channels, &pipeline, &scope, convert);
        },
        move |err| error!("audio stream error: {err}"),
        None,
    )?;
    Ok(stream)
}

fn f32_sample(sample: f32) -> f32 {
    sample
}

fn i16_sample(sample: f32) -> i16 {
    (sample * i16::MAX as f32) as i16
}

fn u16_sample(sample: f32) -> u16 {
    let scaled = (sample * 0.5 + 0.5).clamp(0.0, 1.0);
    (scaled * u16::MAX as f32) as u16
}

fn fill_output_buffer<T>(
    output: &mut [T],
    channels: usize,
    pipeline: &SharedPipeline,
    scope: &ScopeHandle,
    convert: fn(f32) -> T,
) where
    T: Copy,
{
    let (Ok(mut pipe), Ok(mut scope_guard)) = (pipeline.lock(), scope.lock()) else {
        return;
    };
    for frame in output.chunks_mut(channels.max(1)) {
        let sample = pipe.next_sample().clamp(-0.98, 0.98);
        scope_guard.push(sample);
        let value = convert(sample);
        for channel in frame {
            *channel = value;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tone::Waveform;

    #[test]
    fn scope_snapshot_is_oldest_first() {
        let mut scope = ScopeBuffer::new(4);
        for value in 1..=6 {
            scope.push(value as f32);
        }
        assert_eq!(scope.snapshot(), vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn partial_scope_snapshot() {
        let mut scope = ScopeBuffer::new(4);
        scope.push(1.0);
        scope.push(2.0);
        assert_eq!(scope.snapshot(), vec![1.0, 2.0]);
    }

    #[test]
    fn master_level_scales_output() {
        let mut pipeline = SynthPipeline::new(0.5);
        pipeline.set_sample_rate(1_000.0);
        let state = Arc::new(Mutex::new(ToneState::new(Waveform::Pulse, 1.0)));
        state.lock().unwrap().start();
        pipeline.connect(state);
        let mut last = 0.0;
        for _ in 0..100 {
            last = pipeline.next_sample();
        }
        assert!((last - 0.5).abs() < 1e-4);
    }
}
