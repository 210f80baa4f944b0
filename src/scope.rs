use rustfft::{FftPlanner, num_complex::Complex};

pub const SCOPE_WINDOW: usize = 4_096;

/// Magnitude spectrum of one scope window.
#[derive(Debug, Default, Clone)]
pub struct Spectrum {
    pub magnitudes: Vec<f32>,
    /// Width of one bin in Hz.
    pub bin_hz: f32,
}

impl Spectrum {
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Centre frequency of the loudest bin, ignoring DC. `None` for silence.
    pub fn peak_frequency(&self) -> Option<f32> {
        let (index, magnitude) = self
            .magnitudes
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))?;
        if *magnitude <= 1e-4 {
            return None;
        }
        Some(index as f32 * self.bin_hz)
    }
}

pub fn compute_spectrum(samples: &[f32], sample_rate: f32) -> Spectrum {
    if samples.is_empty() {
        return Spectrum::default();
    }
    let size = samples.len().next_power_of_two().max(8);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(size);
    let mut buffer = vec![Complex::new(0.0, 0.0); size];
    // Hann window
    let last = (samples.len().max(2) - 1) as f32;
    for (idx, value) in samples.iter().enumerate().take(size) {
        let window = 0.5 - 0.5 * (std::f32::consts::TAU * idx as f32 / last).cos();
        buffer[idx].re = *value * window;
    }
    fft.process(&mut buffer);
    let magnitudes = buffer[..size / 2]
        .iter()
        .map(|c| c.norm() / size as f32)
        .collect();
    Spectrum {
        magnitudes,
        bin_hz: sample_rate / size as f32,
    }
}
