use std::fmt;

pub const DEFAULT_MIN_HZ: f32 = 55.0;
pub const DEFAULT_MAX_HZ: f32 = 7_040.0;

/// Frequency bounds shared by both sliders. Callers keep `0 < min < max`;
/// the logarithmic mappings are meaningless otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyRange {
    pub min: f32,
    pub max: f32,
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HZ, DEFAULT_MAX_HZ)
    }
}

impl FrequencyRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn freq_slider_to_freq(&self, position: f32) -> f32 {
        self.min + position * (self.max - self.min)
    }

    pub fn freq_to_freq_slider(&self, frequency: f32) -> f32 {
        (frequency - self.min) / (self.max - self.min)
    }

    pub fn pitch_slider_to_freq(&self, position: f32) -> f32 {
        self.min * 2.0f32.powf(position * self.octaves())
    }

    pub fn freq_to_pitch_slider(&self, frequency: f32) -> f32 {
        let (min_oct, max_oct) = self.log2_bounds();
        (frequency.log2() - min_oct) / (max_oct - min_oct)
    }

    /// Number of octaves spanned by the range.
    pub fn octaves(&self) -> f32 {
        (self.max / self.min).log2()
    }

    pub fn log2_bounds(&self) -> (f32, f32) {
        (self.min.log2(), self.max.log2())
    }

    /// Power of two that takes `min` to `frequency`.
    pub fn exponent(&self, frequency: f32) -> f32 {
        self.freq_to_pitch_slider(frequency) * self.octaves()
    }

    pub fn pitch_exponent(&self, frequency: f32) -> PitchExponent {
        PitchExponent::from_exponent(self.exponent(frequency))
    }
}

/// Display form of the exponent in `min * 2^exponent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PitchExponent {
    Octaves(i32),
    Semitones(i32),
    Decimal(f32),
}

impl PitchExponent {
    pub fn from_exponent(exponent: f32) -> Self {
        let semitones = round_to_hundredths(exponent * 12.0);
        if semitones % 12.0 == 0.0 {
            PitchExponent::Octaves((semitones / 12.0) as i32)
        } else if semitones % 1.0 == 0.0 {
            PitchExponent::Semitones(semitones as i32)
        } else {
            PitchExponent::Decimal(exponent)
        }
    }
}

impl fmt::Display for PitchExponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitchExponent::Octaves(octaves) => write!(f, "{octaves}"),
            PitchExponent::Semitones(semitones) => write!(f, "{semitones}/12"),
            PitchExponent::Decimal(exponent) => write!(f, "{exponent:.2}"),
        }
    }
}

fn round_to_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
