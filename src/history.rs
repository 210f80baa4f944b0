use std::collections::VecDeque;

use macroquad::prelude::{Color, Vec2, vec2};

use crate::mapping::FrequencyRange;

pub const HISTORY_LEN: usize = 1_000;
pub const TRACE_THICKNESS: f32 = 8.0;

pub const FREQUENCY_COLOR: Color = Color {
    r: 0.231,
    g: 0.510,
    b: 0.965,
    a: 1.0,
};
pub const PITCH_COLOR: Color = Color {
    r: 0.918,
    g: 0.702,
    b: 0.031,
    a: 1.0,
};

/// Somewhere a polyline plot can be drawn. Coordinates are relative to the
/// surface's top-left corner.
pub trait PlotSurface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, thickness: f32);
}

/// The most recent frequency samples, oldest first.
#[derive(Debug, Clone)]
pub struct FrequencyHistory {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl FrequencyHistory {
    pub fn new(initial: f32) -> Self {
        Self::with_capacity(initial, HISTORY_LEN)
    }

    pub fn with_capacity(initial: f32, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut samples = VecDeque::with_capacity(capacity + 1);
        samples.push_back(initial);
        Self { samples, capacity }
    }

    pub fn push(&mut self, frequency: f32) {
        self.samples.push_back(frequency);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }
}

/// Maps `values` into a `size` box: value to x within `[lo, hi]`, index to y
/// with the newest sample at the top.
pub fn trace_points(
    values: impl ExactSizeIterator<Item = f32>,
    lo: f32,
    hi: f32,
    size: Vec2,
) -> Vec<Vec2> {
    let count = values.len() as f32;
    values
        .enumerate()
        .map(|(index, value)| {
            let x = (value - lo) / (hi - lo) * size.x;
            let y = (1.0 - index as f32 / count) * size.y;
            vec2(x, y)
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotTraces {
    pub frequency: bool,
    pub pitch: bool,
}

pub struct HistoryPlotter {
    history: FrequencyHistory,
    range: FrequencyRange,
    traces: PlotTraces,
}

impl HistoryPlotter {
    pub fn new(range: FrequencyRange, initial: f32, traces: PlotTraces) -> Self {
        Self {
            history: FrequencyHistory::new(initial),
            range,
            traces,
        }
    }

    pub fn history(&self) -> &FrequencyHistory {
        &self.history
    }

    /// Records `frequency` and redraws onto `surface` when there is one.
    pub fn tick<S: PlotSurface>(&mut self, frequency: f32, surface: Option<&mut S>) {
        self.history.push(frequency);
        if let Some(surface) = surface {
            self.draw(surface);
        }
    }

    pub fn draw<S: PlotSurface>(&self, surface: &mut S) {
        surface.clear();
        let size = surface.size();
        if self.traces.frequency {
            let points = trace_points(self.history.iter(), self.range.min, self.range.max, size);
            surface.stroke_polyline(&points, FREQUENCY_COLOR, TRACE_THICKNESS);
        }
        if self.traces.pitch {
            let (min_oct, max_oct) = self.range.log2_bounds();
            let perceptual = self.history.iter().map(f32::log2);
            let points = trace_points(perceptual, min_oct, max_oct, size);
            surface.stroke_polyline(&points, PITCH_COLOR, TRACE_THICKNESS);
        }
    }
}
