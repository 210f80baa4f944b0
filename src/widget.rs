use macroquad::{prelude::*, text::measure_text};

use crate::{
    config::{FREQUENCY_STEP, WidgetConfig},
    controller::{OscillatorController, SweepMode},
    history::{FREQUENCY_COLOR, HistoryPlotter, PITCH_COLOR, PlotSurface, PlotTraces},
    scheduler::FrameQueue,
    scope::Spectrum,
    tone::OscillatorProvider,
};

pub const SCREEN_WIDTH: f32 = 1_000.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

const MARGIN: f32 = 40.0;
const SLIDER_WIDTH: f32 = 600.0;
const SLIDER_HEIGHT: f32 = 24.0;
const CANVAS_WIDTH: f32 = 584.0;
const CANVAS_HEIGHT: f32 = 300.0;
const BUTTON_HEIGHT: f32 = 36.0;
const BUTTON_GAP: f32 = 8.0;
const LABEL_FONT_SIZE: u16 = 28;
const BUTTON_FONT_SIZE: u16 = 18;
const SCOPE_MAX_FREQ: f32 = 8_000.0;
const SCOPE_MIN_DB: f32 = -80.0;
const SCOPE_MAX_DB: f32 = 0.0;

pub const BACKGROUND: Color = Color {
    r: 0.02,
    g: 0.02,
    b: 0.02,
    a: 1.0,
};
const FOREGROUND: Color = Color {
    r: 0.9,
    g: 0.9,
    b: 0.9,
    a: 1.0,
};
const LINE_HIGHLIGHT: Color = Color {
    r: 0.14,
    g: 0.14,
    b: 0.16,
    a: 1.0,
};
const TRACK: Color = Color {
    r: 0.3,
    g: 0.3,
    b: 0.32,
    a: 1.0,
};
const CANVAS_BACKGROUND: Color = Color {
    r: 0.06,
    g: 0.06,
    b: 0.07,
    a: 1.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderKind {
    Frequency,
    Pitch,
}

impl SliderKind {
    fn color(&self) -> Color {
        match self {
            SliderKind::Frequency => FREQUENCY_COLOR,
            SliderKind::Pitch => PITCH_COLOR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ButtonAction {
    Sweep(SweepMode),
    Preset(f32),
}

impl ButtonAction {
    fn label(&self) -> String {
        match self {
            ButtonAction::Sweep(SweepMode::Linear) => "Frequency Sweep".into(),
            ButtonAction::Sweep(SweepMode::Exponential) => "Pitch Sweep".into(),
            ButtonAction::Preset(hz) => format!("{hz}Hz"),
        }
    }

    fn color(&self) -> Color {
        match self {
            ButtonAction::Sweep(SweepMode::Linear) => FREQUENCY_COLOR,
            ButtonAction::Sweep(SweepMode::Exponential) => PITCH_COLOR,
            ButtonAction::Preset(_) => FOREGROUND,
        }
    }
}

#[derive(Clone, Debug)]
pub struct WidgetButton {
    pub action: ButtonAction,
    pub rect: Rect,
}

#[derive(Clone, Debug)]
pub struct WidgetLayout {
    pub label: Vec2,
    pub sliders: Vec<(SliderKind, Rect)>,
    pub canvas: Option<Rect>,
    pub buttons: Vec<WidgetButton>,
    pub scope: Option<Rect>,
}

impl WidgetLayout {
    pub fn new(config: &WidgetConfig) -> Self {
        let mut y = MARGIN + LABEL_FONT_SIZE as f32;
        let label = vec2(MARGIN, y);
        y += 24.0;

        let mut sliders = Vec::new();
        for (kind, shown) in [
            (SliderKind::Frequency, config.show_frequency_slider),
            (SliderKind::Pitch, config.show_pitch_slider),
        ] {
            if shown {
                sliders.push((kind, Rect::new(MARGIN, y, SLIDER_WIDTH, SLIDER_HEIGHT)));
                y += SLIDER_HEIGHT + 16.0;
            }
        }

        let canvas = config.plot.then(|| {
            let rect = Rect::new(MARGIN + 8.0, y + 8.0, CANVAS_WIDTH, CANVAS_HEIGHT);
            y += CANVAS_HEIGHT + 24.0;
            rect
        });

        let mut actions = Vec::new();
        if config.animatable {
            actions.push(ButtonAction::Sweep(SweepMode::Linear));
            actions.push(ButtonAction::Sweep(SweepMode::Exponential));
        }
        actions.extend(config.presets.iter().map(|hz| ButtonAction::Preset(*hz)));

        let mut x = MARGIN;
        let mut buttons = Vec::new();
        for action in actions {
            let width = 16.0 + 9.0 * action.label().chars().count() as f32;
            if x + width > SCREEN_WIDTH - MARGIN && x > MARGIN {
                x = MARGIN;
                y += BUTTON_HEIGHT + BUTTON_GAP;
            }
            buttons.push(WidgetButton {
                action,
                rect: Rect::new(x, y, width, BUTTON_HEIGHT),
            });
            x += width + BUTTON_GAP;
        }

        let scope = config.scope.then(|| {
            let left = MARGIN + SLIDER_WIDTH + MARGIN;
            Rect::new(
                left,
                MARGIN + 52.0,
                SCREEN_WIDTH - left - MARGIN,
                SCREEN_HEIGHT - 2.0 * MARGIN - 52.0,
            )
        });

        Self {
            label,
            sliders,
            canvas,
            buttons,
            scope,
        }
    }

    fn slider_at(&self, point: Vec2) -> Option<SliderKind> {
        self.sliders
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(kind, _)| *kind)
    }

    fn button_at(&self, point: Vec2) -> Option<usize> {
        self.buttons
            .iter()
            .position(|button| button.rect.contains(point))
    }
}

/// Left-button pointer state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    pub position: Vec2,
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
}

impl PointerInput {
    pub fn poll() -> Self {
        let (x, y) = mouse_position();
        Self {
            position: vec2(x, y),
            pressed: is_mouse_button_pressed(MouseButton::Left),
            down: is_mouse_button_down(MouseButton::Left),
            released: is_mouse_button_released(MouseButton::Left),
        }
    }
}

/// The plot canvas inside the macroquad window.
pub struct CanvasSurface {
    rect: Rect,
}

impl CanvasSurface {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

impl PlotSurface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn clear(&mut self) {
        let rect = self.rect;
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, CANVAS_BACKGROUND);
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Color, thickness: f32) {
        let origin = self.rect.point();
        for pair in points.windows(2) {
            let (a, b) = (origin + pair[0], origin + pair[1]);
            draw_line(a.x, a.y, b.x, b.y, thickness, color);
        }
    }
}

/// Slider position for a pointer x coordinate, snapped to `step`.
pub fn slider_value(rect: Rect, x: f32, step: f32) -> f32 {
    let raw = ((x - rect.x) / rect.w).clamp(0.0, 1.0);
    if step <= 0.0 {
        return raw;
    }
    ((raw / step).round() * step).clamp(0.0, 1.0)
}

/// The whole widget: sliders, label, plot and buttons around one controller.
pub struct PitchSlider<P: OscillatorProvider> {
    config: WidgetConfig,
    layout: WidgetLayout,
    controller: OscillatorController<P>,
    plotter: HistoryPlotter,
    frames: FrameQueue,
    dragging: Option<SliderKind>,
    armed_button: Option<usize>,
}

impl<P: OscillatorProvider> PitchSlider<P> {
    pub fn new(config: WidgetConfig, provider: P) -> Self {
        let layout = WidgetLayout::new(&config);
        let controller =
            OscillatorController::new(provider, config.range, config.initial, config.sweep_steps);
        let traces = PlotTraces {
            frequency: config.show_frequency_slider,
            pitch: config.show_pitch_slider,
        };
        let plotter = HistoryPlotter::new(config.range, config.initial, traces);
        Self {
            config,
            layout,
            controller,
            plotter,
            frames: FrameQueue::new(),
            dragging: None,
            armed_button: None,
        }
    }

    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    pub fn controller(&self) -> &OscillatorController<P> {
        &self.controller
    }

    pub fn plotter(&self) -> &HistoryPlotter {
        &self.plotter
    }

    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }

    pub fn frequency(&self) -> f32 {
        self.controller.frequency()
    }

    pub fn slider_position(&self, kind: SliderKind) -> f32 {
        let range = self.config.range;
        let frequency = self.frequency();
        let position = match kind {
            SliderKind::Frequency => range.freq_to_freq_slider(frequency),
            SliderKind::Pitch => range.freq_to_pitch_slider(frequency),
        };
        position.clamp(0.0, 1.0)
    }

    pub fn frequency_label(&self) -> Option<String> {
        self.config
            .show_frequency_slider
            .then(|| format!("{:.0}Hz", self.frequency()))
    }

    /// Base and exponent of `min * 2^exponent`.
    pub fn pitch_label(&self) -> Option<(String, String)> {
        self.config.show_pitch_slider.then(|| {
            let range = self.config.range;
            (
                format!("{}Hz * 2", range.min),
                range.pitch_exponent(self.frequency()).to_string(),
            )
        })
    }

    /// One frame: pointer input, frame callbacks requested before this frame,
    /// then the plot sample. Requests made while handling input wait a frame.
    pub fn update<S: PlotSurface>(&mut self, input: &PointerInput, canvas: Option<&mut S>) {
        let due = self.frames.fire();
        self.handle_pointer(input);
        for token in due {
            self.controller.on_frame(token, &mut self.frames);
        }
        if self.config.plot {
            self.plotter.tick(self.controller.frequency(), canvas);
        }
    }

    fn handle_pointer(&mut self, input: &PointerInput) {
        if input.pressed {
            if let Some(kind) = self.layout.slider_at(input.position) {
                self.dragging = Some(kind);
                self.controller.press(&mut self.frames);
                self.drag_to(kind, input.position.x);
            } else if let Some(index) = self.layout.button_at(input.position) {
                self.armed_button = Some(index);
                if let ButtonAction::Preset(hz) = self.layout.buttons[index].action {
                    self.controller.play(hz, &mut self.frames);
                }
            }
        } else if input.down {
            if let Some(kind) = self.dragging {
                self.drag_to(kind, input.position.x);
            }
        }

        if input.released {
            // Released anywhere, including outside the window's widgets.
            self.controller.stop(&mut self.frames);
            self.dragging = None;
            if let Some(index) = self.armed_button.take() {
                let button = &self.layout.buttons[index];
                if let ButtonAction::Sweep(mode) = button.action {
                    if button.rect.contains(input.position) {
                        self.controller.start_sweep(mode, &mut self.frames);
                    }
                }
            }
        }
    }

    fn drag_to(&mut self, kind: SliderKind, x: f32) {
        let Some(rect) = self
            .layout
            .sliders
            .iter()
            .find(|(slider, _)| *slider == kind)
            .map(|(_, rect)| *rect)
        else {
            return;
        };
        let range = self.config.range;
        let frequency = match kind {
            SliderKind::Frequency => {
                range.freq_slider_to_freq(slider_value(rect, x, FREQUENCY_STEP))
            }
            SliderKind::Pitch => {
                range.pitch_slider_to_freq(slider_value(rect, x, self.config.pitch_step))
            }
        };
        if frequency != self.controller.frequency() {
            self.controller.retune(frequency);
        }
    }

    pub fn draw(&self) {
        self.draw_label();
        for (kind, rect) in &self.layout.sliders {
            draw_slider(*rect, self.slider_position(*kind), kind.color());
        }
        if let Some(rect) = self.layout.canvas {
            draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, LINE_HIGHLIGHT);
        }
        for (index, button) in self.layout.buttons.iter().enumerate() {
            draw_button(button, self.armed_button == Some(index));
        }
        let status = if self.controller.is_sweeping() {
            "SWEEPING"
        } else if self.controller.is_engaged() {
            "PLAYING"
        } else {
            "IDLE"
        };
        draw_text(status, MARGIN, SCREEN_HEIGHT - MARGIN * 0.5, 16.0, TRACK);
    }

    fn draw_label(&self) {
        let mut x = self.layout.label.x;
        let y = self.layout.label.y;
        let frequency = self.frequency_label();
        let pitch = self.pitch_label();
        if let Some(text) = &frequency {
            x += draw_label_part(text, x, y, LABEL_FONT_SIZE, FREQUENCY_COLOR);
        }
        if frequency.is_some() && pitch.is_some() {
            x += draw_label_part(" = ", x, y, LABEL_FONT_SIZE, FOREGROUND);
        }
        if let Some((base, exponent)) = &pitch {
            x += draw_label_part(base, x, y, LABEL_FONT_SIZE, FOREGROUND);
            draw_label_part(exponent, x, y - 12.0, LABEL_FONT_SIZE * 2 / 3, PITCH_COLOR);
        }
    }
}

fn draw_label_part(text: &str, x: f32, y: f32, size: u16, color: Color) -> f32 {
    let params = TextParams {
        font_size: size,
        color,
        ..Default::default()
    };
    draw_text_ex(text, x, y, params).width
}

fn draw_slider(rect: Rect, position: f32, color: Color) {
    let center_y = rect.y + rect.h * 0.5;
    let thumb_x = rect.x + position * rect.w;
    draw_line(rect.x, center_y, rect.x + rect.w, center_y, 4.0, TRACK);
    draw_line(rect.x, center_y, thumb_x, center_y, 4.0, color);
    draw_circle(thumb_x, center_y, rect.h * 0.4, color);
}

fn draw_button(button: &WidgetButton, armed: bool) {
    let rect = button.rect;
    let fill = if armed { TRACK } else { LINE_HIGHLIGHT };
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);
    let text = button.action.label();
    let measure = measure_text(&text, None, BUTTON_FONT_SIZE, 1.0);
    draw_text_ex(
        &text,
        rect.x + (rect.w - measure.width) * 0.5,
        rect.y + (rect.h + measure.height) * 0.5,
        TextParams {
            font_size: BUTTON_FONT_SIZE,
            color: button.action.color(),
            ..Default::default()
        },
    );
}

/// Output waveform on top, spectrum below with the measured peak.
pub fn draw_scope(rect: Rect, waveform: &[f32], spectrum: &Spectrum) {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, CANVAS_BACKGROUND);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, LINE_HIGHLIGHT);
    draw_text("OUTPUT SCOPE", rect.x + 12.0, rect.y + 24.0, 20.0, FOREGROUND);

    let wave_rect = Rect::new(rect.x + 12.0, rect.y + 40.0, rect.w - 24.0, 110.0);
    draw_rectangle_lines(
        wave_rect.x,
        wave_rect.y,
        wave_rect.w,
        wave_rect.h,
        1.0,
        LINE_HIGHLIGHT,
    );
    draw_waveform(wave_rect, waveform);

    let spectrum_rect = Rect::new(
        rect.x + 12.0,
        wave_rect.y + wave_rect.h + 20.0,
        rect.w - 24.0,
        rect.h - wave_rect.h - 110.0,
    );
    draw_rectangle_lines(
        spectrum_rect.x,
        spectrum_rect.y,
        spectrum_rect.w,
        spectrum_rect.h,
        1.0,
        LINE_HIGHLIGHT,
    );
    draw_spectrum(spectrum_rect, spectrum);

    let peak = match spectrum.peak_frequency() {
        Some(hz) => format!("PEAK {hz:.0} Hz"),
        None => "PEAK -".to_string(),
    };
    draw_text(
        &peak,
        spectrum_rect.x,
        spectrum_rect.y + spectrum_rect.h + 24.0,
        18.0,
        PITCH_COLOR,
    );
}

/// Samples left to right, full scale spanning 90% of the height.
fn waveform_points(samples: &[f32], size: Vec2) -> Vec<Vec2> {
    let span = samples.len().saturating_sub(1).max(1) as f32;
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let x = index as f32 / span * size.x;
            let y = (0.5 - sample.clamp(-1.0, 1.0) * 0.45) * size.y;
            vec2(x, y)
        })
        .collect()
}

fn draw_waveform(rect: Rect, samples: &[f32]) {
    let points = waveform_points(samples, rect.size());
    CanvasSurface::new(rect).stroke_polyline(&points, FREQUENCY_COLOR, 1.0);
}

fn draw_spectrum(rect: Rect, spectrum: &Spectrum) {
    if spectrum.is_empty() || spectrum.bin_hz <= 0.0 {
        return;
    }
    let mut prev = None;
    for (i, magnitude) in spectrum.magnitudes.iter().enumerate() {
        let freq = i as f32 * spectrum.bin_hz;
        if freq > SCOPE_MAX_FREQ {
            break;
        }
        let x = rect.x + (freq / SCOPE_MAX_FREQ) * rect.w;
        let db = 20.0 * magnitude.max(1e-6).log10();
        let normalized = ((db - SCOPE_MIN_DB) / (SCOPE_MAX_DB - SCOPE_MIN_DB)).clamp(0.0, 1.0);
        let y = rect.y + rect.h - normalized * rect.h;
        if let Some((px, py)) = prev {
            draw_line(px, py, x, y, 2.0, PITCH_COLOR);
        }
        prev = Some((x, y));
    }

    for freq in [0.0, 2_000.0, 4_000.0, 6_000.0, 8_000.0] {
        let x = rect.x + (freq / SCOPE_MAX_FREQ) * rect.w;
        draw_line(x, rect.y, x, rect.y + rect.h, 0.5, LINE_HIGHLIGHT);
        draw_text(
            &format!("{:.0}k", freq / 1_000.0),
            x - 8.0,
            rect.y + rect.h + 14.0,
            14.0,
            TRACK,
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::controller::test::MockProvider;

    struct NullSurface;

    impl PlotSurface for NullSurface {
        fn size(&self) -> Vec2 {
            vec2(CANVAS_WIDTH, CANVAS_HEIGHT)
        }

        fn clear(&mut self) {}

        fn stroke_polyline(&mut self, _points: &[Vec2], _color: Color, _thickness: f32) {}
    }

    fn widget(config: WidgetConfig) -> PitchSlider<MockProvider> {
        PitchSlider::new(config, MockProvider::default())
    }

    fn step(widget: &mut PitchSlider<MockProvider>, input: PointerInput) {
        widget.update(&input, Some(&mut NullSurface));
    }

    fn press(position: Vec2) -> PointerInput {
        PointerInput {
            position,
            pressed: true,
            down: true,
            released: false,
        }
    }

    fn drag(position: Vec2) -> PointerInput {
        PointerInput {
            position,
            down: true,
            ..Default::default()
        }
    }

    fn release(position: Vec2) -> PointerInput {
        PointerInput {
            position,
            released: true,
            ..Default::default()
        }
    }

    fn idle() -> PointerInput {
        PointerInput::default()
    }

    fn slider_rect(widget: &PitchSlider<MockProvider>, kind: SliderKind) -> Rect {
        widget
            .layout()
            .sliders
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, rect)| *rect)
            .unwrap()
    }

    fn button_rect(widget: &PitchSlider<MockProvider>, action: ButtonAction) -> Rect {
        widget
            .layout()
            .buttons
            .iter()
            .find(|b| b.action == action)
            .map(|b| b.rect)
            .unwrap()
    }

    #[test]
    fn slider_value_snaps_to_step() {
        let rect = Rect::new(0.0, 0.0, 100.0, 10.0);
        assert_eq!(slider_value(rect, -20.0, 0.1), 0.0);
        assert_eq!(slider_value(rect, 150.0, 0.1), 1.0);
        assert!((slider_value(rect, 33.0, 0.1) - 0.3).abs() < 1e-6);
        assert!((slider_value(rect, 33.0, 0.001) - 0.33).abs() < 1e-6);
    }

    #[test]
    fn layout_follows_flags() {
        let plain = WidgetLayout::new(&WidgetConfig::default());
        assert_eq!(plain.sliders.len(), 1);
        assert!(plain.canvas.is_none() && plain.buttons.is_empty());

        let full = WidgetLayout::new(&WidgetConfig {
            show_pitch_slider: true,
            plot: true,
            animatable: true,
            presets: vec![110.0, 220.0],
            ..Default::default()
        });
        assert_eq!(full.sliders.len(), 2);
        assert!(full.canvas.is_some());
        assert_eq!(full.buttons.len(), 4);
        assert_eq!(full.buttons[2].action, ButtonAction::Preset(110.0));
    }

    #[test]
    fn dragging_frequency_slider_retunes_and_release_stops() {
        let mut widget = widget(WidgetConfig::default());
        let rect = slider_rect(&widget, SliderKind::Frequency);
        let middle = vec2(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5);

        step(&mut widget, press(middle));
        let provider = widget.controller().provider();
        assert_eq!(provider.tones.len(), 1);
        assert_eq!(provider.live(), 1);
        let expected = 55.0 + 0.5 * (7_040.0 - 55.0);
        assert!((widget.frequency() - expected).abs() < 1e-2);
        assert!((provider.last().borrow().frequency - expected).abs() < 1e-2);

        step(&mut widget, drag(vec2(rect.x + rect.w, middle.y)));
        assert!((widget.frequency() - 7_040.0).abs() < 1e-2);
        assert_eq!(widget.controller().provider().tones.len(), 1);

        step(&mut widget, release(vec2(-100.0, -100.0)));
        assert_eq!(widget.controller().provider().live(), 0);
        assert!(!widget.controller().is_engaged());

        step(&mut widget, drag(vec2(rect.x, middle.y)));
        assert!((widget.frequency() - 7_040.0).abs() < 1e-2);
    }

    #[test]
    fn pitch_slider_is_logarithmic() {
        let mut widget = widget(WidgetConfig {
            show_pitch_slider: true,
            ..Default::default()
        });
        let rect = slider_rect(&widget, SliderKind::Pitch);
        let at = vec2(rect.x + rect.w * 2.0 / 7.0, rect.y + 1.0);
        step(&mut widget, press(at));
        assert!((widget.frequency() - 220.0).abs() < 0.5);
        assert!((widget.slider_position(SliderKind::Pitch) - 2.0 / 7.0).abs() < 1e-3);
    }

    #[test]
    fn preset_plays_while_held() {
        let mut widget = widget(WidgetConfig {
            presets: vec![440.0],
            ..Default::default()
        });
        let rect = button_rect(&widget, ButtonAction::Preset(440.0));
        step(&mut widget, press(rect.center()));
        assert_eq!(widget.frequency(), 440.0);
        assert_eq!(widget.controller().provider().live(), 1);
        step(&mut widget, release(rect.center()));
        assert_eq!(widget.controller().provider().live(), 0);
    }

    #[test]
    fn sweep_button_click_runs_sweep_each_frame() {
        let mut widget = widget(WidgetConfig {
            animatable: true,
            plot: true,
            ..Default::default()
        });
        let rect = button_rect(&widget, ButtonAction::Sweep(SweepMode::Linear));
        step(&mut widget, press(rect.center()));
        assert!(!widget.controller().is_engaged());
        step(&mut widget, release(rect.center()));
        assert!(widget.controller().is_sweeping());
        assert_eq!(widget.frequency(), 55.0);
        assert_eq!(widget.frames().len(), 1);

        step(&mut widget, idle());
        assert_eq!(widget.frequency(), 65.0);
        step(&mut widget, idle());
        assert_eq!(widget.frequency(), 75.0);
        let history: Vec<f32> = widget.plotter().history().iter().collect();
        assert_eq!(history, vec![220.0, 220.0, 55.0, 65.0, 75.0]);
    }

    #[test]
    fn waveform_spans_the_scope_panel() {
        let points = waveform_points(&[0.0, 1.0, -1.0], vec2(200.0, 100.0));
        let expected = [vec2(0.0, 50.0), vec2(100.0, 5.0), vec2(200.0, 95.0)];
        assert_eq!(points.len(), expected.len());
        for (point, want) in points.iter().zip(expected) {
            assert!(point.distance(want) < 1e-3, "{point} vs {want}");
        }
        assert!(waveform_points(&[], vec2(200.0, 100.0)).is_empty());
    }

    #[test]
    fn click_dragged_off_sweep_button_does_nothing() {
        let mut widget = widget(WidgetConfig {
            animatable: true,
            ..Default::default()
        });
        let rect = button_rect(&widget, ButtonAction::Sweep(SweepMode::Exponential));
        step(&mut widget, press(rect.center()));
        step(&mut widget, release(vec2(-10.0, -10.0)));
        assert!(!widget.controller().is_sweeping());
        assert!(widget.frames().is_empty());
    }

    #[test]
    fn pressing_slider_during_sweep_cancels_it() {
        let mut widget = widget(WidgetConfig {
            animatable: true,
            ..Default::default()
        });
        let button = button_rect(&widget, ButtonAction::Sweep(SweepMode::Linear));
        step(&mut widget, press(button.center()));
        step(&mut widget, release(button.center()));
        step(&mut widget, idle());
        let slider = slider_rect(&widget, SliderKind::Frequency);
        step(&mut widget, press(slider.center()));
        assert!(!widget.controller().is_sweeping());
        assert!(widget.frames().is_empty());
        assert_eq!(widget.controller().provider().live(), 1);
    }

    #[test]
    fn sweep_overshoot_keeps_slider_in_range() {
        let mut widget = widget(WidgetConfig {
            animatable: true,
            ..Default::default()
        });
        let button = button_rect(&widget, ButtonAction::Sweep(SweepMode::Linear));
        step(&mut widget, press(button.center()));
        step(&mut widget, release(button.center()));
        while widget.controller().is_sweeping() {
            step(&mut widget, idle());
        }
        assert!(widget.frequency() > 7_040.0);
        assert_eq!(widget.slider_position(SliderKind::Frequency), 1.0);
        assert_eq!(widget.controller().provider().live(), 0);
    }

    #[test]
    fn history_only_grows_when_plotting() {
        let mut quiet = widget(WidgetConfig::default());
        for _ in 0..10 {
            step(&mut quiet, idle());
        }
        assert_eq!(quiet.plotter().history().len(), 1);

        let mut plotting = widget(WidgetConfig {
            plot: true,
            ..Default::default()
        });
        for _ in 0..1_500 {
            step(&mut plotting, idle());
        }
        assert_eq!(plotting.plotter().history().len(), 1_000);
    }

    #[test]
    fn labels_follow_flags() {
        let both = widget(WidgetConfig {
            show_pitch_slider: true,
            ..Default::default()
        });
        assert_eq!(both.frequency_label().as_deref(), Some("220Hz"));
        assert_eq!(
            both.pitch_label(),
            Some(("55Hz * 2".to_string(), "2".to_string()))
        );

        let pitch_only = widget(WidgetConfig {
            show_pitch_slider: true,
            show_frequency_slider: false,
            ..Default::default()
        });
        assert_eq!(pitch_only.frequency_label(), None);
        assert!(pitch_only.pitch_label().is_some());
    }
}
