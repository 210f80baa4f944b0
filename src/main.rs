use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use macroquad::prelude::*;
use pitch_slider::{
    config::{Args, WidgetConfig},
    output::{AudioEngine, ScopeBuffer, SynthPipeline},
    scope::{SCOPE_WINDOW, Spectrum, compute_spectrum},
    tone::EngineProvider,
    widget::{
        BACKGROUND, CanvasSurface, PitchSlider, PointerInput, SCREEN_HEIGHT, SCREEN_WIDTH,
        draw_scope,
    },
};
use tokio::runtime::Runtime;

const SCOPE_DRAWN_SAMPLES: usize = 1_024;

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Pitch Slider".into(),
        fullscreen: false,
        sample_count: 4,
        window_width: SCREEN_WIDTH as i32,
        window_height: SCREEN_HEIGHT as i32,
        high_dpi: false,
        ..Default::default()
    }
}

async fn run() -> Result<()> {
    let config = WidgetConfig::from(Args::parse());
    config.validate().context("invalid configuration")?;

    let runtime = Runtime::new().context("tokio runtime")?;
    let pipeline = Arc::new(Mutex::new(SynthPipeline::new(config.volume)));
    let scope = Arc::new(Mutex::new(ScopeBuffer::new(SCOPE_WINDOW)));
    let _audio =
        AudioEngine::start(pipeline.clone(), scope.clone()).context("audio output stream")?;
    let sample_rate = pipeline
        .lock()
        .map(|synth| synth.sample_rate())
        .unwrap_or(44_100.0);

    info!(
        "range {}-{} Hz, initial {} Hz, {} waveform",
        config.range.min,
        config.range.max,
        config.initial,
        config.waveform.label()
    );
    let provider = EngineProvider::new(runtime.handle().clone(), pipeline.clone(), config.waveform);
    let mut widget = PitchSlider::new(config, provider);
    let mut canvas = widget.layout().canvas.map(CanvasSurface::new);
    let mut waveform_cache = Vec::new();
    let mut spectrum_cache = Spectrum::default();

    loop {
        clear_background(BACKGROUND);
        let input = PointerInput::poll();
        widget.update(&input, canvas.as_mut());
        widget.draw();

        if let Some(rect) = widget.layout().scope {
            let snapshot = scope
                .lock()
                .ok()
                .map(|guard| guard.snapshot())
                .unwrap_or_default();
            if !snapshot.is_empty() {
                spectrum_cache = compute_spectrum(&snapshot, sample_rate);
                let start = snapshot.len().saturating_sub(SCOPE_DRAWN_SAMPLES);
                waveform_cache = snapshot[start..].to_vec();
            }
            draw_scope(rect, &waveform_cache, &spectrum_cache);
        }

        if is_key_pressed(KeyCode::Escape) {
            info!("exiting");
            break;
        }
        next_frame().await;
    }
    Ok(())
}
