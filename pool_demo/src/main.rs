//! Playback Pool Demo
//!
//! Drives a playback pool from a 60 Hz frame loop:
//! - background music requested twice (the second request reuses the slot)
//! - a short ambience loop that runs out on its own
//! - a blip effect every second
//! - the theme stopped with a fade, then swept
//!
//! Usage: `pool_demo [config.toml|config.ron]`
//! Build with `--features rodio` to hear it through the default device.

use audio_pool::audio::{AudioBackend, AudioClip, AudioError, PlaybackPool};
use audio_pool::config::{Config, PoolConfig};
use audio_pool::foundation::{logging, time::FrameClock};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f32::consts::PI;
use std::io::Cursor;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);
const DEMO_SECONDS: f32 = 6.0;
const SAMPLE_RATE: u32 = 22_050;

// Timeline (seconds since start)
const AMBIENCE_AT: f32 = 0.5;
const REPEAT_THEME_AT: f32 = 2.0;
const FADE_THEME_AT: f32 = 3.0;
const THEME_FADE_SECS: f32 = 1.5;

struct DemoClips {
    theme: AudioClip,
    ambience: AudioClip,
    blip: AudioClip,
}

/// Render a mono sine tone as an in-memory WAV clip
fn tone(
    name: &str,
    frequency_hz: f32,
    seconds: f32,
    amplitude: f32,
) -> Result<AudioClip, Box<dyn std::error::Error>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)?;
        let total_samples = (SAMPLE_RATE as f32 * seconds) as u32;
        let peak = amplitude.clamp(0.0, 1.0) * f32::from(i16::MAX);

        for index in 0..total_samples {
            let t = index as f32 / SAMPLE_RATE as f32;
            writer.write_sample(((2.0 * PI * frequency_hz * t).sin() * peak) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(AudioClip::from_bytes(name, &bytes)?.with_duration(seconds))
}

fn crossed(before: f32, after: f32, mark: f32) -> bool {
    before < mark && after >= mark
}

fn run<B: AudioBackend>(pool: &mut PlaybackPool<B>, clips: &DemoClips) -> Result<(), AudioError> {
    let theme = pool.play_background_music(&clips.theme)?;
    log::info!("Theme playing in slot {:?}", theme);

    let mut clock = FrameClock::new();
    let mut before = 0.0;

    while clock.total_time() < DEMO_SECONDS {
        std::thread::sleep(clock.remaining_in_frame(FRAME));
        let delta_time = clock.tick();
        let now = clock.total_time();

        if crossed(before, now, AMBIENCE_AT) {
            pool.play_background_music(&clips.ambience)?;
        }

        if crossed(before, now, REPEAT_THEME_AT) {
            let again = pool.play_background_music(&clips.theme)?;
            log::info!("Theme requested again: same slot = {}", again == theme);
        }

        if crossed(before, now, FADE_THEME_AT) {
            log::info!("Fading theme out over {THEME_FADE_SECS}s");
            pool.stop(theme, THEME_FADE_SECS)?;
        }

        if before.floor() < now.floor() {
            pool.play_effect(&clips.blip)?;

            let labels: Vec<&str> = pool.music_slots().map(|(_, slot)| slot.label()).collect();
            log::info!(
                "t={:.1}s music slots {:?}, {} active / {} owned",
                now,
                labels,
                pool.active_count(),
                pool.slot_count()
            );
        }

        pool.update(delta_time);
        before = now;
    }

    pool.stop_all(0.0);
    pool.update(0.0);
    log::info!("Demo finished, {} slot(s) reclaimed on final sweep", pool.sweep());
    Ok(())
}

fn load_config() -> Result<PoolConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading pool config from {path}");
            Ok(PoolConfig::load_from_file(&path)?)
        }
        None => Ok(PoolConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = load_config()?;
    let clips = DemoClips {
        theme: tone("theme", 220.0, 10.0, 0.3)?,
        ambience: tone("ambience", 110.0, 1.5, 0.2)?,
        blip: tone("blip", 880.0, 0.1, 0.4)?,
    };

    #[cfg(feature = "rodio")]
    let mut backend = audio_pool::audio::backend::RodioBackend::new();
    #[cfg(not(feature = "rodio"))]
    let mut backend = audio_pool::audio::backend::HeadlessBackend::new();

    backend.initialize(&config.backend)?;
    let mut pool = PlaybackPool::new(&config, backend);
    run(&mut pool, &clips)?;

    pool.backend_mut().shutdown();
    Ok(())
}
