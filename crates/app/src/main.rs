//! Dimensia - drifting particle field with desktop and immersive XR modes.
//!
//! Runs headless: a scripted session drives the frame loop the browser would
//! otherwise drive, switching into and out of VR on the configured frames.

mod camera;
mod config;
mod demo;
mod hands;
mod state;
mod teleport;

use anyhow::{Context, Result};
use engine_core::Time;
use input::{InputState, XrInput};
use particles::SpriteTexture;
use std::time::Duration;

use config::AppConfig;
use demo::DemoScript;
use state::{AppContext, AppMode};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Dimensia");

    let config = AppConfig::load().context("Failed to load config.ron")?;
    let session = config.session.clone();
    let mut ctx = AppContext::new(config)?;

    // Uploaded once by a renderer; every point field shares it.
    let sprite = SpriteTexture::default();
    let style = ctx.particles().config().style;
    log::info!(
        "Point sprite {}x{} ({} bytes), tint {:?}, size {}..{}",
        sprite.size,
        sprite.size,
        sprite.as_bytes().len(),
        style.rgb(),
        style.min_size,
        style.max_size
    );

    let mut script = DemoScript::new(session.seed);
    let mut input = InputState::new();
    let mut time = Time::new();
    let mut vr_frames = 0u64;
    let mut teleports = 0usize;

    let fixed_dt = session.fixed_dt.and_then(|dt| match Duration::try_from_secs_f32(dt) {
        Ok(step) => Some(step),
        Err(e) => {
            log::warn!("Ignoring invalid fixed_dt {dt} ({e}), using the wall clock");
            None
        }
    });

    for frame in 0..session.frames {
        if session.enter_vr_at_frame == Some(frame) {
            ctx.enter_vr()?;
            vr_frames = 0;
        }
        if session.exit_vr_at_frame == Some(frame) {
            ctx.exit_vr()?;
        }

        match fixed_dt {
            Some(dt) => time.tick(dt),
            None => time.update(),
        }
        let dt = time.delta_seconds();

        let xr = match ctx.mode() {
            AppMode::Desktop => {
                script.desktop_input(frame, &mut input);
                XrInput::default()
            }
            AppMode::ImmersiveVr => {
                vr_frames += 1;
                script.xr_input(vr_frames - 1)
            }
        };

        let rig_before = ctx.rig().position();
        ctx.frame(&input, &xr, dt);
        if ctx.mode() == AppMode::ImmersiveVr && ctx.rig().position() != rig_before {
            teleports += 1;
        }

        if ctx.particles_mut().take_dirty() {
            // A renderer would upload `position_bytes()` here.
            log::trace!(
                "Frame {}: {} bytes of positions, {} wave points, {} hand pieces",
                frame,
                ctx.particles().position_bytes().len(),
                ctx.wave().map_or(0, |wave| wave.len()),
                ctx.hands().instances().len()
            );
        }

        if time.frame_count() % 120 == 0 {
            log::debug!(
                "Frame {} ({:?}): {:.1} fps, rig at {:.2}",
                time.frame_count(),
                ctx.mode(),
                time.fps(),
                ctx.rig().position()
            );
        }
    }

    log::info!(
        "Session finished: {} frames, {:.1}s simulated ({:.1}s scene time), {} teleports, rig at {:.2}",
        time.frame_count(),
        time.elapsed().as_secs_f32(),
        ctx.elapsed(),
        teleports,
        ctx.rig().position()
    );

    Ok(())
}
