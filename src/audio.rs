//! Audio cues using Web Audio API
//!
//! Procedurally generated - no external files to load, so every cue is
//! ready as soon as the AudioContext exists.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::game::Cue;
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Voice of the last shoot cue, stopped before the next one starts
    shoot_voice: Option<OscillatorNode>,
    /// Suspended while the page is in the background; cues stay silent
    paused: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
            shoot_voice: None,
            paused: false,
        }
    }

    /// Resume audio context after `suspend`
    pub fn resume(&mut self) {
        self.paused = false;
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Silence output until `resume`; cues played meanwhile are dropped
    pub fn suspend(&mut self) {
        self.paused = true;
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    /// Play a cue from the start
    pub fn play(&mut self, cue: Cue) {
        let vol = self.volume;
        if vol <= 0.0 || self.paused {
            return;
        }

        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Shoot => self.play_shoot(&ctx, vol),
            Cue::Win => self.play_win(&ctx, vol),
            Cue::Loose => self.play_loose(&ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Shoot - short falling zap. Restarts rather than layering on rapid fire.
    fn play_shoot(&mut self, ctx: &AudioContext, vol: f32) {
        if let Some(previous) = self.shoot_voice.take() {
            previous.stop().ok();
        }

        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
        self.shoot_voice = Some(osc);
    }

    /// Win - rising fanfare
    fn play_win(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Loose - sad descending
    fn play_loose(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
