//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::game::SpeedBand;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct answer; the jingle scales with the speed band
    Correct(SpeedBand),
    /// Wrong answer
    Wrong,
    /// Zombie shambles one step closer
    ZombieStep,
    /// Zombie reaches the player
    ZombieAttack,
    /// Session won
    Victory,
    /// Menu/button click
    Click,
}

/// One note in a sequence: frequency, duration (s), waveform, relative volume
type Note = (f32, f64, OscillatorType, f32);

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.3,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Correct(band) => self.play_correct(ctx, vol, band),
            SoundEffect::Wrong => self.play_wrong(ctx, vol),
            SoundEffect::ZombieStep => self.play_zombie_step(ctx, vol),
            SoundEffect::ZombieAttack => self.play_zombie_attack(ctx, vol),
            SoundEffect::Victory => self.play_victory(ctx, vol),
            SoundEffect::Click => self.play_click(ctx, vol),
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

    /// Schedule a sequence of notes back to back, each with an exponential
    /// fade so note boundaries don't click
    fn play_notes(&self, ctx: &AudioContext, vol: f32, notes: &[Note]) {
        let mut t = ctx.current_time();
        for &(freq, duration, osc_type, note_vol) in notes {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                continue;
            };
            gain.gain().set_value_at_time(vol * note_vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + duration).ok();
            t += duration;
        }
    }

    /// Correct answer - ascending major-chord jingle; the faster the answer,
    /// the brighter and longer the run
    fn play_correct(&self, ctx: &AudioContext, vol: f32, band: SpeedBand) {
        use OscillatorType::Sine;
        match band {
            SpeedBand::Fast => self.play_notes(
                ctx,
                vol,
                &[
                    (523.25, 0.08, Sine, 0.8), // C5
                    (659.25, 0.08, Sine, 0.8), // E5
                    (783.99, 0.08, Sine, 0.8), // G5
                    (1046.50, 0.15, Sine, 1.0), // C6
                ],
            ),
            SpeedBand::Medium => self.play_notes(
                ctx,
                vol,
                &[
                    (523.25, 0.1, Sine, 0.7), // C5
                    (659.25, 0.1, Sine, 0.7), // E5
                    (783.99, 0.2, Sine, 0.8), // G5
                ],
            ),
            SpeedBand::Slow | SpeedBand::VerySlow => self.play_notes(
                ctx,
                vol,
                &[
                    (440.00, 0.15, Sine, 0.6), // A4
                    (523.25, 0.2, Sine, 0.7),  // C5
                ],
            ),
        }
    }

    /// Wrong answer - descending error tones
    fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
        use OscillatorType::Square;
        self.play_notes(
            ctx,
            vol,
            &[
                (392.00, 0.15, Square, 0.5), // G4
                (329.63, 0.15, Square, 0.5), // E4
                (261.63, 0.25, Square, 0.6), // C4
            ],
        );
    }

    /// Zombie steps closer - low ominous tone
    fn play_zombie_step(&self, ctx: &AudioContext, vol: f32) {
        use OscillatorType::Sawtooth;
        self.play_notes(
            ctx,
            vol,
            &[
                (110.00, 0.2, Sawtooth, 0.4), // A2
                (98.00, 0.15, Sawtooth, 0.3), // G2
            ],
        );
    }

    /// Zombie reaches the player - harsh descending growl
    fn play_zombie_attack(&self, ctx: &AudioContext, vol: f32) {
        use OscillatorType::Sawtooth;
        self.play_notes(
            ctx,
            vol,
            &[
                (82.41, 0.1, Sawtooth, 0.6), // E2
                (65.41, 0.15, Sawtooth, 0.7), // C2
                (55.00, 0.3, Sawtooth, 0.8),  // A1
                (41.20, 0.4, Sawtooth, 0.9),  // E1
            ],
        );
    }

    /// Session won - triumphant fanfare
    fn play_victory(&self, ctx: &AudioContext, vol: f32) {
        use OscillatorType::{Sine, Triangle};
        self.play_notes(
            ctx,
            vol,
            &[
                (523.25, 0.12, Sine, 0.7),     // C5
                (659.25, 0.12, Sine, 0.7),     // E5
                (783.99, 0.12, Sine, 0.8),     // G5
                (1046.50, 0.25, Sine, 0.9),    // C6
                (783.99, 0.1, Triangle, 0.6),  // G5
                (1046.50, 0.4, Triangle, 1.0), // C6
            ],
        );
    }

    /// Subtle UI click
    fn play_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.06).ok();
    }
}
