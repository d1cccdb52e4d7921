/// Sound engine: procedural chip-style cues via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// The cues the game can play.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Intro,
    Wakka,
    EatGhost,
    Death,
}

/// Which cue, if any, an event triggers.
/// Every accepted direction press chomps, whether or not the player moved.
pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::IntroStarted => Some(Cue::Intro),
        GameEvent::PlayerMoved { .. } | GameEvent::PlayerBlocked => Some(Cue::Wakka),
        GameEvent::GhostEaten { .. } => Some(Cue::EatGhost),
        GameEvent::PlayerKilled { .. } => Some(Cue::Death),
        _ => None,
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Cue;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = 2.0 * std::f32::consts::PI;

    /// Pre-generated WAV buffers for each cue.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_intro: Arc<Vec<u8>>,
        sfx_wakka: Arc<Vec<u8>>,
        sfx_eat_ghost: Arc<Vec<u8>>,
        sfx_death: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_intro: Arc::new(make_wav(&gen_intro())),
                sfx_wakka: Arc::new(make_wav(&gen_wakka())),
                sfx_eat_ghost: Arc::new(make_wav(&gen_eat_ghost())),
                sfx_death: Arc::new(make_wav(&gen_death())),
            })
        }

        pub fn play(&self, cue: Cue) {
            let buf = match cue {
                Cue::Intro => &self.sfx_intro,
                Cue::Wakka => &self.sfx_wakka,
                Cue::EatGhost => &self.sfx_eat_ghost,
                Cue::Death => &self.sfx_death,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Square-ish tone: sine plus a third harmonic.
    fn push_note(samples: &mut Vec<f32>, freq: f32, dur: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * 0.4;
            let wave = if freq > 0.0 {
                (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3
            } else {
                0.0
            };
            samples.push(wave * env * volume);
        }
    }

    /// Intro jingle: a bouncing arpeggio, run twice, just under the intro delay.
    fn gen_intro() -> Vec<f32> {
        // B4 B5 F#5 D#5, B5 F#5 D#5; then the same a semitone up
        let phrase_a = [494.0_f32, 988.0, 740.0, 622.0, 988.0, 740.0, 622.0];
        let phrase_b = [523.0_f32, 1047.0, 784.0, 659.0, 1047.0, 784.0, 659.0];
        let note_dur = 0.11;
        let mut samples = Vec::new();
        for _ in 0..2 {
            for phrase in [&phrase_a, &phrase_b] {
                for &freq in phrase.iter() {
                    push_note(&mut samples, freq, note_dur, 0.22);
                }
                push_note(&mut samples, 0.0, note_dur, 0.0);
            }
        }
        // Closing climb
        for &freq in &[622.0_f32, 659.0, 698.0, 740.0, 784.0, 831.0, 880.0, 988.0] {
            push_note(&mut samples, freq, 0.07, 0.22);
        }
        samples
    }

    /// Wakka: one short down-up pitch sweep.
    fn gen_wakka() -> Vec<f32> {
        let duration = 0.09;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 250.0 + (2.0 * t - 1.0).abs() * 250.0; // 500 → 250 → 500
                phase += freq / SAMPLE_RATE as f32;
                let tri = 4.0 * (phase - (phase + 0.5).floor()).abs() - 1.0;
                tri * 0.2
            })
            .collect()
    }

    /// Eating a ghost: fast upward chirp.
    fn gen_eat_ghost() -> Vec<f32> {
        let duration = 0.18;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 200.0 + t * t * 1600.0;
                phase += freq / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.5);
                (phase * TAU).sin() * env * 0.3
            })
            .collect()
    }

    /// Death: descending wobble ending in two blips.
    fn gen_death() -> Vec<f32> {
        let mut samples = Vec::new();
        let mut phase = 0.0_f32;
        for step in 0..10 {
            let top = 800.0 - step as f32 * 60.0;
            let n = (SAMPLE_RATE as f32 * 0.1) as usize;
            for i in 0..n {
                let t = i as f32 / n as f32;
                let freq = top - t * 200.0;
                phase += freq / SAMPLE_RATE as f32;
                samples.push((phase * TAU).sin() * 0.25);
            }
        }
        for _ in 0..2 {
            push_note(&mut samples, 0.0, 0.05, 0.0);
            push_note(&mut samples, 200.0, 0.08, 0.3);
        }
        // Final fade
        let fade_len = samples.len() / 6;
        let total = samples.len();
        for (k, s) in samples[total - fade_len..].iter_mut().enumerate() {
            *s *= 1.0 - k as f32 / fade_len as f32;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}
