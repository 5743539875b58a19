/// Sound engine: procedural chiptune effects via rodio.
///
/// Effects are synthesized into sample buffers once at startup and replayed
/// fire-and-forget. Build without the "sound" feature to get the silent stub.

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_step: Vec<f32>,
        sfx_win: Vec<f32>,
        sfx_new_maze: Vec<f32>,
    }

    impl SoundEngine {
        /// `None` when no output device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "no audio output, running silent");
                    return None;
                }
            };
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_step: gen_step(),
                sfx_win: gen_win(),
                sfx_new_maze: gen_new_maze(),
            })
        }

        fn play(&self, samples: &[f32]) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
                sink.detach();
            }
        }

        pub fn play_step(&self) { self.play(&self.sfx_step); }
        pub fn play_win(&self) { self.play(&self.sfx_win); }
        pub fn play_new_maze(&self) { self.play(&self.sfx_new_maze); }
    }

    /// One note: sine plus a touch of 3rd harmonic, linear decay.
    fn tone(freq: f32, secs: f32, volume: f32, out: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - i as f32 / n as f32;
            let wave = (t * freq * TAU).sin() * 0.8 + (t * freq * 3.0 * TAU).sin() * 0.2;
            out.push(wave * env * volume);
        }
    }

    /// Footstep: very short, quiet tick.
    fn gen_step() -> Vec<f32> {
        let mut s = Vec::new();
        tone(880.0, 0.025, 0.12, &mut s);
        s
    }

    /// Goal reached: C5 E5 G5 C6 then a held C6.
    fn gen_win() -> Vec<f32> {
        let mut s = Vec::new();
        for freq in [523.0, 659.0, 784.0, 1047.0] {
            tone(freq, 0.1, 0.3, &mut s);
        }
        tone(1047.0, 0.3, 0.3, &mut s);
        s
    }

    /// Fresh maze: two rising notes.
    fn gen_new_maze() -> Vec<f32> {
        let mut s = Vec::new();
        tone(392.0, 0.06, 0.2, &mut s);
        tone(587.0, 0.09, 0.2, &mut s);
        s
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn buffers_are_bounded_and_non_empty() {
            for buf in [gen_step(), gen_win(), gen_new_maze()] {
                assert!(!buf.is_empty());
                assert!(buf.iter().all(|s| s.abs() <= 1.0));
            }
        }
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_step(&self) {}
    pub fn play_win(&self) {}
    pub fn play_new_maze(&self) {}
}
