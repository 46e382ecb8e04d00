//! Decaying peak meters for input and output level display.

/// Weight kept from the previous level each block.
pub const METER_DECAY: f32 = 0.95;

/// Weight given to the new block peak.
pub const METER_ATTACK: f32 = 0.05;

/// Decaying block-peak estimate.
///
/// Updated once per block with the block's largest absolute sample:
///
/// ```text
/// level = level × 0.95 + peak × 0.05
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelMeter {
    level: f32,
}

impl LevelMeter {
    /// Meter resting at zero.
    pub const fn new() -> Self {
        Self { level: 0.0 }
    }

    /// Fold one block peak into the level and return the new level.
    #[inline]
    pub fn update(&mut self, block_peak: f32) -> f32 {
        self.level = self.level * METER_DECAY + block_peak * METER_ATTACK;
        self.level
    }

    /// Current level.
    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Drop back to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// Running peak of one block, fed per sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockPeak(f32);

impl BlockPeak {
    /// Track `|sample|`.
    #[inline]
    pub fn track(&mut self, sample: f32) {
        let a = sample.abs();
        if a > self.0 {
            self.0 = a;
        }
    }

    /// Largest magnitude seen.
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

/// Input and output meters of one filter instance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelMeters {
    /// Conditioned input (after AGR and drive).
    pub input: LevelMeter,
    /// Filter output.
    pub output: LevelMeter,
}

impl LevelMeters {
    /// Both meters at zero.
    pub const fn new() -> Self {
        Self {
            input: LevelMeter::new(),
            output: LevelMeter::new(),
        }
    }

    /// Fold one block's input and output peaks.
    pub fn update(&mut self, input_peak: BlockPeak, output_peak: BlockPeak) {
        self.input.update(input_peak.get());
        self.output.update(output_peak.get());
    }

    /// Reset both meters.
    pub fn reset(&mut self) {
        self.input.reset();
        self.output.reset();
    }
}
