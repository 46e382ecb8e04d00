//! Parameter introspection for hosts, presets and the command line.
//!
//! [`ParameterInfo`] lists an effect's controls by index. Each control is
//! described by a [`ParamDescriptor`] in engineering units: Hz for cutoff,
//! percent for depths and levels, step indices for the selectors. The
//! command line uses it to print the parameter table and to resolve
//! `name=value` overrides; hosts use [`ParamDescriptor::normalize`] to place
//! a value on a 0..1 control.
//!
//! ```rust
//! use tangents_core::{ParamDescriptor, ParamId, ParameterInfo};
//!
//! struct Trim {
//!     percent: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         (index == 0).then(|| {
//!             ParamDescriptor::percent("Trim", "Trim", 0.0, 100.0, 50.0)
//!                 .with_id(ParamId(1), "trim")
//!         })
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.percent } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.percent = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut trim = Trim { percent: 50.0 };
//! trim.set_param(0, 180.0);
//! assert_eq!(trim.get_param(0), 100.0);
//! ```

/// Mapping between a plain value and a 0..1 control position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Evenly spaced.
    #[default]
    Linear,
    /// Evenly spaced in ratio; the range must be positive.
    Logarithmic,
}

/// Numeric parameter identifier, fixed for the life of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Capability bits of a parameter.
///
/// ```rust
/// use tangents_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// Nothing set.
    pub const NONE: Self = Self(0);
    /// The host may automate it.
    pub const AUTOMATABLE: Self = Self(1);
    /// Takes whole-number steps only.
    pub const STEPPED: Self = Self(1 << 1);

    /// All of `other`'s bits are set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits of both.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Effects whose controls can be listed and addressed by index.
///
/// Indices run from zero to `param_count() - 1` and never change for an
/// instance. Values are in engineering units. Setting clamps; unknown
/// indices are ignored on set and read back as `0.0`.
pub trait ParameterInfo {
    /// Number of controls.
    fn param_count(&self) -> usize;

    /// Descriptor of control `index`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of control `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Set control `index`.
    fn set_param(&mut self, index: usize, value: f32);

    /// Index of the control whose name, short name or string ID equals
    /// `name`, ignoring ASCII case.
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                [d.name, d.short_name, d.string_id]
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(name))
            })
        })
    }

    /// Index of the control carrying `id`.
    fn find_param_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Description of one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name, e.g. "CV Cut Amt".
    pub name: &'static str,
    /// Name for narrow displays.
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Power-on value.
    pub default: f32,
    /// Encoder increment.
    pub step: f32,
    /// `ParamId(0)` until [`with_id`](Self::with_id) assigns one.
    pub id: ParamId,
    /// Key used in preset files and on the command line, e.g. `"cutoff_hz"`.
    pub string_id: &'static str,
    /// Mapping onto a 0..1 control.
    pub scale: ParamScale,
    /// Capability bits.
    pub flags: ParamFlags,
    /// Page the control sits on: `"filter"`, `"input"` or `"cv"`.
    pub group: &'static str,
    /// One name per step of a selector. Empty for continuous controls.
    pub step_labels: &'static [&'static str],
}

impl ParamDescriptor {
    #[allow(clippy::too_many_arguments)]
    const fn base(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        (min, max, default): (f32, f32, f32),
        step: f32,
        scale: ParamScale,
        flags: ParamFlags,
        step_labels: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step,
            id: ParamId(0),
            string_id: "",
            scale,
            flags,
            group: "",
            step_labels,
        }
    }

    /// Percentage in `min..=max` with a 0.1 step.
    pub const fn percent(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamUnit::Percent,
            (min, max, default),
            0.1,
            ParamScale::Linear,
            ParamFlags::AUTOMATABLE,
            &[],
        )
    }

    /// Frequency in Hz on a logarithmic control.
    pub const fn frequency_hz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::base(
            name,
            short_name,
            ParamUnit::Hertz,
            (min, max, default),
            1.0,
            ParamScale::Logarithmic,
            ParamFlags::AUTOMATABLE,
            &[],
        )
    }

    /// Selector whose value is an index into `labels`.
    pub const fn selector(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default: usize,
    ) -> Self {
        let max = labels.len().saturating_sub(1);
        Self::base(
            name,
            short_name,
            ParamUnit::None,
            (0.0, max as f32, default as f32),
            1.0,
            ParamScale::Linear,
            ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            labels,
        )
    }

    /// Assign the numeric and textual IDs.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Place the control on a page.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Whether the control is a selector.
    pub fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Label of the step nearest `value`.
    pub fn step_label(&self, value: f32) -> Option<&'static str> {
        if value.is_nan() || value < 0.0 {
            return None;
        }
        self.step_labels.get(libm::roundf(value) as usize).copied()
    }

    /// Step whose label equals `label`, ignoring ASCII case.
    pub fn step_index(&self, label: &str) -> Option<usize> {
        self.step_labels
            .iter()
            .position(|l| l.eq_ignore_ascii_case(label))
    }

    /// Limit `value` to the range; NaN becomes the default.
    ///
    /// ```rust
    /// use tangents_core::ParamDescriptor;
    ///
    /// let drive = ParamDescriptor::percent("Drive", "Drive", 0.0, 100.0, 0.0);
    /// assert_eq!(drive.clamp(140.0), 100.0);
    /// assert_eq!(drive.clamp(f32::NAN), 0.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Position of `value` on a 0..1 control.
    pub fn normalize(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        if self.max <= self.min {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / (self.max - self.min),
            ParamScale::Logarithmic if self.min > 0.0 => {
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
            ParamScale::Logarithmic => 0.0,
        }
    }

    /// Value at `position` on a 0..1 control.
    ///
    /// ```rust
    /// use tangents_core::ParamDescriptor;
    ///
    /// let cutoff = ParamDescriptor::frequency_hz("Cutoff", "Cutoff", 20.0, 20000.0, 1000.0);
    /// assert!((cutoff.denormalize(0.5) - 632.456).abs() < 0.01);
    /// ```
    pub fn denormalize(&self, position: f32) -> f32 {
        let t = position.clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Logarithmic if self.min > 0.0 => {
                self.min * libm::powf(self.max / self.min, t)
            }
            _ => self.min + t * (self.max - self.min),
        }
    }
}

/// Display unit of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz.
    Hertz,
    /// Percent.
    Percent,
    /// No unit; selectors and plain numbers.
    None,
}

impl ParamUnit {
    /// Text appended to a value.
    ///
    /// ```rust
    /// use tangents_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &[&str] = &["Soft", "Hard"];

    struct Shaper {
        level: f32,
        shape: f32,
    }

    impl ParameterInfo for Shaper {
        fn param_count(&self) -> usize {
            2
        }

        fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
            match index {
                0 => Some(
                    ParamDescriptor::percent("Level", "Lvl", 0.0, 100.0, 50.0)
                        .with_id(ParamId(10), "shaper_level"),
                ),
                1 => Some(
                    ParamDescriptor::selector("Shape", "Shape", SHAPES, 0)
                        .with_id(ParamId(11), "shaper_shape"),
                ),
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            match index {
                0 => self.level,
                1 => self.shape,
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let Some(desc) = self.param_info(index) else {
                return;
            };
            let value = desc.clamp(value);
            match index {
                0 => self.level = value,
                1 => self.shape = value,
                _ => {}
            }
        }
    }

    fn shaper() -> Shaper {
        Shaper {
            level: 50.0,
            shape: 0.0,
        }
    }

    #[test]
    fn lookup_by_name_short_name_and_key() {
        let s = shaper();
        assert_eq!(s.find_param_by_name("level"), Some(0));
        assert_eq!(s.find_param_by_name("LVL"), Some(0));
        assert_eq!(s.find_param_by_name("shaper_shape"), Some(1));
        assert_eq!(s.find_param_by_name("missing"), None);
        assert_eq!(s.find_param_by_id(ParamId(11)), Some(1));
        assert_eq!(s.find_param_by_id(ParamId(99)), None);
    }

    #[test]
    fn set_clamps_and_ignores_unknown() {
        let mut s = shaper();
        s.set_param(0, 150.0);
        assert_eq!(s.get_param(0), 100.0);
        s.set_param(1, f32::NAN);
        assert_eq!(s.get_param(1), 0.0);
        s.set_param(7, 1.0);
        assert_eq!(s.get_param(7), 0.0);
    }

    #[test]
    fn selector_steps() {
        let d = ParamDescriptor::selector("Mode", "Mode", &["LP", "BP", "HP", "AP"], 0);
        assert!(d.is_stepped());
        assert_eq!(d.unit, ParamUnit::None);
        assert_eq!(d.max, 3.0);
        assert_eq!(d.step_label(2.0), Some("HP"));
        assert_eq!(d.step_label(9.0), None);
        assert_eq!(d.step_label(f32::NAN), None);
        assert_eq!(d.step_index("ap"), Some(3));
    }

    #[test]
    fn percent_is_linear_and_continuous() {
        let d = ParamDescriptor::percent("Drive", "Drive", 0.0, 100.0, 0.0);
        assert!(d.flags.contains(ParamFlags::AUTOMATABLE));
        assert!(!d.is_stepped());
        assert!((d.normalize(25.0) - 0.25).abs() < 1e-6);
        assert!((d.denormalize(0.75) - 75.0).abs() < 1e-4);
        assert_eq!(d.normalize(400.0), 1.0);
    }

    #[test]
    fn frequency_control_is_logarithmic() {
        let d = ParamDescriptor::frequency_hz("Cutoff", "Cutoff", 20.0, 20000.0, 1000.0);
        assert!(d.normalize(20.0).abs() < 1e-6);
        assert!((d.normalize(20000.0) - 1.0).abs() < 1e-6);
        for hz in [20.0, 100.0, 1000.0, 8000.0] {
            let back = d.denormalize(d.normalize(hz));
            assert!((back - hz).abs() / hz < 1e-4, "{hz} -> {back}");
        }
    }
}
