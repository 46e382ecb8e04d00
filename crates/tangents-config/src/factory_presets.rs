//! Factory presets bundled with the library.
//!
//! Built-in presets that are always available without external files. They
//! cover the main characters of the filter and serve as starting points.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["init", "acid", "self-osc", "fold", "lofi-random"];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("acid", ACID_PRESET),
    ("self-osc", SELF_OSC_PRESET),
    ("fold", FOLD_PRESET),
    ("lofi-random", LOFI_RANDOM_PRESET),
];

/// Power-on settings.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Power-on settings - 1 kHz lowpass, no resonance"
sample_rate = 48000

[filter]
cutoff_hz = 1000.0
resonance = 0.0
mode = "lowpass"
model = "yu"
oversample = 2
cv_cutoff_amount = 100.0
cv_resonance_amount = 100.0
agr = 50.0
drive = 0.0
"#;

const ACID_PRESET: &str = r#"
name = "Acid"
description = "Squelchy diode bandpass for basslines"
sample_rate = 48000

[filter]
cutoff_hz = 800.0
resonance = 85.0
mode = "bandpass"
model = "ms"
oversample = 4
cv_cutoff_amount = 100.0
cv_resonance_amount = 50.0
agr = 60.0
drive = 30.0
"#;

const SELF_OSC_PRESET: &str = r#"
name = "Self-Osc"
description = "Maximum resonance lowpass that rings on any excitation"
sample_rate = 48000

[filter]
cutoff_hz = 440.0
resonance = 100.0
mode = "lowpass"
model = "yu"
oversample = 8
cv_cutoff_amount = 100.0
cv_resonance_amount = 0.0
agr = 50.0
drive = 0.0
"#;

const FOLD_PRESET: &str = r#"
name = "Fold"
description = "Hot input into the folding XX model"
sample_rate = 48000

[filter]
cutoff_hz = 1200.0
resonance = 40.0
mode = "lowpass"
model = "xx"
oversample = 16
cv_cutoff_amount = 100.0
cv_resonance_amount = 100.0
agr = 80.0
drive = 80.0
"#;

const LOFI_RANDOM_PRESET: &str = r#"
name = "Lofi Random"
description = "Randomized input gain through an unoversampled all-pass"
sample_rate = 48000

[filter]
cutoff_hz = 2500.0
resonance = 30.0
mode = "allpass"
model = "ms"
oversample = 1
cv_cutoff_amount = 100.0
cv_resonance_amount = 100.0
agr = 10.0
drive = 20.0
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use tangents_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {:?}", preset.name, preset.description);
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by internal or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use tangents_config::get_factory_preset;
///
/// let acid = get_factory_preset("acid").unwrap();
/// assert_eq!(acid.name, "Acid");
/// assert!(get_factory_preset("Self-Osc").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if preset_name.to_lowercase() == name_lower {
            return Preset::from_toml(toml).ok();
        }
    }

    // Also try matching against the preset's display name
    factory_presets()
        .into_iter()
        .find(|p| p.name.to_lowercase() == name_lower)
}

/// Get the internal names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset (case-insensitive).
///
/// # Example
///
/// ```rust
/// use tangents_config::is_factory_preset;
///
/// assert!(is_factory_preset("fold"));
/// assert!(is_factory_preset("Lofi Random"));
/// assert!(!is_factory_preset("my_custom_preset"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
