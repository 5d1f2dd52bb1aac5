// ==========================================
// PipeTrak Progress Engine - relative-effort weight calculator
// ==========================================
// Responsibility: convert a parsed size (plus component type and optional
// linear footage) into a dimensionless relative-effort weight. Stateless,
// pure, never errors; output is always finite and >= 0.
// ==========================================
// Scaling: diameter ^ 1.5. Linear scaling underestimates the fit-up and
// welding effort of large-bore pipe; quadratic (cross-section) overestimates
// it. 1.5 is the field-calibrated compromise: a 4" component carries about
// 2.83x the weight of a 2" one. The exponent is configuration, not hard
// fact - it can be re-pinned via config_kv once real calibration data lands.
// ==========================================

use crate::domain::component::ParsedSize;
use crate::domain::types::ComponentType;
use serde::{Deserialize, Serialize};

// ==========================================
// WeightConfig - tunable weight constants
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Non-linear diameter scaling exponent
    pub exponent: f64,
    /// Fixed weight for size-less items (instruments, accessories).
    /// Deliberately below a 1" pipe's weight of 1.0.
    pub no_size_weight: f64,
    /// Per-foot factor for threaded pipe
    pub threaded_linear_factor: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            exponent: 1.5,
            no_size_weight: 0.5,
            threaded_linear_factor: 0.1,
        }
    }
}

// ==========================================
// WeightCalculator - stateless weight engine
// ==========================================
pub struct WeightCalculator {
    config: WeightConfig,
}

impl WeightCalculator {
    pub fn new(config: WeightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WeightConfig {
        &self.config
    }

    /// Relative-effort weight for one component
    ///
    /// Rules, first match wins:
    /// 1. size-less (NoSize / Unparseable) -> fixed fallback weight
    /// 2. reducer -> average of both diameters, then exponent
    /// 3. threaded pipe with positive linear footage -> diameter^e * feet * factor
    /// 4. standard -> diameter^e
    ///
    /// Zero or negative footage is treated as missing footage: the literal
    /// footage product would zero the component out of the distribution, so
    /// it degrades to the standard rule instead (rule 4).
    pub fn weight(
        &self,
        size: &ParsedSize,
        component_type: ComponentType,
        linear_feet: Option<f64>,
    ) -> f64 {
        let raw = match size {
            ParsedSize::NoSize | ParsedSize::Unparseable { .. } => self.config.no_size_weight,
            ParsedSize::Reducer { first, second } => {
                let avg = (first + second) / 2.0;
                avg.powf(self.config.exponent)
            }
            ParsedSize::Diameter { inches } => {
                let base = inches.powf(self.config.exponent);
                match (component_type, linear_feet) {
                    (ComponentType::ThreadedPipe, Some(feet)) if feet > 0.0 => {
                        base * feet * self.config.threaded_linear_factor
                    }
                    _ => base,
                }
            }
        };

        // Weights feed a division; keep them finite and non-negative no
        // matter what the configuration says.
        if raw.is_finite() && raw > 0.0 {
            raw
        } else {
            0.0
        }
    }
}

impl Default for WeightCalculator {
    fn default() -> Self {
        Self::new(WeightConfig::default())
    }
}
