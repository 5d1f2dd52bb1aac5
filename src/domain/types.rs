// ==========================================
// PipeTrak Progress Engine - domain type definitions
// ==========================================
// Serialization format: SCREAMING_SNAKE_CASE (matches database storage)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// ComponentType - trackable component discriminator
// ==========================================
// Milestone templates are defined per component type; the weight rule for
// THREADED_PIPE additionally scales by linear footage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    Spool,        // fabricated pipe spool
    FieldWeld,    // field weld joint
    Valve,        // valve
    Fitting,      // fitting (elbow, tee, reducer, ...)
    ThreadedPipe, // threaded pipe, tracked by linear footage
    Instrument,   // instrument / accessory, typically size-less
    Support,      // pipe support
}

impl ComponentType {
    /// All known component types, in template display order
    pub fn all() -> &'static [ComponentType] {
        &[
            ComponentType::Spool,
            ComponentType::FieldWeld,
            ComponentType::Valve,
            ComponentType::Fitting,
            ComponentType::ThreadedPipe,
            ComponentType::Instrument,
            ComponentType::Support,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Spool => "SPOOL",
            ComponentType::FieldWeld => "FIELD_WELD",
            ComponentType::Valve => "VALVE",
            ComponentType::Fitting => "FITTING",
            ComponentType::ThreadedPipe => "THREADED_PIPE",
            ComponentType::Instrument => "INSTRUMENT",
            ComponentType::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SPOOL" => Ok(ComponentType::Spool),
            "FIELD_WELD" => Ok(ComponentType::FieldWeld),
            "VALVE" => Ok(ComponentType::Valve),
            "FITTING" => Ok(ComponentType::Fitting),
            "THREADED_PIPE" => Ok(ComponentType::ThreadedPipe),
            "INSTRUMENT" => Ok(ComponentType::Instrument),
            "SUPPORT" => Ok(ComponentType::Support),
            other => Err(format!("unknown component type: {}", other)),
        }
    }
}

// ==========================================
// GroupDimension - progress roll-up dimension
// ==========================================
// Closed enum mapped to a component column. Adding a dimension is one new
// variant; the aggregation query itself never changes (no per-dimension
// materialized tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDimension {
    Area,
    System,
    TestPackage,
    Drawing,
    Welder,
}

impl GroupDimension {
    /// Column on the component table holding this dimension's key
    pub fn column(&self) -> &'static str {
        match self {
            GroupDimension::Area => "area",
            GroupDimension::System => "system_code",
            GroupDimension::TestPackage => "test_package",
            GroupDimension::Drawing => "drawing",
            GroupDimension::Welder => "welder",
        }
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupDimension::Area => "AREA",
            GroupDimension::System => "SYSTEM",
            GroupDimension::TestPackage => "TEST_PACKAGE",
            GroupDimension::Drawing => "DRAWING",
            GroupDimension::Welder => "WELDER",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for GroupDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AREA" => Ok(GroupDimension::Area),
            "SYSTEM" => Ok(GroupDimension::System),
            "TEST_PACKAGE" => Ok(GroupDimension::TestPackage),
            "DRAWING" => Ok(GroupDimension::Drawing),
            "WELDER" => Ok(GroupDimension::Welder),
            other => Err(format!("unknown grouping dimension: {}", other)),
        }
    }
}
