use serde::{Serialize, Deserialize};

pub const CM_PER_INCH: f64 = 2.54;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum UnitSystem {
    #[default]
    #[serde(rename = "cm", alias = "CM", alias = "centimeters")]
    Cm,
    #[serde(rename = "in", alias = "IN", alias = "inch", alias = "inches")]
    In,
}

impl UnitSystem {
    /// Converts a centimetre constant into this unit system.
    pub fn from_cm(self, cm: f64) -> f64 {
        match self {
            UnitSystem::Cm => cm,
            UnitSystem::In => cm / CM_PER_INCH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Cm => "cm",
            UnitSystem::In => "in",
        }
    }

    pub fn parse(s: &str) -> Option<UnitSystem> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" | "centimeters" => Some(UnitSystem::Cm),
            "in" | "inch" | "inches" => Some(UnitSystem::In),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct MeasurementSet {
    #[serde(alias = "unit")]
    pub units: UnitSystem,
    pub height: Option<f64>,
    pub shoulder_width: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hip: Option<f64>,
    pub arm_length: Option<f64>,
    pub leg_length: Option<f64>,
    pub thigh: Option<f64>,
    pub calf: Option<f64>,
    pub neck: Option<f64>,
}

impl MeasurementSet {
    pub fn new(units: UnitSystem) -> Self {
        Self { units, ..Default::default() }
    }

    /// A value is usable only when it is finite and strictly positive.
    pub fn accepted(value: Option<f64>) -> Option<f64> {
        value.filter(|v| v.is_finite() && *v > 0.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub orthographic: bool, // carried through, never consumed
}

impl Viewport {
    pub const DEFAULT_WIDTH: f64 = 800.0;
    pub const DEFAULT_HEIGHT: f64 = 1100.0;
    /// Largest accepted dimension; bigger sizes are capped to it.
    pub const MAX_DIMENSION: f64 = 1.0e7;

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, orthographic: true }
    }

    /// Replaces unusable dimensions with the defaults and caps oversized ones.
    pub fn sanitized(&self) -> Viewport {
        let pick = |v: f64, fallback: f64| {
            if v.is_finite() && v > 0.0 { v.min(Self::MAX_DIMENSION) } else { fallback }
        };
        Viewport {
            width: pick(self.width, Self::DEFAULT_WIDTH),
            height: pick(self.height, Self::DEFAULT_HEIGHT),
            orthographic: self.orthographic,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Front,
    Back,
    Side,
}

impl View {
    /// Only the front outline has geometry; back and side fall back to it.
    pub fn has_geometry(self) -> bool {
        matches!(self, View::Front)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
            View::Side => "side",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
#[serde(default)]
pub struct RenderOptions {
    pub view: View,
    pub show_grid: bool,
}

pub const DEFAULT_POSE: &str = "POSE01";

fn default_pose() -> String {
    DEFAULT_POSE.to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AvatarRequest {
    pub measurements: MeasurementSet,
    pub viewport: Viewport,
    pub view: View,
    #[serde(default = "default_pose")]
    pub pose: String,
    pub show_grid: bool,
}

impl AvatarRequest {
    pub fn options(&self) -> RenderOptions {
        RenderOptions { view: self.view, show_grid: self.show_grid }
    }
}

impl Default for AvatarRequest {
    fn default() -> Self {
        Self {
            measurements: MeasurementSet::default(),
            viewport: Viewport::default(),
            view: View::Front,
            pose: default_pose(),
            show_grid: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderMeta {
    pub units: UnitSystem,
    pub pose: String,
    pub view: View,
    pub scale: f64, // pixels per measurement unit
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub svg: String,
    pub png: String, // raster output belongs to the external renderer; always empty here
    pub meta: RenderMeta,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MeasurementField {
    pub name: String,
    pub key: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_aliases() {
        let m: MeasurementSet = serde_json::from_str(r#"{"unit": "inches", "chest": 40}"#).unwrap();
        assert_eq!(m.units, UnitSystem::In);
        assert_eq!(m.chest, Some(40.0));
        assert_eq!(UnitSystem::parse(" CM "), Some(UnitSystem::Cm));
        assert_eq!(UnitSystem::parse("furlongs"), None);
    }

    #[test]
    fn empty_request_uses_defaults() {
        let req: AvatarRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, AvatarRequest::default());
        assert_eq!(req.pose, DEFAULT_POSE);
        assert_eq!(req.viewport, Viewport::new(800.0, 1100.0));
    }

    #[test]
    fn unusable_viewport_falls_back() {
        let vp = Viewport::new(-5.0, f64::NAN).sanitized();
        assert_eq!((vp.width, vp.height), (800.0, 1100.0));
        assert_eq!(Viewport::new(300.0, 0.0).sanitized().width, 300.0);
    }

    #[test]
    fn oversized_viewport_is_capped() {
        let vp = Viewport::new(1e307, f64::MAX).sanitized();
        assert_eq!((vp.width, vp.height), (Viewport::MAX_DIMENSION, Viewport::MAX_DIMENSION));
    }

    #[test]
    fn only_positive_finite_values_are_accepted() {
        assert_eq!(MeasurementSet::accepted(Some(0.0)), None);
        assert_eq!(MeasurementSet::accepted(Some(f64::INFINITY)), None);
        assert_eq!(MeasurementSet::accepted(Some(12.5)), Some(12.5));
    }
}
