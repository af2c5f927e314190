use serde::{Serialize, Deserialize};
use crate::error::{Error, Result};
use crate::types::{MeasurementField, UnitSystem};

/// The single tuning table for the proportion model and contour shapes.
///
/// Landmark positions are in head units measured from the top of the
/// viewport. Absolute measurement defaults are in centimetres and are
/// converted into the request's unit system before use. Any subset of
/// fields may be overridden from JSON; missing keys keep their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Calibration {
    // Scale
    pub px_per_cm: f64,
    pub px_per_inch: f64,
    pub heads_per_figure: f64,

    // Landmarks (head units)
    pub chin: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub knee: f64,
    pub ankle: f64,
    pub shoulder_drop: f64, // shoulder = chest - shoulder_drop
    pub neck_offset: f64,   // neck = chin + neck_offset
    pub crotch_drop: f64,   // crotch = hip + crotch_drop

    // Measurement -> half-width divisors
    pub shoulder_divisor: f64,
    pub chest_divisor: f64,
    pub waist_divisor: f64,
    pub hip_divisor: f64,
    pub thigh_divisor: f64,
    pub calf_divisor: f64,
    pub upper_arm_divisor: f64,
    pub upper_body_gain: f64,
    pub lower_body_gain: f64,
    pub forearm_taper: f64,
    pub ankle_taper: f64,

    // Fallbacks (cm, or ratios of other measurements)
    pub default_height_cm: f64,
    pub default_shoulder_width_cm: f64,
    pub default_chest_cm: f64,
    pub default_waist_cm: f64,
    pub default_hip_cm: f64,
    pub thigh_hip_ratio: f64,
    pub min_thigh_cm: f64,
    pub calf_thigh_ratio: f64,
    pub min_calf_cm: f64,
    pub upper_arm_chest_ratio: f64,
    pub min_upper_arm_cm: f64,
    pub arm_length_ratio: f64,
    pub leg_length_ratio: f64,

    // Clamps (fractions of viewport width, or pixels)
    pub max_torso_fraction: f64,
    pub max_arm_fraction: f64,
    pub max_thigh_fraction: f64,
    pub max_calf_fraction: f64,
    pub neck_shoulder_ratio: f64,
    pub max_neck_width_px: f64,
    pub min_limb_radius_px: f64,

    // Head
    pub head_rx_fraction: f64, // of viewport width
    pub head_ry: f64,          // head units

    // Torso contour shaping
    pub crotch_flare: f64,
    pub hip_round: f64,
    pub hip_swell: f64,
    pub waist_pinch: f64,
    pub chest_projection: f64,
    pub deltoid_round: f64,
    pub shoulder_slope: f64,
    pub neck_flare: f64,

    // Limb layout and capsule shaping
    pub arm_drop: f64, // head units below the shoulder line
    pub arm_splay: f64,
    pub leg_spread: f64,
    pub ankle_spread: f64,
    pub limb_bulge: f64,
    pub cap_roundness: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            px_per_cm: 3.0,
            px_per_inch: 3.0 / 2.54,
            heads_per_figure: 9.0,

            chin: 1.0,
            chest: 2.5,
            waist: 3.5,
            hip: 4.25,
            knee: 6.5,
            ankle: 8.8,
            shoulder_drop: 0.25,
            neck_offset: 0.05,
            crotch_drop: 0.35,

            shoulder_divisor: 2.0,
            chest_divisor: 4.0,
            waist_divisor: 4.2,
            hip_divisor: 4.0,
            thigh_divisor: 5.5,
            calf_divisor: 5.5,
            upper_arm_divisor: 2.0,
            upper_body_gain: 1.18,
            lower_body_gain: 1.20,
            forearm_taper: 0.75,
            ankle_taper: 0.6,

            default_height_cm: 170.0,
            default_shoulder_width_cm: 48.0,
            default_chest_cm: 110.0,
            default_waist_cm: 100.0,
            default_hip_cm: 115.0,
            thigh_hip_ratio: 0.60,
            min_thigh_cm: 60.0,
            calf_thigh_ratio: 0.65,
            min_calf_cm: 38.0,
            upper_arm_chest_ratio: 1.0 / 12.0,
            min_upper_arm_cm: 9.0,
            arm_length_ratio: 0.34,
            leg_length_ratio: 0.47,

            max_torso_fraction: 0.42,
            max_arm_fraction: 0.60,
            max_thigh_fraction: 0.70,
            max_calf_fraction: 0.60,
            neck_shoulder_ratio: 0.23,
            max_neck_width_px: 60.0,
            min_limb_radius_px: 6.0,

            head_rx_fraction: 0.085,
            head_ry: 0.46,

            crotch_flare: 0.30,
            hip_round: 0.20,
            hip_swell: 0.04,
            waist_pinch: 0.06,
            chest_projection: 0.05,
            deltoid_round: 0.04,
            shoulder_slope: 0.30,
            neck_flare: 0.25,

            arm_drop: 0.10,
            arm_splay: 0.05,
            leg_spread: 0.50,
            ankle_spread: 0.40,
            limb_bulge: 0.08,
            cap_roundness: 1.2,
        }
    }
}

impl Calibration {
    pub fn from_json(json: &str) -> Result<Self> {
        let calibration: Calibration = serde_json::from_str(json)?;
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn scale_for(&self, units: UnitSystem) -> f64 {
        match units {
            UnitSystem::Cm => self.px_per_cm,
            UnitSystem::In => self.px_per_inch,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.positive_fields() {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidCalibration { field, value });
            }
        }
        let fractions = [
            ("max_torso_fraction", self.max_torso_fraction),
            ("max_arm_fraction", self.max_arm_fraction),
            ("max_thigh_fraction", self.max_thigh_fraction),
            ("max_calf_fraction", self.max_calf_fraction),
            ("arm_length_ratio", self.arm_length_ratio),
            ("leg_length_ratio", self.leg_length_ratio),
            ("forearm_taper", self.forearm_taper),
            ("ankle_taper", self.ankle_taper),
        ];
        for (field, value) in fractions {
            if value >= 1.0 {
                return Err(Error::InvalidCalibration { field, value });
            }
        }
        let order = [
            ("chin", self.chin),
            ("chest", self.chest),
            ("waist", self.waist),
            ("hip", self.hip),
            ("knee", self.knee),
            ("ankle", self.ankle),
        ];
        for pair in order.windows(2) {
            if pair[0].1 >= pair[1].1 {
                return Err(Error::LandmarkOrder { upper: pair[0].0, lower: pair[1].0 });
            }
        }
        if self.chin + self.neck_offset >= self.chest - self.shoulder_drop {
            return Err(Error::LandmarkOrder { upper: "neck", lower: "shoulder" });
        }
        if self.hip + self.crotch_drop >= self.knee {
            return Err(Error::LandmarkOrder { upper: "crotch", lower: "knee" });
        }
        if self.ankle >= self.heads_per_figure {
            return Err(Error::LandmarkOrder { upper: "ankle", lower: "heads_per_figure" });
        }
        Ok(())
    }

    fn positive_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("px_per_cm", self.px_per_cm),
            ("px_per_inch", self.px_per_inch),
            ("heads_per_figure", self.heads_per_figure),
            ("chin", self.chin),
            ("chest", self.chest),
            ("waist", self.waist),
            ("hip", self.hip),
            ("knee", self.knee),
            ("ankle", self.ankle),
            ("shoulder_drop", self.shoulder_drop),
            ("neck_offset", self.neck_offset),
            ("crotch_drop", self.crotch_drop),
            ("shoulder_divisor", self.shoulder_divisor),
            ("chest_divisor", self.chest_divisor),
            ("waist_divisor", self.waist_divisor),
            ("hip_divisor", self.hip_divisor),
            ("thigh_divisor", self.thigh_divisor),
            ("calf_divisor", self.calf_divisor),
            ("upper_arm_divisor", self.upper_arm_divisor),
            ("upper_body_gain", self.upper_body_gain),
            ("lower_body_gain", self.lower_body_gain),
            ("forearm_taper", self.forearm_taper),
            ("ankle_taper", self.ankle_taper),
            ("default_height_cm", self.default_height_cm),
            ("default_shoulder_width_cm", self.default_shoulder_width_cm),
            ("default_chest_cm", self.default_chest_cm),
            ("default_waist_cm", self.default_waist_cm),
            ("default_hip_cm", self.default_hip_cm),
            ("thigh_hip_ratio", self.thigh_hip_ratio),
            ("min_thigh_cm", self.min_thigh_cm),
            ("calf_thigh_ratio", self.calf_thigh_ratio),
            ("min_calf_cm", self.min_calf_cm),
            ("upper_arm_chest_ratio", self.upper_arm_chest_ratio),
            ("min_upper_arm_cm", self.min_upper_arm_cm),
            ("arm_length_ratio", self.arm_length_ratio),
            ("leg_length_ratio", self.leg_length_ratio),
            ("max_torso_fraction", self.max_torso_fraction),
            ("max_arm_fraction", self.max_arm_fraction),
            ("max_thigh_fraction", self.max_thigh_fraction),
            ("max_calf_fraction", self.max_calf_fraction),
            ("neck_shoulder_ratio", self.neck_shoulder_ratio),
            ("max_neck_width_px", self.max_neck_width_px),
            ("min_limb_radius_px", self.min_limb_radius_px),
            ("head_rx_fraction", self.head_rx_fraction),
            ("head_ry", self.head_ry),
            ("crotch_flare", self.crotch_flare),
            ("hip_round", self.hip_round),
            ("hip_swell", self.hip_swell),
            ("waist_pinch", self.waist_pinch),
            ("chest_projection", self.chest_projection),
            ("deltoid_round", self.deltoid_round),
            ("shoulder_slope", self.shoulder_slope),
            ("neck_flare", self.neck_flare),
            ("arm_drop", self.arm_drop),
            ("arm_splay", self.arm_splay),
            ("leg_spread", self.leg_spread),
            ("ankle_spread", self.ankle_spread),
            ("limb_bulge", self.limb_bulge),
            ("cap_roundness", self.cap_roundness),
        ]
    }

    /// Describes each measurement input for form builders, in `units`.
    pub fn measurement_fields(&self, units: UnitSystem) -> Vec<MeasurementField> {
        let height = units.from_cm(self.default_height_cm);
        let chest = units.from_cm(self.default_chest_cm);
        let hip = units.from_cm(self.default_hip_cm);
        let thigh = (hip * self.thigh_hip_ratio).max(units.from_cm(self.min_thigh_cm));
        let calf = (thigh * self.calf_thigh_ratio).max(units.from_cm(self.min_calf_cm));
        let step = match units {
            UnitSystem::Cm => 0.5,
            UnitSystem::In => 0.25,
        };
        let field = |name: &str, key: &str, min_cm: f64, max_cm: f64, default: f64| {
            MeasurementField {
                name: name.to_string(),
                key: key.to_string(),
                min: units.from_cm(min_cm),
                max: units.from_cm(max_cm),
                default,
                step,
            }
        };
        let shoulder = units.from_cm(self.default_shoulder_width_cm);
        let neck = shoulder * self.neck_shoulder_ratio * std::f64::consts::PI;
        vec![
            field("Height", "height", 50.0, 250.0, height),
            field("Shoulder Width", "shoulder_width", 20.0, 80.0, shoulder),
            field("Chest", "chest", 50.0, 200.0, chest),
            field("Waist", "waist", 40.0, 200.0, units.from_cm(self.default_waist_cm)),
            field("Hip", "hip", 50.0, 200.0, hip),
            field("Arm Length", "arm_length", 20.0, 110.0, height * self.arm_length_ratio),
            field("Leg Length", "leg_length", 30.0, 140.0, height * self.leg_length_ratio),
            field("Thigh", "thigh", 30.0, 120.0, thigh),
            field("Calf", "calf", 20.0, 80.0, calf),
            field("Neck", "neck", 20.0, 70.0, neck),
        ]
    }
}

/// Presentation settings; geometry never reads these.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Style {
    pub background: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
    pub grid_stroke: String,
    pub grid_opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            stroke: "#1f2933".to_string(),
            stroke_width: 2.0,
            fill: "none".to_string(),
            grid_stroke: "#4a90d9".to_string(),
            grid_opacity: 0.2,
        }
    }
}

impl Style {
    pub fn from_json(json: &str) -> Result<Self> {
        let style: Style = serde_json::from_str(json)?;
        if !(style.stroke_width.is_finite() && style.stroke_width >= 0.0) {
            return Err(Error::InvalidCalibration {
                field: "stroke_width",
                value: style.stroke_width,
            });
        }
        if !(0.0..=1.0).contains(&style.grid_opacity) {
            return Err(Error::InvalidCalibration {
                field: "grid_opacity",
                value: style.grid_opacity,
            });
        }
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calibration_is_valid() {
        assert!(Calibration::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cal = Calibration::from_json(r#"{ "px_per_cm": 2.5 }"#).unwrap();
        assert_eq!(cal.px_per_cm, 2.5);
        assert_eq!(cal.chest, Calibration::default().chest);
    }

    #[test]
    fn rejects_non_positive_entries() {
        let err = Calibration::from_json(r#"{ "chest_divisor": 0.0 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration { field: "chest_divisor", .. }));
    }

    #[test]
    fn rejects_reordered_landmarks() {
        let err = Calibration::from_json(r#"{ "waist": 2.0 }"#).unwrap_err();
        assert!(matches!(err, Error::LandmarkOrder { upper: "chest", lower: "waist" }));
    }

    #[test]
    fn rejects_clamp_fraction_of_whole_viewport() {
        let err = Calibration::from_json(r#"{ "max_torso_fraction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration { field: "max_torso_fraction", .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(Calibration::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn inch_fields_are_converted() {
        let fields = Calibration::default().measurement_fields(UnitSystem::In);
        let chest = fields.iter().find(|f| f.key == "chest").unwrap();
        assert!((chest.default - 110.0 / 2.54).abs() < 1e-9);
        assert_eq!(fields.len(), 10);
    }

    #[test]
    fn style_rejects_bad_opacity() {
        assert!(Style::from_json(r#"{ "grid_opacity": 3.0 }"#).is_err());
        assert_eq!(Style::from_json("{}").unwrap(), Style::default());
    }
}
