//! Nine-head proportion model: measurements + viewport -> landmarks and
//! clamped half-widths. Total over its input; bad values are substituted.

use serde::Serialize;
use tracing::debug;
use crate::config::Calibration;
use crate::types::{MeasurementSet, UnitSystem, Viewport};

/// Landmark y-coordinates in pixels, top of viewport = 0.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Landmarks {
    pub head_unit: f64,
    pub chin: f64,
    pub neck: f64,
    pub shoulder: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub crotch: f64,
    pub knee: f64,
    pub ankle: f64,
}

impl Landmarks {
    pub fn from_head_unit(hu: f64, cal: &Calibration) -> Self {
        let chest = cal.chest * hu;
        let hip = cal.hip * hu;
        Self {
            head_unit: hu,
            chin: cal.chin * hu,
            neck: (cal.chin + cal.neck_offset) * hu,
            shoulder: chest - cal.shoulder_drop * hu,
            chest,
            waist: cal.waist * hu,
            hip,
            crotch: hip + cal.crotch_drop * hu,
            knee: cal.knee * hu,
            ankle: cal.ankle * hu,
        }
    }

    /// Labelled landmarks in top-to-bottom order.
    pub fn labelled(&self) -> [(&'static str, f64); 8] {
        [
            ("chin", self.chin),
            ("neck", self.neck),
            ("shoulder", self.shoulder),
            ("chest", self.chest),
            ("waist", self.waist),
            ("hip", self.hip),
            ("knee", self.knee),
            ("ankle", self.ankle),
        ]
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct HalfWidths {
    pub shoulder: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub upper_arm: f64,
    pub forearm: f64,
    pub thigh: f64,
    pub calf: f64,
    pub neck: f64,
}

/// Measurements after substitution, in the request's unit system.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ResolvedMeasurements {
    pub height: f64,
    pub shoulder_width: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub arm_length: f64,
    pub leg_length: f64,
    pub thigh: f64,
    pub calf: f64,
    pub upper_arm: f64,
    pub neck: Option<f64>,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Proportions {
    pub units: UnitSystem,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub landmarks: Landmarks,
    pub half_widths: HalfWidths,
    pub wrist_y: f64,
    pub leg_top_y: f64,
}

impl Proportions {
    /// Horizontal cap applied to each half-width, in pixels.
    pub fn caps(&self, cal: &Calibration) -> HalfWidths {
        caps_for(self.width, cal)
    }
}

fn caps_for(width: f64, cal: &Calibration) -> HalfWidths {
    let torso = cal.max_torso_fraction * width;
    let arm = cal.max_arm_fraction * width;
    HalfWidths {
        shoulder: torso,
        chest: torso,
        waist: torso,
        hip: torso,
        upper_arm: arm,
        forearm: arm,
        thigh: cal.max_thigh_fraction * width,
        calf: cal.max_calf_fraction * width,
        neck: torso,
    }
}

fn accept_or(field: &'static str, value: Option<f64>, fallback: f64) -> f64 {
    match MeasurementSet::accepted(value) {
        Some(v) => v,
        None => {
            match value {
                Some(rejected) => {
                    debug!(field, rejected, fallback, "measurement rejected, using fallback")
                }
                None => debug!(field, fallback, "measurement missing, using fallback"),
            }
            fallback
        }
    }
}

/// Length as a fraction of stature; falls back when the ratio degenerates.
fn reach_fraction(length: f64, height: f64, fallback: f64) -> f64 {
    let fraction = length / height;
    if fraction.is_finite() && fraction > 0.0 { fraction } else { fallback }
}

pub struct ProportionModel<'a> {
    calibration: &'a Calibration,
}

impl<'a> ProportionModel<'a> {
    pub fn new(calibration: &'a Calibration) -> Self {
        Self { calibration }
    }

    pub fn resolve(&self, m: &MeasurementSet) -> ResolvedMeasurements {
        let cal = self.calibration;
        let units = m.units;
        let height = accept_or("height", m.height, units.from_cm(cal.default_height_cm));
        let shoulder_width = accept_or(
            "shoulder_width",
            m.shoulder_width,
            units.from_cm(cal.default_shoulder_width_cm),
        );
        let chest = accept_or("chest", m.chest, units.from_cm(cal.default_chest_cm));
        let waist = accept_or("waist", m.waist, units.from_cm(cal.default_waist_cm));
        let hip = accept_or("hip", m.hip, units.from_cm(cal.default_hip_cm));
        let thigh = accept_or(
            "thigh",
            m.thigh,
            (hip * cal.thigh_hip_ratio).max(units.from_cm(cal.min_thigh_cm)),
        );
        let calf = accept_or(
            "calf",
            m.calf,
            (thigh * cal.calf_thigh_ratio).max(units.from_cm(cal.min_calf_cm)),
        );
        ResolvedMeasurements {
            height,
            shoulder_width,
            chest,
            waist,
            hip,
            arm_length: accept_or("arm_length", m.arm_length, height * cal.arm_length_ratio),
            leg_length: accept_or("leg_length", m.leg_length, height * cal.leg_length_ratio),
            thigh,
            calf,
            upper_arm: (chest * cal.upper_arm_chest_ratio).max(units.from_cm(cal.min_upper_arm_cm)),
            neck: MeasurementSet::accepted(m.neck),
        }
    }

    pub fn compute(&self, m: &MeasurementSet, viewport: &Viewport) -> Proportions {
        let cal = self.calibration;
        let viewport = viewport.sanitized();
        let r = self.resolve(m);
        let scale = cal.scale_for(m.units);
        let hu = viewport.height / cal.heads_per_figure;
        let landmarks = Landmarks::from_head_unit(hu, cal);
        let caps = caps_for(viewport.width, cal);

        let upper = |value: f64, divisor: f64| value / divisor * scale * cal.upper_body_gain;
        let lower = |value: f64, divisor: f64| value / divisor * scale * cal.lower_body_gain;

        let shoulder = upper(r.shoulder_width, cal.shoulder_divisor).min(caps.shoulder);
        let upper_arm = upper(r.upper_arm, cal.upper_arm_divisor);
        let neck_width = match r.neck {
            Some(neck) => upper(neck, std::f64::consts::PI),
            None => 2.0 * shoulder * cal.neck_shoulder_ratio,
        }
        .min(cal.max_neck_width_px);

        let half_widths = HalfWidths {
            shoulder,
            chest: upper(r.chest, cal.chest_divisor).min(caps.chest),
            waist: upper(r.waist, cal.waist_divisor).min(caps.waist),
            hip: lower(r.hip, cal.hip_divisor).min(caps.hip),
            upper_arm: upper_arm.min(caps.upper_arm),
            forearm: (upper_arm * cal.forearm_taper).min(caps.forearm),
            thigh: lower(r.thigh, cal.thigh_divisor).min(caps.thigh),
            calf: lower(r.calf, cal.calf_divisor).min(caps.calf),
            neck: (neck_width / 2.0).min(caps.neck),
        };

        let figure = cal.heads_per_figure * hu;
        let arm = reach_fraction(r.arm_length, r.height, cal.arm_length_ratio);
        let leg = reach_fraction(r.leg_length, r.height, cal.leg_length_ratio);
        let wrist_y = (landmarks.shoulder + arm * figure).max(landmarks.hip).min(landmarks.knee);
        let leg_top_y = (landmarks.ankle - leg * figure).max(landmarks.hip).min(landmarks.crotch);

        Proportions {
            units: m.units,
            scale,
            width: viewport.width,
            height: viewport.height,
            center_x: viewport.width / 2.0,
            landmarks,
            half_widths,
            wrist_y,
            leg_top_y,
        }
    }
}
