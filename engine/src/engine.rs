use wasm_bindgen::prelude::*;
use tracing::{info, warn};
use crate::body_parts::{get_all_parts, get_part_by_id, BodyPartMetadata};
use crate::config::{Calibration, Style};
use crate::error::Result;
use crate::proportions::ProportionModel;
use crate::types::{AvatarRequest, RenderResult, UnitSystem};

fn error_json(message: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": message.to_string() }).to_string()
}

fn ok_json() -> String {
    serde_json::json!({ "ok": true }).to_string()
}

#[wasm_bindgen]
pub struct AvatarEngine {
    pub(crate) calibration: Calibration,
    pub(crate) style: Style,
}

impl Default for AvatarEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl AvatarEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> AvatarEngine {
        console_error_panic_hook::set_once();

        AvatarEngine {
            calibration: Calibration::default(),
            style: Style::default(),
        }
    }

    /// Renders a JSON `AvatarRequest`; failures come back as `{"error": ...}`.
    pub fn render_json(&self, request_json: &str) -> String {
        match self.render_str(request_json) {
            Ok(result) => serde_json::to_string(&result).unwrap_or_else(error_json),
            Err(e) => {
                warn!(error = %e, "rejected render request");
                error_json(format!("Invalid request: {e}"))
            }
        }
    }

    pub fn render(&self, request: JsValue) -> std::result::Result<JsValue, JsValue> {
        let request: AvatarRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Invalid request: {e}")))?;
        let result = crate::render(&request, &self.calibration, &self.style);
        serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replaces the calibration table. A rejected table leaves the old one in place.
    pub fn set_calibration(&mut self, json: &str) -> String {
        match Calibration::from_json(json) {
            Ok(calibration) => {
                info!(heads = calibration.heads_per_figure, "calibration updated");
                self.calibration = calibration;
                ok_json()
            }
            Err(e) => {
                warn!(error = %e, "calibration rejected");
                error_json(e)
            }
        }
    }

    pub fn get_calibration(&self) -> String {
        serde_json::to_string(&self.calibration).unwrap_or_else(error_json)
    }

    pub fn set_style(&mut self, json: &str) -> String {
        match Style::from_json(json) {
            Ok(style) => {
                info!("style updated");
                self.style = style;
                ok_json()
            }
            Err(e) => {
                warn!(error = %e, "style rejected");
                error_json(e)
            }
        }
    }

    pub fn get_style(&self) -> String {
        serde_json::to_string(&self.style).unwrap_or_else(error_json)
    }

    /// Form descriptors for the measurement inputs; unknown units fall back to cm.
    pub fn get_measurement_fields(&self, units: &str) -> String {
        let units = UnitSystem::parse(units).unwrap_or_default();
        let fields = self.calibration.measurement_fields(units);
        serde_json::to_string(&fields).unwrap_or("[]".to_string())
    }

    pub fn get_body_parts(&self) -> String {
        let parts: Vec<BodyPartMetadata> =
            get_all_parts().iter().map(|p| p.get_metadata()).collect();
        serde_json::to_string(&parts).unwrap_or("[]".to_string())
    }

    /// Contour of a single body part for a request, as `{"id", "name", "d"}`.
    pub fn get_part_path(&self, request_json: &str, part_id: &str) -> String {
        let Some(part) = get_part_by_id(part_id) else {
            return error_json(format!("Unknown body part: {part_id}"));
        };
        let request: AvatarRequest = match serde_json::from_str(request_json) {
            Ok(request) => request,
            Err(e) => return error_json(format!("Invalid request: {e}")),
        };
        let proportions = ProportionModel::new(&self.calibration)
            .compute(&request.measurements, &request.viewport);
        let meta = part.get_metadata();
        let d = part.build_contour(&proportions, &self.calibration).to_svg();
        serde_json::json!({ "id": meta.id, "name": meta.name, "d": d }).to_string()
    }
}

impl AvatarEngine {
    fn render_str(&self, request_json: &str) -> Result<RenderResult> {
        let request: AvatarRequest = serde_json::from_str(request_json)?;
        Ok(crate::render(&request, &self.calibration, &self.style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn render_json_returns_result_envelope() {
        let engine = AvatarEngine::new();
        let out = engine.render_json(r#"{"measurements": {"chest": 100}}"#);
        let out: Value = serde_json::from_str(&out).unwrap();
        assert!(out["svg"].as_str().unwrap().starts_with("<svg"));
        assert_eq!(out["png"], "");
        assert_eq!(out["meta"]["units"], "cm");
        assert_eq!(out["meta"]["pose"], "POSE01");
    }

    #[test]
    fn malformed_request_reports_error() {
        let engine = AvatarEngine::new();
        let out: Value = serde_json::from_str(&engine.render_json("not json")).unwrap();
        assert!(out["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[test]
    fn invalid_calibration_keeps_previous_table() {
        let mut engine = AvatarEngine::new();
        let out = engine.set_calibration(r#"{"heads_per_figure": -9}"#);
        let out: Value = serde_json::from_str(&out).unwrap();
        assert!(out["error"].as_str().unwrap().contains("heads_per_figure"));
        assert_eq!(engine.calibration, Calibration::default());

        let out = engine.set_calibration(r#"{"upper_body_gain": 1.1}"#);
        let out: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(out["ok"], true);
        let current: Calibration = serde_json::from_str(&engine.get_calibration()).unwrap();
        assert_eq!(current.upper_body_gain, 1.1);
    }

    #[test]
    fn style_flows_into_documents() {
        let mut engine = AvatarEngine::new();
        engine.set_style(r##"{"stroke": "#ff0000", "stroke_width": 3}"##);
        let out: Value = serde_json::from_str(&engine.render_json("{}")).unwrap();
        let svg = out["svg"].as_str().unwrap();
        assert!(svg.contains(r##"stroke="#ff0000" stroke-width="3.00""##));
        let rejected = engine.set_style(r#"{"grid_opacity": 4}"#);
        let rejected: Value = serde_json::from_str(&rejected).unwrap();
        assert!(rejected.get("error").is_some());
    }

    #[test]
    fn listings() {
        let engine = AvatarEngine::new();
        let parts: Vec<BodyPartMetadata> = serde_json::from_str(&engine.get_body_parts()).unwrap();
        assert_eq!(parts[0].id, "torso");
        assert_eq!(parts.len(), 5);
        let fields: Value = serde_json::from_str(&engine.get_measurement_fields("inches")).unwrap();
        assert_eq!(fields.as_array().unwrap().len(), 10);
        assert!(fields[0]["default"].as_f64().unwrap() < 70.0);
    }

    #[test]
    fn single_part_matches_the_full_document() {
        let engine = AvatarEngine::new();
        let request =
            r#"{"measurements": {"hip": 120}, "viewport": {"width": 640, "height": 960}}"#;
        let part: Value = serde_json::from_str(&engine.get_part_path(request, "left_leg")).unwrap();
        assert_eq!(part["id"], "left_leg");
        assert_eq!(part["name"], "Left Leg");
        let d = part["d"].as_str().unwrap();
        assert!(d.starts_with('M') && d.ends_with('Z'));

        let out: Value = serde_json::from_str(&engine.render_json(request)).unwrap();
        let svg = out["svg"].as_str().unwrap();
        assert!(svg.contains(&format!(r#"<path id="left_leg" d="{d}" />"#)));
    }

    #[test]
    fn single_part_reports_unknown_ids() {
        let engine = AvatarEngine::new();
        let out: Value = serde_json::from_str(&engine.get_part_path("{}", "tail")).unwrap();
        assert!(out["error"].as_str().unwrap().contains("tail"));
        let out: Value = serde_json::from_str(&engine.get_part_path("[", "torso")).unwrap();
        assert!(out["error"].as_str().unwrap().starts_with("Invalid request"));
    }
}
