pub mod types;
pub mod config;
pub mod error;
pub mod proportions;
pub mod path;
pub mod body_parts;
pub mod grid;
pub mod svg;
pub mod engine;

use tracing::{debug, info_span};

pub use config::{Calibration, Style};
pub use engine::AvatarEngine;
pub use error::{Error, Result};
pub use proportions::{ProportionModel, Proportions};
pub use types::*;

/// Front outline with the default calibration and style.
pub fn generate(measurements: &MeasurementSet, viewport: &Viewport) -> String {
    generate_with(
        measurements,
        viewport,
        &RenderOptions::default(),
        &Calibration::default(),
        &Style::default(),
    )
}

pub fn generate_with(
    measurements: &MeasurementSet,
    viewport: &Viewport,
    options: &RenderOptions,
    calibration: &Calibration,
    style: &Style,
) -> String {
    let proportions = ProportionModel::new(calibration).compute(measurements, viewport);
    svg::compose(&proportions, calibration, style, options)
}

/// Full request pipeline. Raster output is produced elsewhere, so `png` stays empty.
pub fn render(request: &AvatarRequest, calibration: &Calibration, style: &Style) -> RenderResult {
    let _span = info_span!("render", pose = %request.pose, view = request.view.as_str()).entered();
    let proportions =
        ProportionModel::new(calibration).compute(&request.measurements, &request.viewport);
    debug!(
        head_unit = proportions.landmarks.head_unit,
        scale = proportions.scale,
        "proportions resolved"
    );
    RenderResult {
        svg: svg::compose(&proportions, calibration, style, &request.options()),
        png: String::new(),
        meta: RenderMeta {
            units: request.measurements.units,
            pose: request.pose.clone(),
            view: request.view,
            scale: proportions.scale,
        },
    }
}

pub fn render_json(request_json: &str) -> Result<RenderResult> {
    let request: AvatarRequest = serde_json::from_str(request_json)?;
    Ok(render(&request, &Calibration::default(), &Style::default()))
}
