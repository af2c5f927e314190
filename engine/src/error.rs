#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("calibration field `{field}` must be finite and positive, got {value}")]
    InvalidCalibration { field: &'static str, value: f64 },
    #[error("landmark `{upper}` must sit above landmark `{lower}`")]
    LandmarkOrder {
        upper: &'static str,
        lower: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
