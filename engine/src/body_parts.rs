use serde::{Serialize, Deserialize};
use crate::config::Calibration;
use crate::path::PathBuilder;
use crate::proportions::Proportions;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BodyPartMetadata {
    pub id: String,
    pub name: String,
}

pub trait BodyPart {
    fn get_metadata(&self) -> BodyPartMetadata;
    fn build_contour(&self, proportions: &Proportions, calibration: &Calibration) -> PathBuilder;
}

pub mod torso;
pub mod limbs;

use limbs::{ArmShape, LegShape, Side};

/// Every contour of the front outline, in drawing order.
pub fn get_all_parts() -> Vec<Box<dyn BodyPart>> {
    vec![
        Box::new(torso::TorsoShape),
        Box::new(ArmShape { side: Side::Left }),
        Box::new(ArmShape { side: Side::Right }),
        Box::new(LegShape { side: Side::Left }),
        Box::new(LegShape { side: Side::Right }),
    ]
}

pub fn get_part_by_id(id: &str) -> Option<Box<dyn BodyPart>> {
    match id {
        "torso" => Some(Box::new(torso::TorsoShape)),
        "left_arm" => Some(Box::new(ArmShape { side: Side::Left })),
        "right_arm" => Some(Box::new(ArmShape { side: Side::Right })),
        "left_leg" => Some(Box::new(LegShape { side: Side::Left })),
        "right_leg" => Some(Box::new(LegShape { side: Side::Right })),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_round_trip() {
        let parts = get_all_parts();
        assert_eq!(parts.len(), 5);
        for part in parts {
            let id = part.get_metadata().id;
            assert_eq!(get_part_by_id(&id).map(|p| p.get_metadata().id), Some(id));
        }
        assert!(get_part_by_id("tail").is_none());
    }
}
