use super::*;
use kurbo::{Point, Vec2};
use crate::body_parts::torso::mirror_x;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A tapered capsule between two anchors.
///
/// The path always ends at `distal`. `midpoint_y` only marks where the
/// limb visually bends (elbow, knee) and steers the edge control points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimbSegment {
    pub proximal: Point,
    pub proximal_radius: f64,
    pub distal: Point,
    pub distal_radius: f64,
    pub midpoint_y: Option<f64>,
}

impl LimbSegment {
    /// Reflects the anchors across `x = axis`; radii and y values are shared.
    pub fn mirrored(&self, axis: f64) -> LimbSegment {
        LimbSegment {
            proximal: mirror_x(self.proximal, axis),
            distal: mirror_x(self.distal, axis),
            ..*self
        }
    }

    pub fn with_min_radius(self, min: f64) -> LimbSegment {
        LimbSegment {
            proximal_radius: self.proximal_radius.max(min),
            distal_radius: self.distal_radius.max(min),
            ..self
        }
    }

    // Axis parameter of the visual midpoint, kept away from the caps.
    fn midpoint_t(&self) -> f64 {
        let span = self.distal.y - self.proximal.y;
        match self.midpoint_y {
            Some(y) if span.abs() > f64::EPSILON => {
                ((y - self.proximal.y) / span).clamp(0.2, 0.8)
            }
            _ => 0.5,
        }
    }
}

/// Closed capsule outline: edge, distal cap, mirrored edge, proximal cap.
pub fn capsule_contour(seg: &LimbSegment, cal: &Calibration) -> PathBuilder {
    let axis = seg.distal - seg.proximal;
    let length = axis.hypot();
    let dir = if length > f64::EPSILON { axis / length } else { Vec2::new(0.0, 1.0) };
    let normal = Vec2::new(-dir.y, dir.x);
    let (r0, r1) = (seg.proximal_radius, seg.distal_radius);

    let t = seg.midpoint_t();
    let t1 = t * 2.0 / 3.0;
    let t2 = t + (1.0 - t) / 3.0;
    let bulge = 1.0 + cal.limb_bulge;
    let edge_ctrl = |tt: f64, side: f64| {
        let radius = r0 + (r1 - r0) * tt;
        seg.proximal.lerp(seg.distal, tt) + normal * (side * radius * bulge)
    };

    let a = seg.proximal + normal * r0;
    let b = seg.distal + normal * r1;
    let c = seg.distal - normal * r1;
    let d = seg.proximal - normal * r0;

    let mut path = PathBuilder::new();
    path.move_to(a)
        .curve_to(edge_ctrl(t1, 1.0), edge_ctrl(t2, 1.0), b)
        .quad_to(seg.distal + dir * (r1 * cal.cap_roundness), c)
        .curve_to(edge_ctrl(t2, -1.0), edge_ctrl(t1, -1.0), d)
        .quad_to(seg.proximal - dir * (r0 * cal.cap_roundness), a)
        .close();
    path
}

/// Left arm: shoulder tip to wrist, hanging clear of the hips.
pub fn left_arm_segment(p: &Proportions, cal: &Calibration) -> LimbSegment {
    let l = &p.landmarks;
    let hw = &p.half_widths;
    let hu = l.head_unit;
    let reach = hw.shoulder.max(hw.hip + hw.forearm) + cal.arm_splay * hu;
    LimbSegment {
        proximal: Point::new(p.center_x - hw.shoulder, l.shoulder + cal.arm_drop * hu),
        proximal_radius: hw.upper_arm,
        distal: Point::new(p.center_x - reach, p.wrist_y),
        distal_radius: hw.forearm,
        midpoint_y: Some((l.shoulder + p.wrist_y) / 2.0),
    }
    .with_min_radius(cal.min_limb_radius_px)
}

/// Left leg: below the hip to the ankle, bending at the knee.
pub fn left_leg_segment(p: &Proportions, cal: &Calibration) -> LimbSegment {
    let l = &p.landmarks;
    let hw = &p.half_widths;
    LimbSegment {
        proximal: Point::new(p.center_x - hw.hip * cal.leg_spread, p.leg_top_y),
        proximal_radius: hw.thigh,
        distal: Point::new(p.center_x - hw.hip * cal.ankle_spread, l.ankle),
        distal_radius: hw.calf * cal.ankle_taper,
        midpoint_y: Some(l.knee),
    }
    .with_min_radius(cal.min_limb_radius_px)
}

fn sided(segment: LimbSegment, side: Side, axis: f64) -> LimbSegment {
    match side {
        Side::Left => segment,
        Side::Right => segment.mirrored(axis),
    }
}

pub struct ArmShape {
    pub side: Side,
}

impl BodyPart for ArmShape {
    fn get_metadata(&self) -> BodyPartMetadata {
        let side = self.side.as_str();
        BodyPartMetadata {
            id: format!("{side}_arm"),
            name: format!("{}{} Arm", side[..1].to_uppercase(), &side[1..]),
        }
    }

    fn build_contour(&self, p: &Proportions, cal: &Calibration) -> PathBuilder {
        capsule_contour(&sided(left_arm_segment(p, cal), self.side, p.center_x), cal)
    }
}

pub struct LegShape {
    pub side: Side,
}

impl BodyPart for LegShape {
    fn get_metadata(&self) -> BodyPartMetadata {
        let side = self.side.as_str();
        BodyPartMetadata {
            id: format!("{side}_leg"),
            name: format!("{}{} Leg", side[..1].to_uppercase(), &side[1..]),
        }
    }

    fn build_contour(&self, p: &Proportions, cal: &Calibration) -> PathBuilder {
        capsule_contour(&sided(left_leg_segment(p, cal), self.side, p.center_x), cal)
    }
}
