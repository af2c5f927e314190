use super::*;
use kurbo::{Point, Vec2};
use crate::path::{snap, snap_point};

/// One cubic transition of the torso outline; the start is the previous end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicSegment {
    fn snapped(&self) -> CubicSegment {
        CubicSegment {
            c1: snap_point(self.c1),
            c2: snap_point(self.c2),
            end: snap_point(self.end),
        }
    }

    /// Same curve reflected across `x = axis` and traversed backwards,
    /// so it runs from the mirrored `end` to the mirrored `start`.
    pub fn mirrored_reverse(&self, start: Point, axis: f64) -> CubicSegment {
        CubicSegment {
            c1: mirror_x(self.c2, axis),
            c2: mirror_x(self.c1, axis),
            end: mirror_x(start, axis),
        }
    }
}

pub fn mirror_x(p: Point, axis: f64) -> Point {
    Point::new(2.0 * axis - p.x, p.y)
}

// Straight interpolation from `from` to `to`, nudged by (dx, dy).
fn ctrl(from: Point, to: Point, t: f64, dx: f64, dy: f64) -> Point {
    from.lerp(to, t) + Vec2::new(dx, dy)
}

/// Mirror axis of the torso, on the same 0.01 grid as the outline.
pub fn torso_axis(p: &Proportions) -> f64 {
    snap(p.center_x)
}

/// Left half of the torso: crotch start point and the cubic transitions up
/// through hip, waist, chest and shoulder to the left side of the neck.
/// Positive dx moves toward the centreline, positive dy moves down.
///
/// Every point is snapped to the 0.01 output grid, so reflecting it across
/// `torso_axis` lands on the grid too and both halves print digit for digit.
pub fn left_outline(p: &Proportions, cal: &Calibration) -> (Point, Vec<CubicSegment>) {
    let l = &p.landmarks;
    let hw = &p.half_widths;
    let hu = l.head_unit;
    let cx = torso_axis(p);
    let left = |half: f64, y: f64| Point::new(cx - half, y);

    let crotch = Point::new(cx, l.crotch);
    let hip = left(hw.hip, l.hip);
    let waist = left(hw.waist, l.waist);
    let chest = left(hw.chest, l.chest);
    let shoulder = left(hw.shoulder, l.shoulder);
    let neck = left(hw.neck, l.neck);

    let segments = vec![
        CubicSegment {
            c1: ctrl(crotch, hip, 1.0 / 3.0, -hw.hip * cal.crotch_flare, cal.hip_round * hu),
            c2: ctrl(crotch, hip, 2.0 / 3.0, -hw.hip * cal.crotch_flare, cal.hip_round * hu),
            end: hip,
        },
        // waist indentation
        CubicSegment {
            c1: ctrl(hip, waist, 1.0 / 3.0, -hw.hip * cal.hip_swell, 0.0),
            c2: ctrl(hip, waist, 2.0 / 3.0, hw.waist * cal.waist_pinch, 0.0),
            end: waist,
        },
        // chest projection
        CubicSegment {
            c1: ctrl(waist, chest, 1.0 / 3.0, hw.waist * cal.waist_pinch, 0.0),
            c2: ctrl(waist, chest, 2.0 / 3.0, -hw.chest * cal.chest_projection, 0.0),
            end: chest,
        },
        CubicSegment {
            c1: ctrl(chest, shoulder, 1.0 / 3.0, -hw.chest * cal.chest_projection, 0.0),
            c2: ctrl(chest, shoulder, 2.0 / 3.0, -hw.shoulder * cal.deltoid_round, 0.0),
            end: shoulder,
        },
        // shoulder slope
        CubicSegment {
            c1: ctrl(shoulder, neck, 1.0 / 3.0, 0.0, cal.shoulder_slope * hu),
            c2: ctrl(
                shoulder,
                neck,
                2.0 / 3.0,
                -hw.neck * cal.neck_flare,
                cal.shoulder_slope * hu * 0.5,
            ),
            end: neck,
        },
    ];
    (snap_point(crotch), segments.iter().map(CubicSegment::snapped).collect())
}

/// Closed, bilaterally symmetric torso contour.
pub fn torso_contour(p: &Proportions, cal: &Calibration) -> PathBuilder {
    let (start, left) = left_outline(p, cal);
    let axis = torso_axis(p);

    let mut path = PathBuilder::new();
    path.move_to(start);
    for seg in &left {
        path.curve_to(seg.c1, seg.c2, seg.end);
    }

    let neck_left = left.last().map(|s| s.end).unwrap_or(start);
    path.line_to(mirror_x(neck_left, axis));

    for (i, seg) in left.iter().enumerate().rev() {
        let seg_start = if i == 0 { start } else { left[i - 1].end };
        let right = seg.mirrored_reverse(seg_start, axis);
        path.curve_to(right.c1, right.c2, right.end);
    }
    path.close();
    path
}

pub struct TorsoShape;
impl BodyPart for TorsoShape {
    fn get_metadata(&self) -> BodyPartMetadata {
        BodyPartMetadata { id: "torso".to_string(), name: "Torso".to_string() }
    }

    fn build_contour(&self, p: &Proportions, cal: &Calibration) -> PathBuilder {
        torso_contour(p, cal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCommand;
    use crate::proportions::ProportionModel;
    use crate::types::{MeasurementSet, Viewport};

    fn proportions() -> (Proportions, Calibration) {
        let cal = Calibration::default();
        let p = ProportionModel::new(&cal)
            .compute(&MeasurementSet::default(), &Viewport::default());
        (p, cal)
    }

    #[test]
    fn contour_is_closed_and_starts_at_crotch() {
        let (p, cal) = proportions();
        let path = torso_contour(&p, &cal);
        let cmds = path.commands();
        let crotch = snap_point(Point::new(p.center_x, p.landmarks.crotch));
        assert_eq!(cmds[0], PathCommand::MoveTo(crotch));
        assert!(path.is_closed());
        // M, 5 left cubics, neck line, 5 right cubics, Z
        assert_eq!(cmds.len(), 13);
        match cmds[11] {
            PathCommand::CubicTo(_, _, end) => assert_eq!(end, crotch),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn right_side_mirrors_left_exactly() {
        let (p, cal) = proportions();
        let cmds = torso_contour(&p, &cal).commands().to_vec();
        let left: Vec<Point> = cmds[1..6].iter().flat_map(|c| c.points()).collect();
        let mut right: Vec<Point> = cmds[7..12].iter().flat_map(|c| c.points()).collect();
        right.reverse();
        // reversed right = [crotch, c1', c2', hip, ...] vs left = [c1, c2, hip, ...]
        let axis = torso_axis(&p);
        let crotch = right.remove(0);
        assert_eq!(crotch.x, axis);
        let neck_left = left[left.len() - 1];
        right.push(mirror_x(neck_left, axis));
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(&right) {
            assert_eq!(r.x, 2.0 * axis - l.x);
            assert_eq!(r.y, l.y);
        }
    }

    // Coordinates of a `d` string in hundredths of a pixel.
    fn hundredths(d: &str) -> Vec<(i64, i64)> {
        d.split_whitespace()
            .filter_map(|token| token.split_once(','))
            .map(|(x, y)| {
                let parse = |v: &str| (v.parse::<f64>().unwrap() * 100.0).round() as i64;
                (parse(x), parse(y))
            })
            .collect()
    }

    #[test]
    fn serialized_halves_mirror_on_rounding_ties() {
        let cal = Calibration::default();
        let m = MeasurementSet { chest: Some(75.5), ..MeasurementSet::default() };
        let p = ProportionModel::new(&cal).compute(&m, &Viewport::new(136.0, 1100.0));
        let points = hundredths(&torso_contour(&p, &cal).to_svg());
        let axis = points[0].0;
        assert_eq!(axis, 6800);
        for &(x, y) in &points {
            assert!(points.contains(&(2 * axis - x, y)), "no mirror for ({x}, {y})");
        }
    }

    #[test]
    fn waist_is_narrower_than_chest_and_hip() {
        let (p, cal) = proportions();
        let (_, left) = left_outline(&p, &cal);
        assert!(left[1].end.x > left[0].end.x); // waist inside hip
        assert!(left[1].end.x > left[2].end.x); // waist inside chest
        // shoulder control dips below the straight shoulder-neck line
        let shoulder = left[3].end;
        let neck = left[4].end;
        assert!(left[4].c1.y > shoulder.lerp(neck, 1.0 / 3.0).y);
    }
}
