use std::fmt::Write;
use kurbo::{BezPath, Point, Rect, Shape};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    QuadTo(Point, Point),
    SmoothCubicTo(Point, Point), // second control, end
    Close,
}

impl PathCommand {
    pub fn letter(&self) -> char {
        match self {
            PathCommand::MoveTo(_) => 'M',
            PathCommand::LineTo(_) => 'L',
            PathCommand::CubicTo(..) => 'C',
            PathCommand::QuadTo(..) => 'Q',
            PathCommand::SmoothCubicTo(..) => 'S',
            PathCommand::Close => 'Z',
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::CubicTo(c1, c2, p) => vec![c1, c2, p],
            PathCommand::QuadTo(c, p) | PathCommand::SmoothCubicTo(c, p) => vec![c, p],
            PathCommand::Close => Vec::new(),
        }
    }
}

/// Rounds onto the 0.01 grid that `fmt_num` prints. Values too large to
/// scale are already coarser than the grid and pass through unchanged.
pub fn snap(v: f64) -> f64 {
    let scaled = v * 100.0;
    if !scaled.is_finite() {
        return v;
    }
    let rounded = scaled.round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn snap_point(p: Point) -> Point {
    Point::new(snap(p.x), snap(p.y))
}

/// Fixed two-decimal coordinate; negative zero prints as `0.00`.
pub fn fmt_num(v: f64) -> String {
    format!("{:.2}", snap(v))
}

/// Ordered drawing operations with absolute coordinates.
///
/// The builder never transforms what it is given: `to_svg` writes the
/// commands back out in insertion order, so callers own every coordinate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, p: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
        self
    }

    pub fn quad_to(&mut self, c: Point, p: Point) -> &mut Self {
        self.commands.push(PathCommand::QuadTo(c, p));
        self
    }

    pub fn smooth_curve_to(&mut self, c2: Point, p: Point) -> &mut Self {
        self.commands.push(PathCommand::SmoothCubicTo(c2, p));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for cmd in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            d.push(cmd.letter());
            for p in cmd.points() {
                let _ = write!(d, " {},{}", fmt_num(p.x), fmt_num(p.y));
            }
        }
        d
    }

    /// Converts to a kurbo path, expanding smooth cubics into explicit ones.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;
        let mut last_ctrl: Option<Point> = None;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    path.move_to(p);
                    current = p;
                    start = p;
                    last_ctrl = None;
                }
                PathCommand::LineTo(p) => {
                    path.line_to(p);
                    current = p;
                    last_ctrl = None;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    path.curve_to(c1, c2, p);
                    current = p;
                    last_ctrl = Some(c2);
                }
                PathCommand::QuadTo(c, p) => {
                    path.quad_to(c, p);
                    current = p;
                    last_ctrl = None;
                }
                PathCommand::SmoothCubicTo(c2, p) => {
                    let c1 = match last_ctrl {
                        Some(prev) => current + (current - prev),
                        None => current,
                    };
                    path.curve_to(c1, c2, p);
                    current = p;
                    last_ctrl = Some(c2);
                }
                PathCommand::Close => {
                    path.close_path();
                    current = start;
                    last_ctrl = None;
                }
            }
        }
        path
    }

    pub fn bounding_box(&self) -> Rect {
        self.to_bez_path().bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn serializes_in_order_with_two_decimals() {
        let mut b = PathBuilder::new();
        b.move_to(Point::new(1.0, 2.0))
            .line_to(Point::new(3.333, 4.0))
            .curve_to(Point::new(0.0, 0.0), Point::new(1.005, 2.5), Point::new(10.0, 10.0))
            .quad_to(Point::new(5.0, 5.0), Point::new(6.0, 6.0))
            .smooth_curve_to(Point::new(7.0, 7.0), Point::new(8.0, 8.0))
            .close();
        let d = b.to_svg();
        assert!(d.starts_with("M 1.00,2.00 L 3.33,4.00 C 0.00,0.00 "));
        assert!(d.ends_with("Q 5.00,5.00 6.00,6.00 S 7.00,7.00 8.00,8.00 Z"));
        assert!(b.is_closed());
    }

    #[test]
    fn negative_zero_is_normalized() {
        assert_eq!(fmt_num(-0.0), "0.00");
        assert_eq!(fmt_num(-0.001), "0.00");
        assert_eq!(fmt_num(-1.5), "-1.50");
    }

    #[test]
    fn huge_values_stay_finite_numbers() {
        let text = fmt_num(1e307);
        assert!(text.ends_with(".00"));
        assert!(text.parse::<f64>().unwrap().is_finite());
        assert_eq!(snap(f64::MAX), f64::MAX);
    }

    #[test]
    fn snapped_values_print_exactly() {
        assert_eq!(snap(14.454), 14.45);
        assert_eq!(fmt_num(2.0 * snap(68.0) - snap(14.454)), "121.55");
    }

    #[test]
    fn empty_builder_serializes_to_nothing() {
        let b = PathBuilder::new();
        assert_eq!(b.to_svg(), "");
        assert!(!b.is_closed());
        assert!(b.is_empty());
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let mut b = PathBuilder::new();
        b.move_to(Point::new(0.0, 0.0))
            .curve_to(Point::new(0.0, 10.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0))
            .smooth_curve_to(Point::new(40.0, 10.0), Point::new(40.0, 0.0));
        let path = b.to_bez_path();
        let els: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(
            els[2],
            PathEl::CurveTo(Point::new(30.0, -10.0), Point::new(40.0, 10.0), Point::new(40.0, 0.0))
        );
    }

    #[test]
    fn output_parses_back_as_svg_path() {
        let mut b = PathBuilder::new();
        b.move_to(Point::new(10.0, 10.0))
            .curve_to(Point::new(20.0, 0.0), Point::new(30.0, 0.0), Point::new(40.0, 10.0))
            .line_to(Point::new(40.0, 40.0))
            .close();
        let parsed = BezPath::from_svg(&b.to_svg()).unwrap();
        assert_eq!(parsed.elements().len(), 4);
        let bbox = b.bounding_box();
        assert_eq!((bbox.x0, bbox.x1, bbox.y1), (10.0, 40.0, 40.0));
    }
}
