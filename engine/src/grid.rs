use std::fmt::Write;
use kurbo::Point;
use crate::config::Style;
use crate::path::fmt_num;
use crate::proportions::Landmarks;
use crate::svg::escape_attr;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideLine {
    pub label: &'static str,
    pub from: Point,
    pub to: Point,
}

/// Vertical centreline followed by one horizontal line per landmark.
pub fn guide_lines(landmarks: &Landmarks, width: f64, height: f64) -> Vec<GuideLine> {
    let cx = width / 2.0;
    let mut lines = vec![GuideLine {
        label: "center",
        from: Point::new(cx, 0.0),
        to: Point::new(cx, height),
    }];
    for (label, y) in landmarks.labelled() {
        lines.push(GuideLine { label, from: Point::new(0.0, y), to: Point::new(width, y) });
    }
    lines
}

pub fn grid_overlay(landmarks: &Landmarks, width: f64, height: f64, style: &Style) -> String {
    let mut out = format!(
        r#"<g class="guides" stroke="{}" stroke-width="1" stroke-opacity="{}">"#,
        escape_attr(&style.grid_stroke),
        fmt_num(style.grid_opacity)
    );
    for line in guide_lines(landmarks, width, height) {
        let _ = write!(
            out,
            r#"<line data-landmark="{}" x1="{}" y1="{}" x2="{}" y2="{}" />"#,
            line.label,
            fmt_num(line.from.x),
            fmt_num(line.from.y),
            fmt_num(line.to.x),
            fmt_num(line.to.y)
        );
    }
    out.push_str("</g>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Calibration;

    #[test]
    fn one_line_per_landmark_plus_centerline() {
        let cal = Calibration::default();
        let landmarks = Landmarks::from_head_unit(100.0, &cal);
        let lines = guide_lines(&landmarks, 600.0, 900.0);
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0].from.x, 300.0);
        assert_eq!(lines[0].to.y, 900.0);
        let waist = lines.iter().find(|l| l.label == "waist").unwrap();
        assert_eq!(waist.from.y, 350.0);
        assert_eq!(waist.to.x, 600.0);
    }

    #[test]
    fn overlay_is_faint() {
        let cal = Calibration::default();
        let landmarks = Landmarks::from_head_unit(100.0, &cal);
        let svg = grid_overlay(&landmarks, 600.0, 900.0, &Style::default());
        assert!(svg.contains(r#"stroke-opacity="0.20""#));
        assert_eq!(svg.matches("<line").count(), 9);
    }
}
