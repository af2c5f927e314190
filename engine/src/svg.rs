use kurbo::Point;
use tracing::{debug, trace};
use crate::body_parts::get_all_parts;
use crate::config::{Calibration, Style};
use crate::grid::grid_overlay;
use crate::path::fmt_num;
use crate::proportions::Proportions;
use crate::types::RenderOptions;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadEllipse {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

impl HeadEllipse {
    pub fn bottom(&self) -> f64 {
        self.center.y + self.ry
    }
}

/// Head sized from the viewport, resting on the chin landmark.
pub fn head_ellipse(p: &Proportions, cal: &Calibration) -> HeadEllipse {
    let ry = cal.head_ry * p.landmarks.head_unit;
    HeadEllipse {
        center: Point::new(p.center_x, p.landmarks.chin - ry),
        rx: cal.head_rx_fraction * p.width,
        ry,
    }
}

pub(crate) fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Assembles head, torso, limbs and optional guides into one SVG document.
pub fn compose(
    p: &Proportions,
    cal: &Calibration,
    style: &Style,
    options: &RenderOptions,
) -> String {
    if !options.view.has_geometry() {
        debug!(view = options.view.as_str(), "view has no geometry yet, drawing front outline");
    }

    let head = head_ellipse(p, cal);
    let mut body = format!(
        r#"<ellipse id="head" cx="{}" cy="{}" rx="{}" ry="{}" />"#,
        fmt_num(head.center.x),
        fmt_num(head.center.y),
        fmt_num(head.rx),
        fmt_num(head.ry)
    );
    for part in get_all_parts() {
        let meta = part.get_metadata();
        let contour = part.build_contour(p, cal);
        trace!(part = %meta.id, commands = contour.commands().len(), "contour built");
        body.push_str(&format!(r#"<path id="{}" d="{}" />"#, meta.id, contour.to_svg()));
    }

    let guides = if options.show_grid {
        grid_overlay(&p.landmarks, p.width, p.height, style)
    } else {
        String::new()
    };

    let (w, h) = (fmt_num(p.width), fmt_num(p.height));
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" "#,
            r#"viewBox="0 0 {w} {h}" data-view="{}">"#,
            r#"<rect width="100%" height="100%" fill="{}" />"#,
            r#"<g class="outline" fill="{}" stroke="{}" stroke-width="{}" "#,
            r#"stroke-linejoin="round">"#,
            r#"{}</g>{}</svg>"#
        ),
        options.view.as_str(),
        escape_attr(&style.background),
        escape_attr(&style.fill),
        escape_attr(&style.stroke),
        fmt_num(style.stroke_width),
        body,
        guides,
        w = w,
        h = h
    )
}
