use std::f32::consts::PI;

use egui::{Align2, Color32, FontId, Pos2, Response, Sense, Shape, Stroke, Ui, Vec2, Widget};

pub const GAUGE_MIN: f64 = 0.0;
pub const GAUGE_MAX: f64 = 10.0;
pub const UNIT: &str = "bar";

const ARC_SEGMENTS: usize = 48;
const VALUE_BAR_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Pressure band shown as a coloured section of the dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Caution,
    Normal,
    High,
}

impl Band {
    /// Bands in dial order with their `[from, to)` range in bar, the last band includes its end
    pub const ALL: [(Self, f64, f64); 4] = [
        (Self::Low, 0.0, 2.0),
        (Self::Caution, 2.0, 4.0),
        (Self::Normal, 4.0, 8.0),
        (Self::High, 8.0, 10.0),
    ];

    pub fn color(self) -> Color32 {
        match self {
            Self::Low => Color32::RED,
            Self::Caution => Color32::YELLOW,
            Self::Normal => Color32::GREEN,
            Self::High => Color32::ORANGE,
        }
    }
}

/// Position of `value` along the dial in `[0, 1]`, out of range values are clamped
pub fn value_fraction(value: f64) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    ((value - GAUGE_MIN) / (GAUGE_MAX - GAUGE_MIN)).clamp(0.0, 1.0) as f32
}

/// The band `value` falls in, or `None` outside the dial range
pub fn band_for(value: f64) -> Option<Band> {
    if !(GAUGE_MIN..=GAUGE_MAX).contains(&value) {
        return None;
    }
    let band = Band::ALL
        .iter()
        .find(|(_, from, to)| (*from..*to).contains(&value))
        .map_or(Band::High, |(band, _, _)| *band);
    Some(band)
}

/// Half-circle dial from [`GAUGE_MIN`] on the left to [`GAUGE_MAX`] on the right
#[derive(Debug, Clone, Copy)]
pub struct Gauge {
    value: f64,
    width: f32,
}

impl Gauge {
    pub fn new(value: f64) -> Self {
        Self { value, width: 320.0 }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

fn dial_point(center: Pos2, radius: f32, fraction: f32) -> Pos2 {
    let angle = PI * (1.0 - fraction);
    center + radius * Vec2::new(angle.cos(), -angle.sin())
}

fn arc(center: Pos2, radius: f32, from: f32, to: f32) -> Vec<Pos2> {
    (0..=ARC_SEGMENTS)
        .map(|i| {
            let t = i as f32 / ARC_SEGMENTS as f32;
            dial_point(center, radius, from + (to - from) * t)
        })
        .collect()
}

impl Widget for Gauge {
    fn ui(self, ui: &mut Ui) -> Response {
        let size = Vec2::new(self.width, self.width * 0.75);
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        if !ui.is_rect_visible(rect) {
            return response;
        }

        let painter = ui.painter_at(rect);
        let text_color = ui.visuals().text_color();
        let radius = self.width * 0.4;
        let band_width = radius * 0.18;
        let center = Pos2::new(rect.center().x, rect.top() + 60.0 + radius);

        painter.text(
            Pos2::new(rect.center().x, rect.top() + 4.0),
            Align2::CENTER_TOP,
            "Gas Pressure",
            FontId::proportional(20.0),
            text_color,
        );

        for (band, from, to) in Band::ALL {
            painter.add(Shape::line(
                arc(center, radius, value_fraction(from), value_fraction(to)),
                Stroke::new(band_width, band.color()),
            ));
        }

        let fraction = value_fraction(self.value);
        if fraction > 0.0 {
            painter.add(Shape::line(
                arc(center, radius * 0.72, 0.0, fraction),
                Stroke::new(band_width * 0.8, VALUE_BAR_COLOR),
            ));
        }

        for tick in (0..=10).step_by(2) {
            let tick = f64::from(tick);
            let f = value_fraction(tick);
            painter.line_segment(
                [
                    dial_point(center, radius + band_width * 0.5, f),
                    dial_point(center, radius + band_width * 0.8, f),
                ],
                Stroke::new(1.5, text_color),
            );
            painter.text(
                dial_point(center, radius + band_width * 1.5, f),
                Align2::CENTER_CENTER,
                format!("{tick}"),
                FontId::proportional(12.0),
                text_color,
            );
        }

        painter.line_segment(
            [center, dial_point(center, radius * 0.9, fraction)],
            Stroke::new(3.0, text_color),
        );
        painter.circle_filled(center, 5.0, text_color);

        painter.text(
            center + Vec2::new(0.0, 12.0),
            Align2::CENTER_TOP,
            format!("{:.2} {UNIT}", self.value),
            FontId::proportional(28.0),
            band_for(self.value).map_or(text_color, Band::color),
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_fraction_is_clamped() {
        assert_eq!(value_fraction(0.0), 0.0);
        assert_eq!(value_fraction(5.0), 0.5);
        assert_eq!(value_fraction(10.0), 1.0);
        assert_eq!(value_fraction(-3.0), 0.0);
        assert_eq!(value_fraction(42.0), 1.0);
        assert_eq!(value_fraction(f64::NAN), 0.0);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(band_for(0.0), Some(Band::Low));
        assert_eq!(band_for(1.99), Some(Band::Low));
        assert_eq!(band_for(2.0), Some(Band::Caution));
        assert_eq!(band_for(4.0), Some(Band::Normal));
        assert_eq!(band_for(7.5), Some(Band::Normal));
        assert_eq!(band_for(8.0), Some(Band::High));
        assert_eq!(band_for(10.0), Some(Band::High));
    }

    #[test]
    fn test_band_outside_range() {
        assert_eq!(band_for(-0.01), None);
        assert_eq!(band_for(10.01), None);
        assert_eq!(band_for(f64::NAN), None);
    }

    #[test]
    fn test_every_value_in_range_has_a_band() {
        for i in 0..=1000 {
            let value = f64::from(i) / 100.0;
            assert!(band_for(value).is_some(), "no band for {value}");
        }
    }

    #[test]
    fn test_dial_endpoints() {
        let center = Pos2::new(100.0, 100.0);
        let left = dial_point(center, 50.0, 0.0);
        let top = dial_point(center, 50.0, 0.5);
        let right = dial_point(center, 50.0, 1.0);
        assert!((left.x - 50.0).abs() < 1e-3 && (left.y - 100.0).abs() < 1e-3);
        assert!((top.x - 100.0).abs() < 1e-3 && (top.y - 50.0).abs() < 1e-3);
        assert!((right.x - 150.0).abs() < 1e-3 && (right.y - 100.0).abs() < 1e-3);
    }
}
