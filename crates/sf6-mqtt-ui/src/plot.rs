use egui::{Color32, Ui};
use egui_plot::{AxisHints, HPlacement, Line, Plot, PlotBounds, PlotPoint, PlotPoints};

use crate::x_axis_formatter::{format_time, x_grid};

const LINE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Bounds that fit every point with a 10% margin.
///
/// `None` with fewer than 2 points since egui_plot asserts that bounds have a non-zero width.
pub fn history_bounds(points: &[PlotPoint]) -> Option<PlotBounds> {
    let (first, last) = match points {
        [first, .., last] => (first, last),
        _ => return None,
    };
    let (min_y, max_y) = points
        .iter()
        .fold((first.y, first.y), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let mut bounds = PlotBounds::from_min_max([first.x, min_y], [last.x, max_y]);
    let margin_fraction = egui::Vec2::splat(0.1);
    bounds.add_relative_margin_x(margin_fraction);
    bounds.add_relative_margin_y(margin_fraction);
    if bounds.is_valid() {
        Some(bounds)
    } else if bounds.is_valid_x() {
        // All readings identical
        bounds.expand_y(1.0);
        Some(bounds)
    } else {
        None
    }
}

/// Pressure over time. Double click to rescale to the data.
pub fn show_history_plot(ui: &mut Ui, points: &[PlotPoint], set_auto_bounds: &mut bool) {
    Plot::new("pressure_history")
        .height(260.0)
        .custom_x_axes(vec![AxisHints::new_x().formatter(format_time)])
        .x_grid_spacer(x_grid)
        .y_axis_position(HPlacement::Right)
        .y_axis_label("Pressure [bar]")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            if plot_ui.response().double_clicked() {
                if let Some(bounds) = history_bounds(points) {
                    plot_ui.set_plot_bounds(bounds);
                }
            } else if *set_auto_bounds && points.len() > 1 {
                plot_ui.set_auto_bounds(true);
                *set_auto_bounds = false;
            }

            if points.len() > 1 {
                plot_ui.line(
                    Line::new("SF6 pressure", PlotPoints::Borrowed(points))
                        .width(2.0)
                        .color(LINE_COLOR),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_bounds_for_single_point() {
        assert!(history_bounds(&[]).is_none());
        assert!(history_bounds(&[PlotPoint::new(1.0, 5.0)]).is_none());
    }

    #[test]
    fn test_bounds_have_margin() {
        let points = [
            PlotPoint::new(0.0, 4.0),
            PlotPoint::new(50.0, 8.0),
            PlotPoint::new(100.0, 6.0),
        ];
        let bounds = history_bounds(&points).expect("two or more points");
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        let [min_x, min_y] = bounds.min();
        let [max_x, max_y] = bounds.max();
        assert!(close(min_x, -10.0) && close(max_x, 110.0));
        assert!(close(min_y, 3.6) && close(max_y, 8.4));
    }

    #[test]
    fn test_flat_series_is_expanded() {
        let points = [PlotPoint::new(0.0, 5.0), PlotPoint::new(10.0, 5.0)];
        let bounds = history_bounds(&points).expect("two or more points");
        assert!(bounds.is_valid());
        assert!(bounds.min()[1] < 5.0 && bounds.max()[1] > 5.0);
    }
}
