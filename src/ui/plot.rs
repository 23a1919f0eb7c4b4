use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::data::model::{Dataset, Metric};
use crate::state::AppState;

pub const EMPTY_SELECTION_NOTICE: &str =
    "No data matches your selection. Please adjust the filters.";

// ---------------------------------------------------------------------------
// KPI line chart (central panel)
// ---------------------------------------------------------------------------

/// Render the metric-over-time chart. Returns `false` when nothing was drawn
/// because no rows matched.
pub fn kpi_chart(ui: &mut Ui, state: &AppState) -> bool {
    let Some(dataset) = state.dataset.as_deref() else {
        return false;
    };

    if state.view.is_empty() {
        ui.colored_label(Color32::YELLOW, EMPTY_SELECTION_NOTICE);
        return false;
    }

    let metric = state.view.metric;
    let tooltips = tooltip_rows(dataset, state);

    ui.heading(RichText::new(format!("{} Over Time", metric.label())).strong());

    Plot::new("kpi_chart")
        .legend(Legend::default())
        .height(400.0)
        .x_axis_label("Year")
        .y_axis_label(format!("{} (%)", metric.label()))
        .x_axis_formatter(|mark, _range| year_tick(mark.value))
        .label_formatter(move |name, value| tooltip_text(&tooltips, metric, name, value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in state.view.series(dataset) {
                let color = state.color_map.color_for(series.university);

                let coords: Vec<[f64; 2]> = series
                    .rows
                    .iter()
                    .filter_map(|r| Some([f64::from(r.year), metric.value(r)?]))
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::new(coords.clone()))
                        .name(series.university)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::new(coords))
                        .name(series.university)
                        .color(color)
                        .radius(3.5),
                );
            }
        });

    true
}

/// Axis ticks fall between years too; only whole years get a label.
fn year_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        String::new()
    }
}

/// (university, province, year, value) for every plotted point.
type TooltipRow = (String, String, i32, f64);

fn tooltip_rows(dataset: &Dataset, state: &AppState) -> Vec<TooltipRow> {
    state
        .view
        .rows(dataset)
        .filter_map(|r| {
            let value = state.view.metric.value(r)?;
            Some((r.university.clone(), r.province.clone(), r.year, value))
        })
        .collect()
}

fn tooltip_text(rows: &[TooltipRow], metric: Metric, name: &str, value: &PlotPoint) -> String {
    if name.is_empty() {
        return String::new();
    }
    let year = value.x.round() as i32;
    rows.iter()
        .find(|(uni, _, y, _)| uni == name && *y == year)
        .map(|(uni, province, y, v)| {
            format!(
                "University: {uni}\nProvince: {province}\nYear: {y}\n{}: {v:.1}",
                metric.column()
            )
        })
        .unwrap_or_default()
}
