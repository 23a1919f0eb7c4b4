use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Metric;
use crate::state::AppState;

pub const TITLE: &str = "EduInsight – Canadian University KPI Dashboard";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    // Own handles so the widgets below can mutate `state`.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let colors = state.color_map.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Universities ----
            checkbox_group(
                ui,
                "Select Universities",
                &dataset.universities,
                &state.selection.universities.clone(),
                |value| Some(colors.color_for(value)),
                |action| match action {
                    GroupAction::Toggle(v) => state.toggle_university(&v),
                    GroupAction::SelectAll => state.select_all_universities(),
                    GroupAction::Clear => state.select_no_universities(),
                },
            );

            // ---- Provinces (none selected = all provinces) ----
            checkbox_group(
                ui,
                "Select Provinces",
                &dataset.provinces,
                &state.selection.provinces.clone(),
                |_| None,
                |action| match action {
                    GroupAction::Toggle(v) => state.toggle_province(&v),
                    GroupAction::SelectAll => state.select_all_provinces(),
                    GroupAction::Clear => state.select_no_provinces(),
                },
            );
            if state.selection.provinces.is_empty() {
                ui.small("No province selected: showing all provinces.");
            }
            ui.separator();

            // ---- Year range ----
            if let Some(bounds) = dataset.years {
                ui.strong("Select Year Range");
                let mut min = state.selection.year_range.min;
                let mut max = state.selection.year_range.max;
                if ui
                    .add(egui::Slider::new(&mut min, bounds.min..=bounds.max).text("From"))
                    .changed()
                {
                    state.set_min_year(min);
                }
                if ui
                    .add(egui::Slider::new(&mut max, bounds.min..=bounds.max).text("To"))
                    .changed()
                {
                    state.set_max_year(max);
                }
                ui.separator();
            }

            // ---- Metric ----
            ui.strong("Select Metric to Display");
            let mut metric = state.selection.metric;
            for m in Metric::ALL {
                ui.radio_value(&mut metric, m, m.label());
            }
            if metric != state.selection.metric {
                state.set_metric(metric);
            }
        });
}

enum GroupAction {
    Toggle(String),
    SelectAll,
    Clear,
}

/// Collapsible multi-select with All/None buttons. Changes are reported
/// through `on_action` after the widgets are drawn.
fn checkbox_group(
    ui: &mut Ui,
    title: &str,
    all_values: &BTreeSet<String>,
    selected: &BTreeSet<String>,
    color_for: impl Fn(&str) -> Option<Color32>,
    mut on_action: impl FnMut(GroupAction),
) {
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());
    let mut action = None;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = Some(GroupAction::SelectAll);
                }
                if ui.small_button("None").clicked() {
                    action = Some(GroupAction::Clear);
                }
            });

            for val in all_values {
                let mut text = RichText::new(val);
                if let Some(c) = color_for(val) {
                    text = text.color(c);
                }
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, text).changed() {
                    action = Some(GroupAction::Toggle(val.clone()));
                }
            }
        });

    if let Some(action) = action {
        on_action(action);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload data").clicked() {
                log::info!("Reloading {}", state.data_path.display());
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong(TITLE);
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} shown",
                ds.len(),
                state.view.len()
            ));
        }

        if let Some(msg) = &state.load_error {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
