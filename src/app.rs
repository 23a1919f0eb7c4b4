use eframe::egui::{self, Color32, RichText};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EduInsightApp {
    pub state: AppState,
}

impl EduInsightApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for EduInsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart + raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.state.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("KPI data unavailable.\n{err}"))
                            .color(Color32::RED)
                            .heading(),
                    );
                });
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                if plot::kpi_chart(ui, &self.state) {
                    ui.add_space(8.0);
                    table::raw_data(ui, &mut self.state);
                }
            });
        });
    }
}
