use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::TableColumn;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw data (collapsible, sortable)
// ---------------------------------------------------------------------------

/// Render the filtered rows under a "View Raw Data" disclosure.
pub fn raw_data(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };

    egui::CollapsingHeader::new(RichText::new("View Raw Data").strong())
        .id_salt("raw_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let rows = state.table_rows();
            let mut clicked = None;

            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .column(Column::auto().at_least(160.0))
                .columns(Column::auto().at_least(70.0), TableColumn::ALL.len() - 1)
                .max_scroll_height(300.0)
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for col in TableColumn::ALL {
                        header.col(|ui| {
                            let label = format!("{}{}", col.header(), sort_marker(state, col));
                            if ui.button(RichText::new(label).strong()).clicked() {
                                clicked = Some(col);
                            }
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let record = &dataset.records[rows[row.index()]];
                        for col in TableColumn::ALL {
                            row.col(|ui| {
                                ui.label(col.cell(record));
                            });
                        }
                    });
                });

            if let Some(col) = clicked {
                state.sort_table_by(col);
            }
        });
}

fn sort_marker(state: &AppState, col: TableColumn) -> &'static str {
    match state.table_sort.column {
        Some(c) if c == col && state.table_sort.descending => " ⬇",
        Some(c) if c == col => " ⬆",
        _ => "",
    }
}
