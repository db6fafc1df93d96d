//! Results screen: table, summary figures and charts.

use super::charts;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use seed_core::view::{ResultView, TABLE_HEADERS, TableRow};

pub(super) fn render_results(ui: &mut egui::Ui, view: &ResultView) {
    if view.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("Select seed images and press \"Upload & Analyze\".");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.heading("Analysis Results");
            ui.add_space(6.0);
            render_table(ui, &view.rows);

            if let Some(summary) = &view.summary {
                ui.add_space(16.0);
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.heading("Summary");
                        for figure in &summary.figures {
                            ui.label(egui::RichText::new(figure).size(18.0));
                        }
                    });
                    ui.add_space(48.0);
                    ui.vertical(|ui| {
                        ui.heading("Severity Distribution");
                        charts::pie_chart(ui, summary);
                    });
                });
            }

            ui.add_space(16.0);
            ui.heading("Pest Count Per Seed");
            charts::bar_chart(ui, &view.bars);
        });
}

fn render_table(ui: &mut egui::Ui, rows: &[TableRow]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .cell_layout(egui::Layout::centered_and_justified(
            egui::Direction::LeftToRight,
        ))
        .columns(Column::auto().at_least(110.0), TABLE_HEADERS.len())
        .header(24.0, |mut header| {
            for title in TABLE_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(20.0, |mut table_row| {
                    for cell in row.cells() {
                        table_row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}
