//! Settings panel rendering for the endpoint and version info.

use super::UiApp;
use anyhow::{Context, Result};
use eframe::egui;

impl UiApp {
    /// Renders the settings screen: endpoint, wire field name and versions.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);
        let busy = !self.state.can_upload();
        ui.horizontal(|ui| {
            ui.label("Inference endpoint");
            ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(&mut self.endpoint_input).desired_width(360.0),
            );
            let changed = self.endpoint_input.trim() != self.config.endpoint;
            if ui
                .add_enabled(!busy && changed, egui::Button::new("Apply"))
                .clicked()
            {
                self.apply_endpoint();
            }
        });
        ui.label(format!(
            "Files are sent under the multipart field \"{}\", which must match the server.",
            self.config.field_name
        ));
        if let Some(path) = &self.config_path {
            ui.label(format!("Configuration file: {}", path.display()));
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading("Versions");
        ui.label(format!("App version: {}", self.app_version));
    }

    fn apply_endpoint(&mut self) {
        let endpoint = self.endpoint_input.trim().to_string();
        if endpoint.is_empty() {
            self.status = "Endpoint cannot be empty".to_string();
            return;
        }
        self.config.endpoint = endpoint;
        self.endpoint_input = self.config.endpoint.clone();
        self.status = match self.persist_config() {
            Ok(()) => format!("Endpoint set to {}", self.config.endpoint),
            Err(e) => {
                tracing::warn!("Could not save config: {e:#}");
                format!("Endpoint set for this session only: {e:#}")
            }
        };
    }

    fn persist_config(&self) -> Result<()> {
        let path = self
            .config_path
            .as_deref()
            .context("no configuration directory on this platform")?;
        self.config.save(path)
    }
}
