//! Top-level eframe application: owns the state and wires buttons to the core.

mod charts;
mod results;
mod settings;
mod upload_job;

use anyhow::{Context, Result};
use eframe::{App, Frame, egui};
use rfd::FileDialog;
use seed_core::{
    AppState, ClientConfig, ReqwestTransport, ResultView, SelectedFile, UploadClient, UploadError,
    save_csv,
};
use std::path::PathBuf;
use upload_job::{JobPoll, UploadJob};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Results,
    Settings,
}

pub struct UiApp {
    state: AppState,
    config: ClientConfig,
    config_path: Option<PathBuf>,
    endpoint_input: String,
    transport: ReqwestTransport,
    job: Option<UploadJob>,
    panel: Panel,
    status: String,
    app_version: &'static str,
}

fn config_path() -> Option<PathBuf> {
    directories_next::ProjectDirs::from("org", "SeedAnalyzer", "SeedAnalyzer")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl UiApp {
    pub fn new() -> Self {
        let config_path = config_path();
        let config = match config_path.as_deref() {
            Some(path) => ClientConfig::load_or_default(path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config: {e:#}");
                ClientConfig::default()
            }),
            None => ClientConfig::default(),
        };
        tracing::info!("Using inference endpoint {}", config.endpoint);
        Self {
            state: AppState::default(),
            endpoint_input: config.endpoint.clone(),
            config,
            config_path,
            transport: ReqwestTransport::new(),
            job: None,
            panel: Panel::Results,
            status: String::new(),
            app_version: env!("SEED_ANALYZER_VERSION"),
        }
    }

    fn pick_files(&mut self) {
        if let Some(paths) = FileDialog::new().set_directory(".").pick_files() {
            self.state
                .set_files(paths.into_iter().map(SelectedFile::from_path));
            self.status = format!("{} file(s) selected", self.state.selection().len());
        }
    }

    fn start_upload(&mut self, ctx: &egui::Context) {
        let files = match self.state.begin_upload() {
            Ok(files) => files,
            Err(UploadError::Busy) => return,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };
        let client = UploadClient::new(self.transport.clone(), &self.config);
        let repaint = ctx.clone();
        self.job = Some(UploadJob::spawn(client, files, move || {
            repaint.request_repaint()
        }));
        self.status = "Analyzing...".to_string();
    }

    fn poll_upload(&mut self) {
        let Some(job) = &self.job else {
            return;
        };
        let file_count = job.file_count();
        let JobPoll::Finished { outcome, elapsed } = job.poll() else {
            return;
        };
        self.job = None;
        match &outcome {
            Ok(batch) => {
                self.status = format!(
                    "Analyzed {} seeds from {file_count} file(s) in {:.1?} at {}",
                    batch.results().len(),
                    elapsed,
                    chrono::Local::now().format("%H:%M:%S")
                );
                self.panel = Panel::Results;
            }
            Err(e) => {
                tracing::warn!("Upload failed: {e}");
                self.status = e.to_string();
            }
        }
        self.state.finish_upload(outcome);
    }

    fn export_csv(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(&self.config.export_file_name)
            .save_file()
        else {
            return;
        };
        match save_csv(self.state.store().results(), &path) {
            Ok(true) => self.status = format!("CSV exported: {}", path.display()),
            Ok(false) => self.status = "Nothing to export".to_string(),
            Err(e) => self.status = format!("Export failed: {e:#}"),
        }
    }

    fn copy_csv(&mut self) {
        match self.copy_csv_inner() {
            Ok(()) => self.status = "CSV copied to clipboard".to_string(),
            Err(e) => self.status = format!("Copy failed: {e:#}"),
        }
    }

    fn copy_csv_inner(&self) -> Result<()> {
        let text = String::from_utf8(self.state.export_csv()?)?;
        let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
        clipboard.set_text(text)?;
        Ok(())
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.notice() else {
            return;
        };
        let message = notice.user_message(&self.config.endpoint);
        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.state.take_notice();
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let busy = !self.state.can_upload();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!busy, egui::Button::new("Choose images..."))
                .clicked()
            {
                self.pick_files();
            }

            let upload_label = if busy {
                "Analyzing..."
            } else {
                "Upload & Analyze"
            };
            if ui
                .add_enabled(!busy, egui::Button::new(upload_label))
                .clicked()
            {
                self.start_upload(ctx);
            }
            if busy {
                ui.spinner();
            }

            let can_export = self.state.can_export();
            if ui
                .add_enabled(can_export, egui::Button::new("Download CSV"))
                .clicked()
            {
                self.export_csv();
            }
            if ui
                .add_enabled(can_export, egui::Button::new("Copy CSV"))
                .clicked()
            {
                self.copy_csv();
            }

            ui.separator();
            ui.selectable_value(&mut self.panel, Panel::Results, "Results");
            ui.selectable_value(&mut self.panel, Panel::Settings, "Settings");

            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_upload();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.heading("Soybean Seed Analyzer");
            ui.label("Seed damage and pest infestation analysis");
            ui.add_space(4.0);
            self.render_toolbar(ui, ctx);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            Panel::Results => {
                let view = ResultView::from_store(self.state.store());
                results::render_results(ui, &view);
            }
            Panel::Settings => self.render_settings_panel(ui),
        });

        self.render_notice(ctx);
    }
}
