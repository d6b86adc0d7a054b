// app.rs
pub mod file_dialogs;
pub mod gui;

use crate::batch::BatchOutcome;
use crate::convert::DEFAULT_QUALITY;
use eframe::egui;
use eframe::App as EframeApp;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// How many converted files / errors the result log lists before truncating.
const MAX_LISTED_SUCCESSES: usize = 10;
const MAX_LISTED_ERRORS: usize = 5;

pub struct App {
    pub input_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub quality: u8,
    pub converting: bool,
    pub conversion_progress: Arc<Mutex<ConversionProgress>>,
    pub log_messages: Arc<Mutex<Vec<String>>>,
    pub conversion_receiver: Option<Receiver<ConversionUpdate>>,
}

/// Messages posted by the worker thread, drained on each frame.
pub enum ConversionUpdate {
    Progress(usize, usize, String), // (index, total, filename)
    Finished(BatchOutcome),
    Failed(String),
}

pub struct ConversionProgress {
    pub current: usize,
    pub total: usize,
    pub status: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_directory: None,
            output_directory: None,
            quality: DEFAULT_QUALITY,
            converting: false,
            conversion_progress: Arc::new(Mutex::new(ConversionProgress {
                current: 0,
                total: 0,
                status: "Ready".to_string(),
            })),
            log_messages: Arc::new(Mutex::new(Vec::new())),
            conversion_receiver: None,
        }
    }
}

impl EframeApp for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut completed = false;
        let mut needs_redraw = false;

        if let Some(receiver) = &self.conversion_receiver {
            while let Ok(update) = receiver.try_recv() {
                match update {
                    ConversionUpdate::Progress(current, total, filename) => {
                        let mut progress = self.conversion_progress.lock();
                        progress.current = current;
                        progress.total = total;
                        progress.status = if current == total {
                            filename
                        } else {
                            format!("Converting: {} ({}/{})", filename, current + 1, total)
                        };
                        drop(progress); // Release the lock as soon as possible
                        needs_redraw = true;
                    }
                    ConversionUpdate::Finished(outcome) => {
                        self.append_summary(&outcome);
                        completed = true;
                        needs_redraw = true;
                    }
                    ConversionUpdate::Failed(message) => {
                        self.log_messages
                            .lock()
                            .push(format!("Conversion failed: {}", message));
                        completed = true;
                        needs_redraw = true;
                    }
                }
            }
        }

        if completed {
            self.conversion_receiver = None;
            self.converting = false;
            let mut progress = self.conversion_progress.lock();
            progress.current = 0;
            progress.total = 0;
            progress.status = "Ready".to_string();
        }

        // Render the GUI
        gui::render(self, ctx);

        if needs_redraw {
            ctx.request_repaint();
        }
    }
}

impl App {
    /// Append the end-of-batch summary block to the result log.
    fn append_summary(&self, outcome: &BatchOutcome) {
        let mut log = self.log_messages.lock();
        log.push("Conversion complete!".to_string());
        log.push(format!(
            "Successfully converted: {} files",
            outcome.converted.len()
        ));
        log.push(format!("Errors: {}", outcome.errors.len()));

        if !outcome.converted.is_empty() {
            log.push("Converted files:".to_string());
            for path in outcome.converted.iter().take(MAX_LISTED_SUCCESSES) {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                log.push(format!("✓ {}", name));
            }
            if outcome.converted.len() > MAX_LISTED_SUCCESSES {
                log.push(format!(
                    "... and {} more",
                    outcome.converted.len() - MAX_LISTED_SUCCESSES
                ));
            }
        }

        if !outcome.errors.is_empty() {
            for error in outcome.errors.iter().take(MAX_LISTED_ERRORS) {
                log.push(format!("✗ {}", error));
            }
            if outcome.errors.len() > MAX_LISTED_ERRORS {
                log.push(format!(
                    "... and {} more errors",
                    outcome.errors.len() - MAX_LISTED_ERRORS
                ));
            }
        }
    }
}

/// Open the application window and block until it is closed.
pub fn launch() {
    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::Vec2::new(600.0, 500.0)),
        resizable: true,
        ..Default::default()
    };
    eframe::run_native(
        "PNG to JPG Batch Converter",
        native_options,
        Box::new(|_cc| Box::new(App::default())),
    );
}
