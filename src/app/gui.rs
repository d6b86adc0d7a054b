use crate::app::file_dialogs;
use crate::app::{App, ConversionUpdate};
use crate::batch::BatchRunner;
use crate::convert::Converter;
use crate::utils;
use egui::{Color32, Frame, ProgressBar, RichText, Rounding, Slider, Stroke};
use std::sync::mpsc::channel;

const ACCENT: Color32 = Color32::from_rgb(100, 200, 250);

pub fn render(app: &mut App, ctx: &egui::Context) {
    let frame = Frame {
        fill: Color32::from_rgb(30, 30, 40),
        rounding: Rounding::same(10.0),
        stroke: Stroke::new(1.0, ACCENT),
        inner_margin: egui::style::Margin::same(20.0),
        ..Default::default()
    };

    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        ui.heading(
            RichText::new("PNG to JPG Batch Converter")
                .size(28.0)
                .color(ACCENT),
        );
        ui.add_space(20.0);

        let button_width = 200.0;

        ui.horizontal(|ui| {
            if ui
                .add_sized([button_width, 30.0], egui::Button::new("Input Directory"))
                .clicked()
            {
                if let Some(dir) = file_dialogs::select_input_directory() {
                    // Mirror the input as the output default until one is picked.
                    if app.output_directory.is_none() {
                        app.output_directory = Some(dir.clone());
                    }
                    app.input_directory = Some(dir);
                    app.log_messages
                        .lock()
                        .push(format!("[{}] Input directory selected.", utils::timestamp()));
                }
            }
            match &app.input_directory {
                Some(dir) => ui.label(dir.to_string_lossy()),
                None => ui.label("Not selected"),
            };
        });
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if ui
                .add_sized([button_width, 30.0], egui::Button::new("Output Directory"))
                .clicked()
            {
                if let Some(dir) = file_dialogs::select_output_directory() {
                    app.output_directory = Some(dir);
                    app.log_messages
                        .lock()
                        .push(format!("[{}] Output directory selected.", utils::timestamp()));
                }
            }
            match &app.output_directory {
                Some(dir) => ui.label(dir.to_string_lossy()),
                None => ui.label("Not selected (will use input directory)"),
            };
        });

        ui.add_space(10.0);
        ui.add(Slider::new(&mut app.quality, 1..=100).text("JPG Quality"));
        ui.add_space(10.0);

        ui.add_enabled_ui(!app.converting, |ui| {
            if ui
                .add_sized([button_width, 30.0], egui::Button::new("Convert PNG to JPG"))
                .clicked()
            {
                match &app.input_directory {
                    None => {
                        app.log_messages.lock().push(format!(
                            "[{}] Please select an input directory first.",
                            utils::timestamp()
                        ));
                    }
                    Some(dir) if !dir.is_dir() => {
                        app.log_messages.lock().push(format!(
                            "[{}] Input directory does not exist.",
                            utils::timestamp()
                        ));
                    }
                    Some(_) => {
                        start_conversion(app);
                    }
                }
            }
        });

        ui.add_space(10.0);

        {
            let progress = app.conversion_progress.lock();
            ui.label(&progress.status);
            if progress.total > 0 {
                let ratio = progress.current as f32 / progress.total as f32;
                ui.add(ProgressBar::new(ratio).text(format!("{:.0}%", ratio * 100.0)));
            }
        }

        ui.add_space(10.0);

        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Results").size(16.0).color(ACCENT));
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let logs = app.log_messages.lock();
                    for log in logs.iter() {
                        if log.starts_with('✗') || log.contains("failed") {
                            ui.label(RichText::new(log).color(Color32::RED));
                        } else {
                            ui.label(log);
                        }
                    }
                });
        });
    });
}

fn start_conversion(app: &mut App) {
    let Some(input_dir) = app.input_directory.clone() else {
        return;
    };
    // When the output equals the input, fall back to per-file parents so
    // nested sources keep their JPGs next to them.
    let output_dir = match &app.output_directory {
        Some(dir) if *dir == input_dir => None,
        other => other.clone(),
    };
    let quality = app.quality;

    {
        let mut progress = app.conversion_progress.lock();
        progress.current = 0;
        progress.total = 0;
        progress.status = "Starting conversion...".to_string();
    }
    {
        let mut log = app.log_messages.lock();
        log.clear();
        log.push(format!("[{}] Starting conversion...", utils::timestamp()));
    }

    let (sender, receiver) = channel();
    app.conversion_receiver = Some(receiver);
    app.converting = true;

    std::thread::spawn(move || {
        let runner = BatchRunner::new(Converter::with_quality(quality));
        let result = runner.run(&input_dir, output_dir.as_deref(), |index, total, name| {
            sender
                .send(ConversionUpdate::Progress(index, total, name.to_string()))
                .ok();
        });
        let update = match result {
            Ok(outcome) => ConversionUpdate::Finished(outcome),
            Err(e) => ConversionUpdate::Failed(e.to_string()),
        };
        sender.send(update).ok();
    });
}
