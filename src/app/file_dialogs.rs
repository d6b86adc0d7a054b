// file_dialogs.rs
use rfd::FileDialog;
use std::path::PathBuf;

pub fn select_input_directory() -> Option<PathBuf> {
    FileDialog::new().set_title("Select Input Directory").pick_folder()
}

pub fn select_output_directory() -> Option<PathBuf> {
    FileDialog::new().set_title("Select Output Directory").pick_folder()
}
