use inquire::{InquireError, Text};
use std::path::Path;

/// Console seam of the output writer.
pub trait ConflictPrompt {
    /// Reads one answer for a destination that already exists.
    fn ask(&mut self, destination: &Path) -> Result<String, InquireError>;

    /// Shows a diff or the answer legend.
    fn show(&mut self, text: &str);
}

pub struct InquirePrompt;

impl ConflictPrompt for InquirePrompt {
    fn ask(&mut self, destination: &Path) -> Result<String, InquireError> {
        let message = format!(
            "{} already exists. Overwrite? (enter \"h\" for help) [ynaqdh]",
            destination.display()
        );
        match Text::new(&message).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                Ok("q".to_string())
            }
            Err(err) => Err(err),
        }
    }

    fn show(&mut self, text: &str) {
        println!("{}", text);
    }
}
