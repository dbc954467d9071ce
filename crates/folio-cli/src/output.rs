use std::io::Write;
use std::time::Duration;

use folio_tei::Sections;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Spinner shown while waiting on an external service.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the extracted sections, one block per section.
pub fn print_sections(
    w: &mut dyn Write,
    sections: &Sections,
    color: ColorMode,
) -> std::io::Result<()> {
    if sections.is_empty() {
        writeln!(w, "No sections could be extracted from the document.")?;
        return Ok(());
    }

    for (section, text) in sections {
        if color.enabled() {
            writeln!(w, "{}", format!("== {section} ==").cyan().bold())?;
        } else {
            writeln!(w, "== {section} ==")?;
        }
        writeln!(w, "{text}")?;
        writeln!(w)?;
    }
    Ok(())
}

/// Print the model's answer.
pub fn print_answer(w: &mut dyn Write, answer: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "== answer ==".green().bold())?;
    } else {
        writeln!(w, "== answer ==")?;
    }
    writeln!(w, "{answer}")?;
    Ok(())
}
