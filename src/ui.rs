use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

impl UiMode {
    pub fn parse(flag: &str) -> Self {
        match flag {
            "plain" => UiMode::Plain,
            "pretty" => UiMode::Pretty,
            _ => UiMode::Auto,
        }
    }
}

/// Stage progress on stderr. Stdout stays reserved for the report.
#[derive(Clone, Debug)]
pub struct Ui {
    pretty: bool,
}

impl Ui {
    /// `report_to_tty` disables spinners in auto mode so they don't
    /// interleave with a report printed on the same terminal.
    pub fn new(mode: UiMode, stderr_is_tty: bool, report_to_tty: bool) -> Self {
        let pretty = stderr_is_tty
            && match mode {
                UiMode::Pretty => true,
                UiMode::Auto => !report_to_tty,
                UiMode::Plain => false,
            };
        Self { pretty }
    }

    pub fn stage(&self, name: &str) -> Stage {
        let spinner = if self.pretty {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(format!("{name}…"));
            Some(spinner)
        } else {
            eprintln!("==> {}", name);
            None
        };
        Stage {
            name: name.to_string(),
            start: Instant::now(),
            spinner,
        }
    }
}

/// Prints the stage duration when dropped.
pub struct Stage {
    name: String,
    start: Instant,
    spinner: Option<ProgressBar>,
}

impl Drop for Stage {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let message = if elapsed.as_secs() >= 1 {
            format!("✔ {} ({:.2}s)", self.name, elapsed.as_secs_f64())
        } else {
            format!("✔ {} ({}ms)", self.name, elapsed.as_millis())
        };
        match &self.spinner {
            Some(spinner) => spinner.finish_with_message(message),
            None => eprintln!("{message}"),
        }
    }
}
