//! Progress reporting for query processing

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use weather_application::ports::progress::QueryProgressNotifier;
use weather_domain::Stage;

/// Spinner while classifying, a bar while gathering upstream data
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn gather_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn stage_display_name(stage: Stage) -> &'static str {
        match stage {
            Stage::Start => "Starting",
            Stage::Classified => "Classifying query",
            Stage::LocationsExtracted => "Resolving locations",
            Stage::DataGathered => "Gathering weather data",
            Stage::Responded => "Formatting response",
            Stage::Done => "Done",
        }
    }

    fn replace(&self, bar: Option<ProgressBar>) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            *slot = bar;
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryProgressNotifier for ProgressReporter {
    fn on_stage(&self, stage: Stage) {
        if stage.is_terminal() {
            self.replace(None);
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(Self::stage_display_name(stage));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.replace(Some(pb));
    }

    fn on_gather_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::gather_style());
        pb.set_prefix("Fetching");
        pb.set_message("Starting...");
        self.replace(Some(pb));
    }

    fn on_call_complete(&self, label: &str, success: bool) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), label)
            } else {
                format!("{} {}", "x".red(), label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_finished(&self) {
        self.replace(None);
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl QueryProgressNotifier for SimpleProgress {
    fn on_stage(&self, stage: Stage) {
        if !stage.is_terminal() {
            println!(
                "{} {}",
                "->".cyan(),
                ProgressReporter::stage_display_name(stage).bold()
            );
        }
    }

    fn on_gather_start(&self, total: usize) {
        println!("{} Fetching ({} calls)", "->".cyan(), total);
    }

    fn on_call_complete(&self, label: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), label);
        } else {
            println!("  {} {} (failed)", "x".red(), label);
        }
    }
}
