use crate::traversal::member::MemberProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Spinner for the discovery phase, before the member count is known.
    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb
    }

    /// Bar over the model's members once discovery has counted them.
    pub fn create_member_progress(&self, total_members: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_members));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>5}/{len:5} members {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Sampling results...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }

    pub fn clear(&self) {
        if self.enabled {
            self.multi_progress.clear().ok();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_member_progress(pb: &ProgressBar, progress: &MemberProgress) {
    pb.set_position(progress.members_processed as u64);
    pb.set_message(format!(
        "{} ({} rows)",
        progress.current_member, progress.rows
    ));
}

pub fn finish_progress(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_manager_hands_out_hidden_bars() {
        let manager = ProgressManager::new(false);
        assert!(!manager.is_enabled());
        assert!(manager.create_spinner("probing").is_hidden());
        assert!(manager.create_member_progress(10).is_hidden());
    }

    #[test]
    fn test_member_progress_update() {
        let pb = ProgressBar::hidden();
        update_member_progress(
            &pb,
            &MemberProgress {
                members_processed: 3,
                members_total: 10,
                rows: 33,
                current_member: "B3".to_string(),
            },
        );
        assert_eq!(pb.position(), 3);
    }

    #[test]
    fn test_suspend_runs_closure_when_disabled() {
        let manager = ProgressManager::new(false);
        let value = manager.suspend(|| 7);
        assert_eq!(value, 7);
    }
}
