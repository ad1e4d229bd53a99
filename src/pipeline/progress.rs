// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for indexing
// reference: uses indicatif for progress bars and tracks indexing metrics

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub documents_indexed: usize,
    pub bytes_indexed: u64,
    pub duration: Duration,
}

impl IndexStats {
    pub fn summary(&self) -> String {
        format!(
            "{} pages, {} bytes in {:.2}s ({:.1} pages/s)",
            self.documents_indexed,
            self.bytes_indexed,
            self.duration.as_secs_f64(),
            self.documents_per_second()
        )
    }

    pub fn documents_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.documents_indexed as f64 / secs
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    documents_indexed: usize,
    bytes_indexed: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_documents: usize, colored: bool) -> Self {
        let bar = ProgressBar::new(total_documents as u64);
        bar.set_style(bar_style(colored));
        Self::from_bar(bar)
    }

    /// Tracks counts without drawing anything.
    pub fn hidden(total_documents: usize) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(total_documents as u64),
            ProgressDrawTarget::hidden(),
        );
        Self::from_bar(bar)
    }

    fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            documents_indexed: 0,
            bytes_indexed: 0,
            start_time: Instant::now(),
        }
    }

    pub fn set_page(&self, page: u32) {
        self.bar.set_message(format!("page {}", page));
    }

    pub fn inc_indexed(&mut self, bytes: u64) {
        self.documents_indexed += 1;
        self.bytes_indexed += bytes;
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Indexing complete");
    }

    pub fn abandon(&self) {
        self.bar.abandon_with_message("Indexing failed");
    }

    pub fn get_stats(&self) -> IndexStats {
        IndexStats {
            documents_indexed: self.documents_indexed,
            bytes_indexed: self.bytes_indexed,
            duration: self.start_time.elapsed(),
        }
    }
}

fn bar_style(colored: bool) -> ProgressStyle {
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            "█▓▒░",
        )
    } else {
        (
            "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}",
            "=>-",
        )
    };

    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}
