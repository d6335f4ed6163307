use std::fmt;
use std::io::{stderr, stdout, Stderr, Stdout, Write};

use pbr::ProgressBar as ProgressBarImpl;
use slog::Logger;

use crate::training::{Callback, TrainingInfo};

/// Logs the transition accuracy of each pass.
#[derive(Debug)]
pub struct Reporter {
    logger: Logger,
    correct: usize,
    total: usize,
}

impl Reporter {
    pub fn new(logger: Logger) -> Self {
        Reporter {
            logger,
            correct: 0,
            total: 0,
        }
    }

    pub fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
    }

    pub fn count(&mut self, correct: usize, total: usize) {
        self.correct += correct;
        self.total += total;
    }

    pub fn accuracy(&self) -> Option<f64> {
        if self.total > 0 {
            Some(self.correct as f64 / self.total as f64)
        } else {
            None
        }
    }

    fn report(&self, label: &str, info: &TrainingInfo) {
        match self.accuracy() {
            Some(acc) => info!(
                self.logger,
                "[{}] epoch {} - #samples: {}, accuracy: {:.8}, updates: {}, failures: {}",
                label,
                info.epoch,
                info.data_size,
                acc,
                info.updates,
                info.failures
            ),
            None => info!(
                self.logger,
                "[{}] epoch {} - #samples: {}, accuracy: NaN, failures: {}",
                label,
                info.epoch,
                info.data_size,
                info.failures
            ),
        }
    }
}

impl Callback for Reporter {
    fn on_epoch_train_begin(&mut self, _info: &TrainingInfo) {
        self.reset();
    }

    fn on_epoch_train_end(&mut self, info: &TrainingInfo) {
        self.report("training", info);
    }

    fn on_epoch_validate_begin(&mut self, _info: &TrainingInfo) {
        self.reset();
    }

    fn on_epoch_validate_end(&mut self, info: &TrainingInfo) {
        self.report("validation", info);
    }

    fn on_batch_end(&mut self, info: &TrainingInfo) {
        if let (Some(correct), Some(total)) = (info.batch_correct, info.batch_total) {
            self.count(correct, total);
        }
    }
}

/// Terminal progress bar over the passages of a training pass.
pub struct ProgressBar<W: Write> {
    pbar: Option<ProgressBarImpl<W>>,
}

impl<W: Write> ProgressBar<W> {
    pub fn new() -> Self {
        ProgressBar { pbar: None }
    }

    pub fn init(&mut self, handle: W, total: u64) {
        let mut pbar = ProgressBarImpl::on(handle, total);
        pbar.tick();
        self.pbar = Some(pbar);
    }

    pub fn add(&mut self, i: u64) -> u64 {
        self.pbar.as_mut().map_or(0, |pbar| pbar.add(i))
    }

    pub fn finish(&mut self) {
        if let Some(mut pbar) = self.pbar.take() {
            pbar.finish();
        }
    }
}

impl<W: Write> Default for ProgressBar<W> {
    fn default() -> Self {
        ProgressBar::new()
    }
}

impl<W: Write> fmt::Debug for ProgressBar<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ProgressBar")
            .field("active", &self.pbar.is_some())
            .finish()
    }
}

macro_rules! impl_progress_callback {
    ($stream:ty, $handle:expr) => {
        impl Callback for ProgressBar<$stream> {
            fn on_epoch_train_begin(&mut self, info: &TrainingInfo) {
                self.init($handle, info.data_size as u64);
            }

            fn on_batch_end(&mut self, info: &TrainingInfo) {
                self.add(info.batch_size.unwrap_or(1) as u64);
            }

            fn on_epoch_train_end(&mut self, _info: &TrainingInfo) {
                self.finish();
            }
        }
    };
}

impl_progress_callback!(Stdout, stdout());
impl_progress_callback!(Stderr, stderr());
