use std::fmt::Debug;

use slog::Logger;

use crate::dataset::Dataset;
use crate::syntax::graph::Passage;
use crate::syntax::transition::{Parser, Predictor};
use crate::utils::rand::Rng;

pub mod callbacks;

/// Online training of a predictor, one passage at a time.
///
/// Passages are processed sequentially so predictor updates keep a well-defined order.
#[derive(Debug)]
pub struct Trainer<P> {
    parser: Parser<P>,
    logger: Logger,
    callbacks: Vec<(u32, usize, String, Box<dyn Callback>)>,
}

impl<P: Predictor> Trainer<P> {
    pub fn new(parser: Parser<P>) -> Self {
        let logger = parser.logger().clone();
        Trainer {
            parser,
            logger,
            callbacks: vec![],
        }
    }

    pub fn parser(&self) -> &Parser<P> {
        &self.parser
    }

    pub fn parser_mut(&mut self) -> &mut Parser<P> {
        &mut self.parser
    }

    pub fn into_parser(self) -> Parser<P> {
        self.parser
    }

    /// Runs `n_epochs` passes over `train_dataset`, shuffled with `rng` before each pass.
    ///
    /// Returns the summary of the last epoch.
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        train_dataset: &mut Dataset<Passage>,
        valid_dataset: Option<&Dataset<Passage>>,
        n_epochs: u32,
        rng: &mut R,
    ) -> Option<EpochSummary> {
        self.callbacks
            .sort_by(|cb1, cb2| (-(cb1.0 as i64), cb1.1).cmp(&(-(cb2.0 as i64), cb2.1)));

        let mut last = None;
        for epoch in 1..=n_epochs {
            let mut info = TrainingInfo::new(n_epochs, epoch, train_dataset.len(), true);
            self.notify(Event::EpochBegin, &info);

            train_dataset.shuffle(rng);
            self.notify(Event::EpochTrainBegin, &info);
            self.process(train_dataset, &mut info);
            self.notify(Event::EpochTrainEnd, &info);
            let train = info.summary();
            info!(self.logger, "finished training epoch";
                  "epoch" => epoch,
                  "accuracy" => train.accuracy(),
                  "updates" => train.updates,
                  "failures" => train.failures);

            let valid = valid_dataset.map(|dataset| {
                let mut info = TrainingInfo::new(n_epochs, epoch, dataset.len(), false);
                self.notify(Event::EpochValidateBegin, &info);
                self.process(dataset, &mut info);
                self.notify(Event::EpochValidateEnd, &info);
                info.summary()
            });

            self.notify(Event::EpochEnd, &info);
            last = Some(EpochSummary {
                epoch,
                train,
                valid,
            });
        }
        last
    }

    fn process(&mut self, dataset: &Dataset<Passage>, info: &mut TrainingInfo) {
        for (index, passage) in dataset.iter().enumerate() {
            info.batch_index = Some(index);
            info.batch_size = Some(1);
            self.notify(Event::BatchBegin, info);
            let result = if info.train {
                self.parser.train(passage)
            } else {
                self.parser.evaluate(passage)
            };
            match result {
                Ok(parsed) => {
                    info.batch_correct = Some(parsed.correct);
                    info.batch_total = Some(parsed.total);
                    info.correct += parsed.correct;
                    info.total += parsed.total;
                    info.updates += parsed.updates;
                }
                Err(e) => {
                    warn!(self.logger, "skipped passage: {}", e; "passage" => passage.id());
                    info.batch_correct = None;
                    info.batch_total = None;
                    info.failures += 1;
                }
            }
            self.notify(Event::BatchEnd, info);
        }
        info.batch_index = None;
        info.batch_size = None;
    }

    pub fn add_callback<S: Into<String>, C: Callback + 'static>(&mut self, name: S, callback: C) {
        self.add_callback_with_priority(name, callback, 1000);
    }

    /// Callbacks with a higher priority are notified first.
    pub fn add_callback_with_priority<S: Into<String>, C: Callback + 'static>(
        &mut self,
        name: S,
        callback: C,
        priority: u32,
    ) {
        let name = name.into();
        self.remove_callback(&name);
        let index = self.callbacks.len();
        self.callbacks
            .push((priority, index, name, Box::new(callback)));
    }

    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.iter().any(|cb| cb.2 == name)
    }

    pub fn remove_callback(&mut self, name: &str) {
        if let Some(i) = self.callbacks.iter().position(|cb| cb.2 == name) {
            self.callbacks.remove(i);
        }
    }

    fn notify(&mut self, event: Event, info: &TrainingInfo) {
        for cb in self.callbacks.iter_mut() {
            let callback = &mut cb.3;
            match event {
                Event::EpochBegin => callback.on_epoch_begin(info),
                Event::EpochEnd => callback.on_epoch_end(info),
                Event::EpochTrainBegin => callback.on_epoch_train_begin(info),
                Event::EpochTrainEnd => callback.on_epoch_train_end(info),
                Event::EpochValidateBegin => callback.on_epoch_validate_begin(info),
                Event::EpochValidateEnd => callback.on_epoch_validate_end(info),
                Event::BatchBegin => callback.on_batch_begin(info),
                Event::BatchEnd => callback.on_batch_end(info),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingInfo {
    pub n_epochs: u32,
    pub epoch: u32,
    pub data_size: usize,
    pub train: bool,
    pub correct: usize,
    pub total: usize,
    pub updates: usize,
    pub failures: usize,
    pub batch_size: Option<usize>,
    pub batch_index: Option<usize>,
    pub batch_correct: Option<usize>,
    pub batch_total: Option<usize>,
}

impl TrainingInfo {
    fn new(n_epochs: u32, epoch: u32, data_size: usize, train: bool) -> Self {
        TrainingInfo {
            n_epochs,
            epoch,
            data_size,
            train,
            correct: 0,
            total: 0,
            updates: 0,
            failures: 0,
            batch_size: None,
            batch_index: None,
            batch_correct: None,
            batch_total: None,
        }
    }

    fn summary(&self) -> Summary {
        Summary {
            correct: self.correct,
            total: self.total,
            updates: self.updates,
            failures: self.failures,
        }
    }
}

/// Counts gathered over one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub correct: usize,
    pub total: usize,
    pub updates: usize,
    pub failures: usize,
}

impl Summary {
    pub fn accuracy(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    pub epoch: u32,
    pub train: Summary,
    pub valid: Option<Summary>,
}

#[derive(Debug, Clone, Copy)]
enum Event {
    EpochBegin,
    EpochEnd,
    EpochTrainBegin,
    EpochTrainEnd,
    EpochValidateBegin,
    EpochValidateEnd,
    BatchBegin,
    BatchEnd,
}

#[allow(unused_variables)]
pub trait Callback: Debug {
    fn on_epoch_begin(&mut self, info: &TrainingInfo) {}
    fn on_epoch_end(&mut self, info: &TrainingInfo) {}
    fn on_epoch_train_begin(&mut self, info: &TrainingInfo) {}
    fn on_epoch_train_end(&mut self, info: &TrainingInfo) {}
    fn on_epoch_validate_begin(&mut self, info: &TrainingInfo) {}
    fn on_epoch_validate_end(&mut self, info: &TrainingInfo) {}
    fn on_batch_begin(&mut self, info: &TrainingInfo) {}
    fn on_batch_end(&mut self, info: &TrainingInfo) {}
}
