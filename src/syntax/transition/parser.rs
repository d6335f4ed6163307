use slog::Logger;

use super::{Action, Config, Error, Oracle, State};
use crate::lang::Tokenized;
use crate::syntax::graph::Passage;

/// Supplies the action to apply next.
pub trait ActionSource {
    fn next_action(&mut self, state: &State) -> Result<Action, Error>;
}

/// Statistical action scorer, treated as a black box.
pub trait Predictor {
    /// Candidate actions, best first.
    fn predict(&self, state: &State) -> Vec<Action>;

    /// Learns from a wrong prediction; returns whether the parameters changed.
    fn update(&mut self, state: &State, predicted: &Action, gold: &Action) -> bool;
}

/// Applies the highest ranked legal prediction.
#[derive(Debug)]
pub struct Inference<'p, P: ?Sized> {
    predictor: &'p P,
}

impl<'p, P: Predictor + ?Sized> Inference<'p, P> {
    pub fn new(predictor: &'p P) -> Self {
        Inference { predictor }
    }
}

impl<'p, P: Predictor + ?Sized> ActionSource for Inference<'p, P> {
    fn next_action(&mut self, state: &State) -> Result<Action, Error> {
        self.predictor
            .predict(state)
            .into_iter()
            .find(|action| state.is_allowed(action))
            .ok_or_else(|| Error::NoLegalAction {
                state: state.to_string(),
            })
    }
}

/// Follows the oracle while scoring the predictor against it.
///
/// The update hook is called at most once per transition, only when the best legal prediction
/// differs from the oracle action.
#[derive(Debug)]
pub struct Supervised<'o, 'p, P: ?Sized> {
    oracle: Oracle<'o>,
    predictor: &'p mut P,
    learn: bool,
    correct: usize,
    total: usize,
    updates: usize,
}

impl<'o, 'p, P: Predictor + ?Sized> Supervised<'o, 'p, P> {
    pub fn new(oracle: Oracle<'o>, predictor: &'p mut P, learn: bool) -> Self {
        Supervised {
            oracle,
            predictor,
            learn,
            correct: 0,
            total: 0,
            updates: 0,
        }
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl<'o, 'p, P: Predictor + ?Sized> ActionSource for Supervised<'o, 'p, P> {
    fn next_action(&mut self, state: &State) -> Result<Action, Error> {
        let gold = self.oracle.next_action(state)?;
        let predicted = self
            .predictor
            .predict(state)
            .into_iter()
            .find(|action| state.is_allowed_prediction(action));
        self.total += 1;
        match predicted {
            Some(ref action) if *action == gold => self.correct += 1,
            Some(ref action) if self.learn => {
                if self.predictor.update(state, action, &gold) {
                    self.updates += 1;
                }
            }
            _ => {}
        }
        Ok(gold)
    }
}

/// Applies actions from `source` until FINISH.
pub fn run<S: ActionSource + ?Sized>(
    state: &mut State,
    source: &mut S,
    logger: &Logger,
) -> Result<(), Error> {
    while !state.is_finished() {
        let action = source.next_action(state)?;
        trace!(logger, "transition";
               "step" => state.step(),
               "action" => %action,
               "state" => %state);
        state.transition(action)?;
    }
    Ok(())
}

/// A state driven to completion by the oracle.
#[derive(Debug)]
pub struct GoldState {
    internal: State,
}

impl GoldState {
    pub fn new(passage: &Passage, config: &Config) -> Result<Self, Error> {
        GoldState::with_feature_extract(passage, config, |_| ()).map(|(state, _)| state)
    }

    /// Also collects `extract` applied to every state an action is taken from.
    pub fn with_feature_extract<F, O>(
        passage: &Passage,
        config: &Config,
        mut extract: F,
    ) -> Result<(Self, Vec<O>), Error>
    where
        F: FnMut(&State) -> O,
    {
        let mut internal = State::from_passage(passage, config);
        let mut oracle = Oracle::new(passage, config);
        let mut features = vec![];
        while !internal.is_finished() {
            features.push(extract(&internal));
            let action = oracle.next_action(&internal)?;
            internal.transition(action)?;
        }
        Ok((GoldState { internal }, features))
    }

    pub fn state(&self) -> &State {
        &self.internal
    }

    pub fn actions(&self) -> &[Action] {
        self.internal.actions()
    }

    pub fn into_inner(self) -> State {
        self.internal
    }
}

/// Outcome of a single parse.
#[derive(Debug)]
pub struct Parsed {
    pub passage: Passage,
    pub actions: Vec<Action>,
    pub correct: usize,
    pub total: usize,
    pub updates: usize,
    /// Structural violations tolerated while assembling the output.
    pub warnings: Vec<Error>,
}

impl Parsed {
    pub fn accuracy(&self) -> Option<f64> {
        if self.total > 0 {
            Some(self.correct as f64 / self.total as f64)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct Parser<P> {
    config: Config,
    predictor: P,
    logger: Logger,
}

impl<P: Predictor> Parser<P> {
    pub fn new(config: Config, predictor: P, logger: Logger) -> Self {
        Parser {
            config,
            predictor,
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn predictor_mut(&mut self) -> &mut P {
        &mut self.predictor
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn into_predictor(self) -> P {
        self.predictor
    }

    /// Parses bare tokens with the predictor alone.
    pub fn parse<S: Into<String>, T: Tokenized>(
        &self,
        id: S,
        tokens: &[T],
    ) -> Result<Parsed, Error> {
        let mut state = State::new(id, tokens, &self.config);
        let mut source = Inference::new(&self.predictor);
        run(&mut state, &mut source, &self.logger)?;
        let (passage, warnings) = state.create_passage(false)?;
        for warning in &warnings {
            warn!(self.logger, "{}", warning; "passage" => state.passage_id());
        }
        Ok(Parsed {
            passage,
            actions: state.actions().to_vec(),
            correct: 0,
            total: 0,
            updates: 0,
            warnings,
        })
    }

    /// Parses `passage` following the oracle, updating the predictor on every mistake.
    pub fn train(&mut self, passage: &Passage) -> Result<Parsed, Error> {
        self.supervised(passage, true)
    }

    /// Scores the predictor against the oracle without updating it.
    pub fn evaluate(&mut self, passage: &Passage) -> Result<Parsed, Error> {
        self.supervised(passage, false)
    }

    fn supervised(&mut self, passage: &Passage, learn: bool) -> Result<Parsed, Error> {
        let mut state = State::from_passage(passage, &self.config);
        let oracle = Oracle::new(passage, &self.config);
        let mut source = Supervised::new(oracle, &mut self.predictor, learn);
        run(&mut state, &mut source, &self.logger)?;
        let (correct, total, updates) = (source.correct(), source.total(), source.updates());
        let (output, warnings) = state.create_passage(true)?;
        debug!(self.logger, "parsed passage";
               "passage" => passage.id(),
               "correct" => correct,
               "total" => total,
               "updates" => updates);
        Ok(Parsed {
            passage: output,
            actions: state.actions().to_vec(),
            correct,
            total,
            updates,
            warnings,
        })
    }
}
