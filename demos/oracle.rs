#[macro_use]
extern crate slog;

use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;

use dagparse::dataset::{self, Dataset};
use dagparse::logging::{self, Level};
use dagparse::syntax::graph::Passage;
use dagparse::syntax::transition::{Action, Config, GoldState, Parser, Predictor, State};
use dagparse::training::callbacks::{ProgressBar, Reporter};
use dagparse::training::Trainer;
use dagparse::utils;
use slog::Logger;
use structopt::StructOpt;

/// Ranks actions by how often the oracle chose them after the same previous action.
#[derive(Debug, Default)]
struct BigramPredictor {
    counts: HashMap<(Option<Action>, Action), u32>,
}

impl Predictor for BigramPredictor {
    fn predict(&self, state: &State) -> Vec<Action> {
        let prev = state.actions().last().cloned();
        let mut candidates: Vec<(&Action, u32)> = self
            .counts
            .iter()
            .filter(|((p, _), _)| *p == prev)
            .map(|((_, action), &count)| (action, count))
            .collect();
        candidates.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
        });
        candidates.into_iter().map(|(action, _)| action.clone()).collect()
    }

    fn update(&mut self, state: &State, _predicted: &Action, gold: &Action) -> bool {
        let prev = state.actions().last().cloned();
        *self.counts.entry((prev, gold.clone())).or_insert(0) += 1;
        true
    }
}

fn show(
    passages: &Dataset<Passage>,
    config: &Config,
    check: bool,
    logger: &Logger,
) -> Result<(), Box<dyn Error>> {
    for passage in passages {
        let gold = GoldState::new(passage, config)?;
        let actions: Vec<String> = gold.actions().iter().map(|a| a.to_string()).collect();
        println!("{}\t{}", passage.id(), actions.join(" "));
        if check {
            let (output, _) = gold.state().create_passage(true)?;
            info!(logger, "reassembled passage";
                  "passage" => passage.id(),
                  "units" => output.units().count(),
                  "edges" => output.graph().num_edges());
        }
    }
    Ok(())
}

fn train(args: &Train, config: Config, logger: Logger) -> Result<(), Box<dyn Error>> {
    let mut train_dataset = dataset::load_passages(&args.input)?;
    let valid_dataset = match args.valid_file {
        Some(ref path) => Some(dataset::load_passages(path)?),
        None => None,
    };
    info!(logger, "loaded passages"; "train" => train_dataset.len());
    let parser = Parser::new(config, BigramPredictor::default(), logger.clone());
    let mut trainer = Trainer::new(parser);
    trainer.add_callback("reporter", Reporter::new(logger.clone()));
    if args.progress {
        trainer.add_callback("progressbar", ProgressBar::<std::io::Stderr>::new());
    }
    let mut rng = utils::rand::seeded_rng();
    trainer.fit(&mut train_dataset, valid_dataset.as_ref(), args.n_epochs, &mut rng);
    Ok(())
}

#[derive(StructOpt, Debug)]
#[structopt(name = "oracle")]
struct Args {
    /// A JSON file overriding the transition configuration
    #[structopt(long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Print every transition
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    #[structopt(name = "show", about = "Prints the oracle action sequence of each passage")]
    Show(Show),
    #[structopt(name = "train", about = "Trains a bigram action predictor")]
    Train(Train),
}

#[derive(StructOpt, Debug)]
struct Show {
    /// A JSON-lines passage file
    #[structopt(name = "INPUT", parse(from_os_str))]
    input: PathBuf,
    /// Check that the passages can be reassembled from the final states
    #[structopt(long = "check")]
    check: bool,
}

#[derive(StructOpt, Debug)]
struct Train {
    /// A JSON-lines training file
    #[structopt(name = "INPUT", parse(from_os_str))]
    input: PathBuf,
    /// A JSON-lines validation file
    #[structopt(name = "VFILE", parse(from_os_str))]
    valid_file: Option<PathBuf>,
    /// Number of sweeps over the dataset
    #[structopt(long = "epoch", default_value = "5")]
    n_epochs: u32,
    #[structopt(long = "progress")]
    progress: bool,
}

fn main() {
    let args = Args::from_args();
    let mut log_config = logging::Config::default();
    if args.verbose {
        log_config.verbosity = Level::Trace;
    }
    let logger = match logging::create_logger(log_config) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("could not create a logger: {}", e);
            std::process::exit(1);
        }
    };
    let result = (|| -> Result<(), Box<dyn Error>> {
        let config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };
        match args.command {
            Command::Show(ref c) => {
                let passages = dataset::load_passages(&c.input)?;
                show(&passages, &config, c.check, &logger)
            }
            Command::Train(ref c) => train(c, config, logger.clone()),
        }
    })();
    if let Err(e) = result {
        crit!(logger, "{}", e);
        drop(logger);
        std::process::exit(1);
    }
}
