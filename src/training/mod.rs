use std::fmt::Debug;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slog::{Discard, Logger};

use crate::dataset::Example;
use crate::syntax;
use crate::syntax::transition::{
    ArcStandard, Dependencies, Derivation, Error, Oracle, PositionalArcStandard, StaticOracle,
    Status,
};

pub use self::callbacks::{ProgressBar, Reporter};
pub use self::metrics::{AttachmentScore, ZeroDivisionError};

mod callbacks;
mod metrics;

/// The learner driven by the trainer. It receives one call per sentence per
/// epoch, in epoch-major then corpus order.
pub trait Model {
    fn update(&mut self, predicted: &Dependencies, gold: &Dependencies);
}

/// The transition system replayed for each sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum System {
    /// `ArcStandard`: arcs reduce the dependent.
    ArcStandard,
    /// `PositionalArcStandard`: arcs reduce by stack position.
    Positional,
}

impl Default for System {
    fn default() -> Self {
        System::ArcStandard
    }
}

impl FromStr for System {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arc-standard" => Ok(System::ArcStandard),
            "positional" => Ok(System::Positional),
            _ => Err(format!("unknown transition system `{}`", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reject malformed gold maps before training starts.
    pub validate_gold: bool,
    /// Drive the oracle with a projectivized copy of each gold map.
    pub projectivize: bool,
    pub system: System,
}

#[derive(Debug)]
pub struct Trainer<O> {
    oracle: O,
    config: Config,
    logger: Option<Logger>,
    callbacks: Vec<(u32, usize, String, Box<dyn Callback>)>,
}

impl<O: Oracle> Trainer<O> {
    pub fn new(oracle: O) -> Self {
        Trainer::with_config(oracle, Config::default())
    }

    pub fn with_config(oracle: O, config: Config) -> Self {
        Trainer {
            oracle: oracle,
            config: config,
            logger: None,
            callbacks: vec![],
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Replays oracle transitions over every sentence for `n_epochs` epochs,
    /// reporting each sentence's predicted and gold maps to `model`.
    ///
    /// A sentence on which the oracle stalls still reports its partial map.
    pub fn fit<M: Model + ?Sized>(
        &mut self,
        model: &mut M,
        dataset: &[Example],
        n_epochs: u32,
    ) -> Result<(), Error> {
        if n_epochs == 0 {
            return Err(Error::InvalidArgument);
        }
        let logger = match self.logger {
            Some(ref logger) => logger.new(o!()),
            None => Logger::root(Discard, o!()),
        };
        let oracle_golds = self.prepare(dataset)?;
        self.callbacks
            .sort_by(|cb1, cb2| (-(cb1.0 as i64), cb1.1).cmp(&(-(cb2.0 as i64), cb2.1)));

        let data_size = dataset.len();
        for epoch in 1..n_epochs + 1 {
            info!(logger, "epoch {}/{}", epoch, n_epochs; "data_size" => data_size);
            let mut info = TrainingInfo::new(n_epochs, epoch, data_size);
            self.notify(Event::EpochBegin, &info);

            let mut num_stalled = 0;
            for (index, example) in dataset.iter().enumerate() {
                info.index = Some(index);
                self.notify(Event::SentenceBegin, &info);

                let gold = &example.heads;
                let oracle_gold = oracle_golds[index].as_ref().unwrap_or(gold);
                let num_tokens = example.len();
                let derivation = match self.config.system {
                    System::ArcStandard => {
                        Derivation::derive::<ArcStandard, O>(&self.oracle, num_tokens, oracle_gold)?
                    }
                    System::Positional => Derivation::derive::<PositionalArcStandard, O>(
                        &self.oracle,
                        num_tokens,
                        oracle_gold,
                    )?,
                };
                if derivation.status() == Status::Stalled {
                    num_stalled += 1;
                    debug!(
                        logger, "oracle stalled";
                        "epoch" => epoch,
                        "index" => index,
                        "transitions" => derivation.actions().len(),
                        "stack" => derivation.state().stack_slice().len()
                    );
                }
                model.update(derivation.heads(), gold);

                let end_info = TrainingInfo {
                    index: Some(index),
                    status: Some(derivation.status()),
                    num_transitions: Some(derivation.actions().len()),
                    predicted: Some(derivation.heads()),
                    gold: Some(gold),
                    ..TrainingInfo::new(n_epochs, epoch, data_size)
                };
                self.notify(Event::SentenceEnd, &end_info);
            }

            info.index = None;
            self.notify(Event::EpochEnd, &info);
            info!(logger, "epoch {} done", epoch; "stalled" => num_stalled);
        }
        Ok(())
    }

    /// Validates and projectivizes gold maps as configured. Entries are `None`
    /// where the oracle uses the gold map as given.
    fn prepare(&self, dataset: &[Example]) -> Result<Vec<Option<Dependencies>>, Error> {
        dataset
            .iter()
            .map(|example| {
                if self.config.validate_gold {
                    example.heads.validate(example.len())?;
                }
                if self.config.projectivize {
                    syntax::projectivize(example.len(), &example.heads).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect()
    }

    pub fn add_callback<S: Into<String>, C: Callback + 'static>(&mut self, name: S, callback: C) {
        self.add_callback_with_priority(name, callback, 1000);
    }

    /// Callbacks with a higher priority run first; ties run in insertion order.
    /// Adding a callback under an existing name replaces it.
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

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }

    fn notify(&mut self, event: Event, info: &TrainingInfo) {
        match event {
            Event::EpochBegin => {
                self.callbacks
                    .iter_mut()
                    .for_each(|cb| cb.3.on_epoch_begin(info));
            }
            Event::EpochEnd => {
                self.callbacks
                    .iter_mut()
                    .for_each(|cb| cb.3.on_epoch_end(info));
            }
            Event::SentenceBegin => {
                self.callbacks
                    .iter_mut()
                    .for_each(|cb| cb.3.on_sentence_begin(info));
            }
            Event::SentenceEnd => {
                self.callbacks
                    .iter_mut()
                    .for_each(|cb| cb.3.on_sentence_end(info));
            }
        }
    }
}

/// Trains `model` over `corpus` with the static oracle and default settings.
pub fn train<M: Model + ?Sized>(
    model: &mut M,
    n_epochs: u32,
    corpus: &[Example],
) -> Result<(), Error> {
    Trainer::new(StaticOracle).fit(model, corpus, n_epochs)
}

#[derive(Debug, Clone)]
pub struct TrainingInfo<'a> {
    pub n_epochs: u32,
    pub epoch: u32,
    pub data_size: usize,
    pub index: Option<usize>,
    pub status: Option<Status>,
    pub num_transitions: Option<usize>,
    pub predicted: Option<&'a Dependencies>,
    pub gold: Option<&'a Dependencies>,
}

impl<'a> TrainingInfo<'a> {
    fn new(n_epochs: u32, epoch: u32, data_size: usize) -> Self {
        TrainingInfo {
            n_epochs: n_epochs,
            epoch: epoch,
            data_size: data_size,
            index: None,
            status: None,
            num_transitions: None,
            predicted: None,
            gold: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Event {
    EpochBegin,
    EpochEnd,
    SentenceBegin,
    SentenceEnd,
}

#[allow(unused_variables)]
pub trait Callback: Debug {
    fn on_epoch_begin(&mut self, info: &TrainingInfo) {}
    fn on_epoch_end(&mut self, info: &TrainingInfo) {}
    fn on_sentence_begin(&mut self, info: &TrainingInfo) {}
    fn on_sentence_end(&mut self, info: &TrainingInfo) {}
}
