#[macro_use]
extern crate slog;
#[macro_use]
extern crate tbparser;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use slog::Logger;
use structopt::StructOpt;
use tbparser::app::prelude::*;
use tbparser::dataset::{self, Dataset, Example};
use tbparser::syntax::transition::{LookaheadOracle, Oracle, StaticOracle};
use tbparser::training::{self, AttachmentScore, ProgressBar, Reporter, Trainer};

#[derive(Debug, Clone, Copy)]
enum CorpusFormat {
    Json,
    Conll,
}

impl FromStr for CorpusFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(CorpusFormat::Json),
            "conll" => Ok(CorpusFormat::Conll),
            _ => Err(format!("unknown corpus format `{}`", s)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum OracleKind {
    Static,
    Lookahead,
}

impl FromStr for OracleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(OracleKind::Static),
            "lookahead" => Ok(OracleKind::Lookahead),
            _ => Err(format!("unknown oracle `{}`", s)),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "tbtrain", about = "Replays oracle transitions over a corpus")]
struct Args {
    #[structopt(flatten)]
    common: CommonArgs,
    /// A training data file
    #[structopt(name = "INPUT", parse(from_os_str))]
    input: PathBuf,
    /// Corpus format: json or conll
    #[structopt(long = "format", default_value = "json")]
    format: CorpusFormat,
    /// Number of sweeps over the dataset
    #[structopt(long = "epoch", default_value = "1")]
    n_epochs: u32,
    /// Oracle: static or lookahead
    #[structopt(long = "oracle", default_value = "static")]
    oracle: OracleKind,
    /// Reject malformed gold dependencies before training
    #[structopt(long = "validate")]
    validate: bool,
    /// Projectivize gold dependencies for the oracle
    #[structopt(long = "projectivize")]
    projectivize: bool,
    /// Transition system: arc-standard or positional
    #[structopt(long = "system", default_value = "arc-standard")]
    system: training::System,
}

fn load<P: AsRef<Path>>(path: P, format: CorpusFormat) -> std::io::Result<Dataset<Example>> {
    match format {
        CorpusFormat::Json => dataset::json::load(path),
        CorpusFormat::Conll => dataset::conll::load(path),
    }
}

fn run<O: Oracle>(
    oracle: O,
    args: &Args,
    dataset: &Dataset<Example>,
    logger: &Logger,
) -> Result<AttachmentScore, Box<dyn Error + Send + Sync>> {
    let config = training::Config {
        validate_gold: args.validate,
        projectivize: args.projectivize,
        system: args.system,
    };
    let mut trainer = Trainer::with_config(oracle, config);
    trainer.set_logger(logger.new(o!(
        "oracle" => format!("{:?}", args.oracle),
        "system" => format!("{:?}", args.system)
    )));
    trainer.add_callback("reporter", Reporter::new(logger.clone()));
    trainer.add_callback_with_priority("progress", ProgressBar::stderr(), 0);
    let mut model = AttachmentScore::new();
    trainer.fit(&mut model, dataset, args.n_epochs)?;
    Ok(model)
}

main!(|args: Args, context: Context| {
    let logger = &context.logger;
    info!(logger, "load corpus: {}", args.input.display(); "format" => format!("{:?}", args.format));
    let dataset = load(&args.input, args.format)?;
    info!(logger, "#sentences: {}", dataset.len());
    let score = match args.oracle {
        OracleKind::Static => run(StaticOracle, &args, &dataset, logger)?,
        OracleKind::Lookahead => run(LookaheadOracle, &args, &dataset, logger)?,
    };
    match score.accuracy() {
        Ok(acc) => info!(logger, "uas over all epochs: {:.8}", acc),
        Err(e) => warn!(logger, "uas over all epochs: {}", e),
    }
    Ok(())
});
