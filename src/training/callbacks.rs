use std::fmt;
use std::io::{stderr, Stderr, Write};

use pbr::ProgressBar as ProgressBarImpl;
use slog::Logger;

use super::{AttachmentScore, Callback, TrainingInfo, ZeroDivisionError};

/// Logs per-epoch parse completion and attachment accuracy.
#[derive(Debug)]
pub struct Reporter {
    logger: Logger,
    score: AttachmentScore,
    complete: u32,
    total: u32,
}

impl Reporter {
    pub fn new(logger: Logger) -> Self {
        Reporter {
            logger: logger,
            score: AttachmentScore::new(),
            complete: 0,
            total: 0,
        }
    }

    pub fn reset(&mut self) {
        self.score.reset();
        self.complete = 0;
        self.total = 0;
    }

    /// Share of sentences the oracle drove to a single remaining root.
    pub fn completion_rate(&self) -> Result<f32, ZeroDivisionError> {
        if self.total > 0 {
            Ok((self.complete as f32) / (self.total as f32))
        } else {
            Err(ZeroDivisionError)
        }
    }

    pub fn score(&self) -> &AttachmentScore {
        &self.score
    }

    fn report(&self, label: &str, epoch: u32, n_samples: usize) {
        let completion = format_ratio(self.completion_rate());
        let accuracy = format_ratio(self.score.accuracy());
        info!(
            self.logger,
            "[{}] epoch {} - #samples: {}, completion: {}, uas: {}",
            label,
            epoch,
            n_samples,
            completion,
            accuracy
        );
    }
}

fn format_ratio(value: Result<f32, ZeroDivisionError>) -> String {
    match value {
        Ok(v) => format!("{:.8}", v),
        Err(_) => "NaN".to_string(),
    }
}

impl Callback for Reporter {
    fn on_epoch_begin(&mut self, _info: &TrainingInfo) {
        self.reset();
    }

    fn on_sentence_end(&mut self, info: &TrainingInfo) {
        if let Some(status) = info.status {
            self.total += 1;
            if status.is_complete() {
                self.complete += 1;
            }
        }
        if let (Some(predicted), Some(gold)) = (info.predicted, info.gold) {
            self.score.count(predicted, gold);
        }
    }

    fn on_epoch_end(&mut self, info: &TrainingInfo) {
        self.report("training", info.epoch, info.data_size);
    }
}

/// Terminal progress over the sentences of each epoch.
pub struct ProgressBar<W: Write> {
    pbar: Option<ProgressBarImpl<W>>,
    handle: fn() -> W,
}

impl ProgressBar<Stderr> {
    pub fn stderr() -> Self {
        ProgressBar {
            pbar: None,
            handle: stderr,
        }
    }
}

impl<W: Write> ProgressBar<W> {
    pub fn init(&mut self, total: u64) {
        let mut pbar = ProgressBarImpl::on((self.handle)(), total);
        pbar.tick();
        self.pbar = Some(pbar);
    }

    pub fn add(&mut self, i: u64) -> u64 {
        match self.pbar {
            Some(ref mut pbar) => pbar.add(i),
            None => 0,
        }
    }

    pub fn finish(&mut self) {
        if let Some(mut pbar) = self.pbar.take() {
            pbar.finish();
        }
    }
}

impl<W: Write> fmt::Debug for ProgressBar<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ProgressBar")
            .field("active", &self.pbar.is_some())
            .finish()
    }
}

impl<W: Write> Callback for ProgressBar<W> {
    fn on_epoch_begin(&mut self, info: &TrainingInfo) {
        self.init(info.data_size as u64);
    }

    fn on_sentence_end(&mut self, _info: &TrainingInfo) {
        self.add(1);
    }

    fn on_epoch_end(&mut self, _info: &TrainingInfo) {
        self.finish();
    }
}
