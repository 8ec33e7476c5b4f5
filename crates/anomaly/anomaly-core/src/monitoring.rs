//! Streaming monitor.
//!
//! Each message is either one scalar reading, which is appended to a rolling
//! buffer before the whole buffer is rescored, or a small CSV table, which is
//! scored on its own and leaves the buffer untouched.

use std::sync::Arc;

use anomaly_api::MonitorConfig;
use anomaly_spi::{AnomalyError, AnomalyScorer, MonitoringStream, NumericTable, Result};
use serde::Serialize;
use tracing::trace;

use crate::loader::parse_csv;

/// A classified stream message.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    Table(NumericTable),
    Value(f64),
}

impl StreamMessage {
    /// Classify raw message text.
    ///
    /// Text that parses as a single number is a [`StreamMessage::Value`];
    /// otherwise it must parse as a table with at least one complete row.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<f64>() {
            if !value.is_finite() {
                return Err(AnomalyError::data_format(format!(
                    "stream value must be finite, got {}",
                    trimmed
                )));
            }
            return Ok(Self::Value(value));
        }
        parse_csv(text).map(Self::Table)
    }
}

/// Values echoed back with the scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamValues {
    Rows(Vec<Vec<f64>>),
    Series(Vec<f64>),
}

/// Response to one stream message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamUpdate {
    pub scores: Vec<f64>,
    pub values: StreamValues,
}

/// Per-connection monitor over a shared scorer.
pub struct StreamMonitor {
    scorer: Arc<dyn AnomalyScorer>,
    buffer: Vec<f64>,
    buffer_size: usize,
}

impl std::fmt::Debug for StreamMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamMonitor")
            .field("buffered", &self.buffer.len())
            .field("buffer_size", &self.buffer_size)
            .finish()
    }
}

impl StreamMonitor {
    /// Create a monitor holding at most `buffer_size` values.
    pub fn new(scorer: Arc<dyn AnomalyScorer>, buffer_size: usize) -> Self {
        Self {
            scorer,
            buffer: Vec::with_capacity(buffer_size),
            buffer_size,
        }
    }

    /// Create from configuration.
    pub fn from_config(scorer: Arc<dyn AnomalyScorer>, config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(scorer, config.buffer_size))
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Score one classified message.
    pub fn handle(&mut self, message: StreamMessage) -> Result<StreamUpdate> {
        match message {
            StreamMessage::Table(table) => {
                let scores = self.scorer.score(&table)?;
                Ok(StreamUpdate {
                    scores,
                    values: StreamValues::Rows(table.into_rows()),
                })
            }
            StreamMessage::Value(value) => {
                let scores = self.push(value)?;
                Ok(StreamUpdate {
                    scores,
                    values: StreamValues::Series(self.buffer.clone()),
                })
            }
        }
    }

    /// Parse and score raw message text.
    pub fn handle_text(&mut self, text: &str) -> Result<StreamUpdate> {
        self.handle(StreamMessage::parse(text)?)
    }
}

impl MonitoringStream for StreamMonitor {
    fn push(&mut self, value: f64) -> Result<Vec<f64>> {
        if self.scorer.input_dim() != 1 {
            return Err(AnomalyError::DataShape {
                expected: self.scorer.input_dim(),
                got: 1,
            });
        }
        if !value.is_finite() {
            return Err(AnomalyError::data_format("stream value must be finite"));
        }

        let skip = (self.buffer.len() + 1).saturating_sub(self.buffer_size);
        let mut candidate: Vec<f64> = self.buffer.iter().skip(skip).copied().collect();
        candidate.push(value);
        trace!(buffered = candidate.len(), "rescoring stream buffer");

        // The buffer only advances once the window scores.
        let window = NumericTable::from_series("value", &candidate)?;
        let scores = self.scorer.score(&window)?;
        self.buffer = candidate;
        Ok(scores)
    }

    fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}
