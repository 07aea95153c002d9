use super::io::RecordWriter;
use super::store::RecordStore;
use super::types::{Query, QueryLineError, Record, RecordLineError, Year};
use std::{convert::TryFrom, io::Write};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Querying,
    Done,
}

/// Counts gathered over a run; `rejected` matches the number of diagnostic lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub queries: usize,
    pub matches: usize,
    pub rejected: usize,
}

pub struct State {
    phase: Phase,
    store: RecordStore,
    summary: Summary,
}

impl Default for State {
    fn default() -> Self {
        Self {
            phase: Phase::Collecting,
            store: RecordStore::default(),
            summary: Summary::default(),
        }
    }
}

impl State {
    pub fn process<W: Write>(
        &mut self,
        line: &str,
        out: &mut RecordWriter<W>,
    ) -> Result<(), ProcessError> {
        let result = match self.phase {
            Phase::Collecting => self.collect(line, out),
            Phase::Querying => self.answer(Query::try_from(line), out),
            Phase::Done => return Err(ProcessError::Finished),
        };

        if matches!(&result, Err(err) if !err.is_fatal()) {
            self.summary.rejected += 1;
        }

        result
    }

    fn collect<W: Write>(
        &mut self,
        line: &str,
        out: &mut RecordWriter<W>,
    ) -> Result<(), ProcessError> {
        // Records take priority, so only a line that isn't record-shaped can start the
        // query phase
        match Record::try_from(line) {
            Ok(record) => {
                trace!(year = %record.year, price = record.price.value(), "storing record");
                self.store.insert(record);
                self.summary.records += 1;
                return Ok(());
            }
            Err(RecordLineError::Layout) => {}
            Err(err) => return Err(ProcessError::Record(err)),
        }

        match Query::try_from(line) {
            Err(QueryLineError::NotQueryShaped) => Err(ProcessError::Unrecognised),
            parsed => {
                debug!(records = self.store.len(), "first query seen, ordering records");
                self.store.finalize_ordering();
                self.phase = Phase::Querying;
                self.answer(parsed, out)
            }
        }
    }

    fn answer<W: Write>(
        &mut self,
        parsed: Result<Query, QueryLineError>,
        out: &mut RecordWriter<W>,
    ) -> Result<(), ProcessError> {
        let query = parsed?;
        if !query.is_ordered() {
            return Err(ProcessError::InvertedRange {
                low: query.low,
                high: query.high,
            });
        }

        let matches = self.store.range_lookup(query.low, query.high);
        trace!(low = %query.low, high = %query.high, matches = matches.len(), "answering query");

        for record in matches {
            out.write(record)?;
        }
        out.flush()?;

        self.summary.queries += 1;
        self.summary.matches += matches.len();

        Ok(())
    }

    /// Marks the end of input. Any further `process` call is an error.
    pub fn finish(&mut self) -> Summary {
        self.phase = Phase::Done;
        self.summary
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("line is neither a record nor a query")]
    Unrecognised,
    #[error("malformed record: {0}")]
    Record(RecordLineError),
    #[error("malformed query: {0}")]
    Query(QueryLineError),
    #[error("query range {low} {high} is inverted")]
    InvertedRange { low: Year, high: Year },
    #[error("failed writing output: {0}")]
    Output(#[from] csv::Error),
    #[error("input already finished")]
    Finished,
}

impl From<QueryLineError> for ProcessError {
    fn from(err: QueryLineError) -> Self {
        match err {
            QueryLineError::NotQueryShaped => Self::Unrecognised,
            other => Self::Query(other),
        }
    }
}

impl ProcessError {
    /// Fatal errors end the run; everything else just rejects the one line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Output(_) | Self::Finished)
    }
}
