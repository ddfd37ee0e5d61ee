//! Timing loops comparing the two containers on their endpoints.
//!
//! Every loop only goes through [`Sequence`], so the same code drives both the list
//! and the vector.

use {
    crate::{
        error::Result,
        linked::SequenceList,
        sequence::Sequence,
        vector::SequenceVector,
    },
    std::{
        fmt::{Display, Formatter, Result as fmt_Result},
        time::{Duration, Instant},
    },
    tracing::{debug, info},
};

/// How a benchmark run is set up
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Rounds for the build-and-drop loops, and elements for the erase loops
    pub repeat: usize,
    /// The string stored in every slot
    pub payload: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            repeat: 10_000,
            payload: String::from("TODO"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Append,
    Prepend,
    EraseBegin,
    EraseEnd,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        let name = match self {
            Operation::Append => "append",
            Operation::Prepend => "prepend",
            Operation::EraseBegin => "erase begin",
            Operation::EraseEnd => "erase end",
        };
        f.write_str(name)
    }
}

/// One timed loop
#[derive(Clone, Debug)]
pub struct Measurement {
    pub container: &'static str,
    pub operation: Operation,
    pub elapsed: Duration,
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        write!(f, "{} {} time: {:?}", self.container, self.operation, self.elapsed)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub measurements: Vec<Measurement>,
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter) -> fmt_Result {
        for m in &self.measurements {
            writeln!(f, "{}", m)?;
        }
        Ok(())
    }
}

/// Builds an empty container, appends one payload and drops it, `repeat` times
pub fn append_rounds<S: Sequence<String>>(config: &BenchConfig) -> Duration {
    let start = Instant::now();
    for _ in 0..config.repeat {
        let mut seq = S::default();
        seq.append(config.payload.clone());
    }
    start.elapsed()
}

pub fn prepend_rounds<S: Sequence<String>>(config: &BenchConfig) -> Duration {
    let start = Instant::now();
    for _ in 0..config.repeat {
        let mut seq = S::default();
        seq.prepend(config.payload.clone());
    }
    start.elapsed()
}

/// Fills a container with `repeat` payloads, then times erasing `begin()` until it's empty
pub fn erase_begin<S: Sequence<String>>(config: &BenchConfig) -> Result<Duration> {
    let mut seq = filled::<S>(config);
    let start = Instant::now();
    for _ in 0..config.repeat {
        let first = seq.begin();
        seq.erase(first)?;
    }
    Ok(start.elapsed())
}

/// Same as [`erase_begin`] but always erases the element right before `end()`
pub fn erase_end<S: Sequence<String>>(config: &BenchConfig) -> Result<Duration> {
    let mut seq = filled::<S>(config);
    let start = Instant::now();
    for _ in 0..config.repeat {
        let last = seq.offset(seq.end(), -1)?;
        seq.erase(last)?;
    }
    Ok(start.elapsed())
}

fn filled<S: Sequence<String>>(config: &BenchConfig) -> S {
    let mut seq = S::default();
    for _ in 0..config.repeat {
        seq.prepend(config.payload.clone());
    }
    seq
}

/// Runs every operation against one container type
fn measure<S: Sequence<String>>(name: &'static str, config: &BenchConfig) -> Result<Vec<Measurement>> {
    let timings = [
        (Operation::Append, append_rounds::<S>(config)),
        (Operation::Prepend, prepend_rounds::<S>(config)),
        (Operation::EraseBegin, erase_begin::<S>(config)?),
        (Operation::EraseEnd, erase_end::<S>(config)?),
    ];
    Ok(timings
        .into_iter()
        .map(|(operation, elapsed)| {
            debug!(container = name, %operation, ?elapsed, "measured");
            Measurement {
                container: name,
                operation,
                elapsed,
            }
        })
        .collect())
}

/// Runs the whole comparison, list and vector interleaved per operation
pub fn run(config: &BenchConfig) -> Result<Report> {
    info!(repeat = config.repeat, "running sequence benchmark");
    let list = measure::<SequenceList<String>>("LinkedList", config)?;
    let vector = measure::<SequenceVector<String>>("Vector", config)?;

    let measurements = list
        .into_iter()
        .zip(vector)
        .flat_map(|(l, v)| [l, v])
        .collect();
    Ok(Report { measurements })
}
