//! BYSETPOS selection over the candidates of one FREQ period.

use chrono::NaiveDate;

use super::cursor::PeriodIndex;
use super::occurrence::Emitter;

/// ## Summary
/// Picks the candidates whose position in `candidates` is named by `positions`.
///
/// `candidates` must be ascending without duplicates. Position `1` is the first
/// candidate and `-1` the last; positions past either end select nothing.
#[must_use]
pub fn select_positions(candidates: &[NaiveDate], positions: &[i16]) -> Vec<NaiveDate> {
    let Ok(len) = i64::try_from(candidates.len()) else {
        return Vec::new();
    };
    candidates
        .iter()
        .zip(0_i64..)
        .filter(|(_, index)| {
            let forward = index + 1;
            let backward = index - len;
            positions.iter().any(|position| {
                let position = i64::from(*position);
                position == forward || position == backward
            })
        })
        .map(|(date, _)| *date)
        .collect()
}

/// ## Summary
/// Applies BYSETPOS to one period's candidates and offers the survivors to `emitter`.
///
/// Returns how many occurrences the period consumed toward COUNT.
pub fn resolve(candidates: &[NaiveDate], positions: &[i16], emitter: &mut Emitter) -> u32 {
    let before = emitter.counted();
    let selected = select_positions(candidates, positions);
    tracing::trace!(
        candidates = candidates.len(),
        selected = selected.len(),
        "Resolved BYSETPOS period"
    );
    for date in selected {
        emitter.offer(date);
    }
    emitter.counted() - before
}

/// Buffer of the current period's candidates while a generator walks forward.
#[derive(Debug, Default)]
pub enum SetPosState {
    /// No period is open.
    #[default]
    Flushed,
    /// Candidates of `period` seen so far.
    Collecting {
        period: PeriodIndex,
        buffer: Vec<NaiveDate>,
    },
}

impl SetPosState {
    /// Adds a candidate, resolving the open period first when `period` starts a new one.
    pub fn push(
        &mut self,
        period: PeriodIndex,
        date: NaiveDate,
        positions: &[i16],
        emitter: &mut Emitter,
    ) {
        if let Self::Collecting {
            period: open,
            buffer,
        } = self
            && *open == period
        {
            buffer.push(date);
            return;
        }
        self.flush(positions, emitter);
        *self = Self::Collecting {
            period,
            buffer: vec![date],
        };
    }

    /// Resolves the open period, if any.
    pub fn flush(&mut self, positions: &[i16], emitter: &mut Emitter) {
        if let Self::Collecting { buffer, .. } = std::mem::take(self) {
            resolve(&buffer, positions, emitter);
        }
    }
}
