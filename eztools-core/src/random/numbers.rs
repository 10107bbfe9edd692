use std::collections::HashMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::RandomProvider;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("minimum {min} is greater than maximum {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("count {requested} exceeds range for unique numbers ({available} available)")]
    RangeExhausted { requested: usize, available: u128 },
}

/// Parameters of the random number generator tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRequest {
    pub min: i64,
    pub max: i64,
    pub count: usize,
    /// Draw without replacement.
    pub unique: bool,
}

impl NumberRequest {
    /// Number of distinct values in `[min, max]`; zero when the bounds are
    /// reversed.
    pub fn range_size(&self) -> u128 {
        if self.min > self.max {
            return 0;
        }
        (i128::from(self.max) - i128::from(self.min) + 1) as u128
    }
}

/// Draws `request.count` numbers from `[min, max]`.
///
/// Unique draws remove each pick from a shrinking pool. Non-unique draws are
/// independent and may repeat.
///
/// The unique pool is never built in full. Slot `v` of the pool holds `v`
/// until a pick moves the last slot's value into it, and only those moves are
/// kept, so memory grows with `count` rather than with the range.
///
/// # Errors
///
/// Returns [`ToolError`] without producing any numbers if the bounds are
/// reversed, or if a unique request asks for more values than the range
/// holds.
pub fn generate_numbers<R: RngCore>(
    provider: &mut RandomProvider<R>,
    request: &NumberRequest,
) -> Result<Vec<i64>, ToolError> {
    if request.min > request.max {
        return Err(ToolError::InvalidRange {
            min: request.min,
            max: request.max,
        });
    }

    if !request.unique {
        return Ok((0..request.count)
            .map(|_| provider.uniform_int(request.min, request.max))
            .collect());
    }

    let available = request.range_size();
    if request.count as u128 > available {
        warn!(
            requested = request.count,
            available = %available,
            "Unique number request exceeds range"
        );
        return Err(ToolError::RangeExhausted {
            requested: request.count,
            available,
        });
    }

    // Slots are addressed by value: the live pool is [min, last].
    let mut moved: HashMap<i64, i64> = HashMap::new();
    let mut last = request.max;
    let mut results = Vec::with_capacity(request.count);
    for _ in 0..request.count {
        let slot = provider.uniform_int(request.min, last);
        let picked = moved.get(&slot).copied().unwrap_or(slot);
        let tail = moved.remove(&last).unwrap_or(last);
        if slot != last {
            moved.insert(slot, tail);
        }
        results.push(picked);
        last = last.saturating_sub(1);
    }
    Ok(results)
}
