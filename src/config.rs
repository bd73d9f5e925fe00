// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{MiningError, Result};
use std::convert::TryFrom;

/// Thresholds for a mining run. Only constructible through `new`, so a
/// `MiningConfig` is always valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MiningConfig {
    min_support: u32,
    min_confidence: f64,
    offset: usize,
}

impl MiningConfig {
    pub fn new(min_support: i64, min_confidence: f64, offset: i64) -> Result<MiningConfig> {
        let min_support = u32::try_from(min_support).map_err(|_| {
            MiningError::InvalidConfig(format!(
                "minimum support must be a count in range [0,{}], got {}",
                u32::max_value(),
                min_support
            ))
        })?;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(MiningError::InvalidConfig(format!(
                "minimum confidence must be in range [0,1], got {}",
                min_confidence
            )));
        }
        let offset = usize::try_from(offset).map_err(|_| {
            MiningError::InvalidConfig(format!(
                "offset must be a non-negative number of fields, got {}",
                offset
            ))
        })?;
        Ok(MiningConfig {
            min_support,
            min_confidence,
            offset,
        })
    }

    /// A config with the given support and the default confidence (0) and
    /// offset (0).
    pub fn with_min_support(min_support: u32) -> MiningConfig {
        MiningConfig {
            min_support,
            min_confidence: 0.0,
            offset: 0,
        }
    }

    pub fn min_support(&self) -> u32 {
        self.min_support
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}
