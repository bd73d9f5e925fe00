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

use std::io;

/// Errors surfaced by the mining and rule generation passes.
#[derive(Debug, thiserror::Error)]
pub enum MiningError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A subset of a frequent itemset has no known support. The frequent
    /// itemset table is corrupt.
    #[error("No support recorded for itemset {itemset}")]
    MissingSupport { itemset: String },

    /// A subset has lower support than one of its supersets.
    #[error("Itemset {itemset}:{support} has higher support than its subset {subset}:{subset_support}")]
    InconsistentSupport {
        itemset: String,
        support: u32,
        subset: String,
        subset_support: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MiningError>;
