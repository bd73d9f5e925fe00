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

//! FP-Growth frequent itemset mining and association rule generation.

pub mod conditional;
pub mod config;
pub mod error;
pub mod fpgrowth;
pub mod fptree;
pub mod frequent_pattern;
pub mod generate_rules;
pub mod item;
pub mod item_counter;
pub mod itemizer;
pub mod itemset;
pub mod pipeline;
pub mod record;
pub mod transaction_reader;
