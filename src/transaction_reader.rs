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

use crate::error::Result;
use crate::item::Item;
use crate::itemizer::Itemizer;
use log::warn;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::str;

/// Reads one transaction per line. Items are separated by commas and/or
/// whitespace, after `offset` leading fields (such as transaction and
/// customer ids) which are skipped. Lines with fewer than `offset` fields,
/// and lines that aren't valid UTF-8, are logged, counted as malformed and
/// skipped. Blank (or whitespace-only) lines carry no record at all, so
/// they are skipped without being counted, whatever the offset.
pub struct TransactionReader<'a, R: BufRead> {
    reader: R,
    itemizer: &'a mut Itemizer,
    offset: usize,
    line_number: usize,
    malformed: usize,
}

impl<'a> TransactionReader<'a, BufReader<File>> {
    pub fn open(
        path: &str,
        itemizer: &'a mut Itemizer,
        offset: usize,
    ) -> Result<TransactionReader<'a, BufReader<File>>> {
        let file = File::open(path)?;
        Ok(TransactionReader::new(BufReader::new(file), itemizer, offset))
    }
}

impl<'a, R: BufRead> TransactionReader<'a, R> {
    pub fn new(reader: R, itemizer: &'a mut Itemizer, offset: usize) -> TransactionReader<'a, R> {
        TransactionReader {
            reader,
            itemizer,
            offset,
            line_number: 0,
            malformed: 0,
        }
    }

    /// Number of lines skipped so far for having too few fields.
    pub fn malformed_count(&self) -> usize {
        self.malformed
    }
}

impl<'a, R: BufRead> Iterator for TransactionReader<'a, R> {
    type Item = Result<Vec<Item>>;
    fn next(&mut self) -> Option<Result<Vec<Item>>> {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            buf.clear();
            let len = match self.reader.read_until(b'\n', &mut buf) {
                Ok(len) => len,
                Err(err) => return Some(Err(err.into())),
            };
            if len == 0 {
                return None;
            }
            self.line_number += 1;

            let line = match str::from_utf8(&buf) {
                Ok(line) => line,
                Err(err) => {
                    warn!("Skipping line {}: not valid UTF-8 ({})", self.line_number, err);
                    self.malformed += 1;
                    continue;
                }
            };
            let fields: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < self.offset {
                warn!(
                    "Skipping line {}: expected at least {} leading fields, found {}",
                    self.line_number,
                    self.offset,
                    fields.len()
                );
                self.malformed += 1;
                continue;
            }

            let itemizer = &mut self.itemizer;
            let mut transaction = fields[self.offset..]
                .iter()
                .map(|s| itemizer.id_of(s))
                .collect::<Vec<Item>>();

            // Some input files have transactions with duplicates items.
            // Remove any duplicates here.
            transaction.sort();
            transaction.dedup();

            return Some(Ok(transaction));
        }
    }
}
