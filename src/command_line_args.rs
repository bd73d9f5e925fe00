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

use std::env;
use std::io;
use std::process;

use argparse::{ArgumentParser, Store, StoreOption};
use fpgrowth_rules::config::MiningConfig;

pub struct Arguments {
    pub input_file_path: String,
    pub output_rules_path: String,
    pub output_itemsets_path: Option<String>,
    pub config: MiningConfig,
}

pub fn parse_args_or_exit() -> Arguments {
    let mut input_file_path = String::new();
    let mut output_rules_path = String::new();
    let mut output_itemsets_path: Option<String> = None;
    let mut min_support: i64 = 0;
    let mut min_confidence: f64 = 0.0;
    let mut offset: i64 = 0;

    {
        let mut parser = ArgumentParser::new();
        parser.set_description("Parallel FPGrowth frequent itemset and association rule miner.");

        parser
            .refer(&mut input_file_path)
            .add_option(
                &["--input"],
                Store,
                "Input dataset, one transaction per line, items separated by \
                 commas or whitespace.",
            )
            .metavar("file_path")
            .required();

        parser
            .refer(&mut output_rules_path)
            .add_option(
                &["--output"],
                Store,
                "File path in which to store output rules. \
                 Format: [antecedent] -> [consequent]:support<TAB>confidence.",
            )
            .metavar("file_path")
            .required();

        parser
            .refer(&mut output_itemsets_path)
            .add_option(
                &["--itemsets"],
                StoreOption,
                "File path in which to store frequent itemsets, one line per \
                 mined item. Format: [item, ...]:support; ...",
            )
            .metavar("file_path");

        parser
            .refer(&mut min_support)
            .add_option(
                &["--min-support"],
                Store,
                "Minimum itemset support, as a transaction count.",
            )
            .metavar("count")
            .required();

        parser
            .refer(&mut min_confidence)
            .add_option(
                &["--min-confidence"],
                Store,
                "Minimum rule confidence threshold, in range [0,1]. Default 0.",
            )
            .metavar("threshold");

        parser
            .refer(&mut offset)
            .add_option(
                &["--offset"],
                Store,
                "Number of leading non-item fields to skip on each line. Default 0.",
            )
            .metavar("fields");

        if env::args().count() == 1 {
            parser.print_help("Usage:", &mut io::stderr()).unwrap();
            process::exit(1);
        }

        match parser.parse_args() {
            Ok(()) => {}
            Err(err) => {
                process::exit(err);
            }
        }
    }

    let config = match MiningConfig::new(min_support, min_confidence, offset) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    Arguments {
        input_file_path,
        output_rules_path,
        output_itemsets_path,
        config,
    }
}
