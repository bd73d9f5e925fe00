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

mod command_line_args;

use command_line_args::parse_args_or_exit;
use command_line_args::Arguments;
use fpgrowth_rules::itemizer::Itemizer;
use fpgrowth_rules::pipeline::{
    generate_rules_from_itemsets, generate_rules_from_mined, mine_file,
};
use fpgrowth_rules::record::{write_frequent_itemsets, write_rules};
use log::info;

use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::process;
use std::time::Instant;

fn mine_fp_growth(args: &Arguments) -> Result<(), Box<dyn Error>> {
    info!("Mining data set: {}", args.input_file_path);
    let start = Instant::now();

    let mut itemizer = Itemizer::new();
    let output = mine_file(&args.input_file_path, &mut itemizer, &args.config)?;

    // With an itemsets file, the rule pass reads its input back from the
    // persisted records.
    let rules = match args.output_itemsets_path {
        Some(ref path) => {
            {
                let mut writer = BufWriter::new(File::create(path)?);
                write_frequent_itemsets(&mut writer, &output.mined, &itemizer)?;
                writer.flush()?;
            }
            info!("Wrote frequent itemsets to {}", path);
            let reader = BufReader::new(File::open(path)?);
            generate_rules_from_itemsets(
                reader,
                &output.frequent_pattern,
                &mut itemizer,
                &args.config,
            )?
        }
        None => generate_rules_from_mined(
            &output.mined,
            &output.frequent_pattern,
            &itemizer,
            &args.config,
        )?,
    };

    {
        let mut writer = BufWriter::new(File::create(&args.output_rules_path)?);
        write_rules(&mut writer, &rules, &itemizer)?;
        writer.flush()?;
    }
    info!("Wrote {} rules to {}", rules.len(), args.output_rules_path);

    info!("Total runtime: {} seconds", start.elapsed().as_secs());

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arguments = parse_args_or_exit();

    if let Err(err) = mine_fp_growth(&arguments) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
