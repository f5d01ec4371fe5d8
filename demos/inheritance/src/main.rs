// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Benchmark of a three-level record composition (C built on B built on A)
// stored as AoS, flat SoA and blocked AoSoA.
// Run with: cargo run --release -p inheritance -- --repeat 100

mod bench;

use anyhow::{bail, Context, Result};
use aosoa_data::{BlockedTableArray, BlockedTableVector, FlatDynamicTable, FlatTable};
use clap::Parser;
use log::info;

use bench::{Outcome, C};

/// Length of the fixed-size tables, which live inline.
const FIXED_LEN: usize = 10_000;

/// Block size of the fixed blocked table variant.
const FIXED_BLOCK: usize = 32;

/// Block size standing in for "one block holds everything" on the vector.
const MAX_BLOCK: usize = 1 << 17;

/// Compares AoS, SoA and AoSoA layouts on the same three-level record.
#[derive(Parser)]
#[command(name = "inheritance")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of elements in the dynamic variants
    #[arg(short, long, default_value_t = 100_000)]
    len: usize,

    /// Number of update and reduction passes per variant
    #[arg(short, long, default_value_t = 10)]
    repeat: usize,

    /// Block size of the dynamic blocked variant (2, 8, 32, 128 or 1024)
    #[arg(short, long, default_value_t = 32)]
    block_size: usize,
}

fn report(name: &str, outcome: Outcome) {
    info!("{name}");
    info!("  result: {}, {}", outcome.x, outcome.y);
    info!("  time: {:?}", outcome.elapsed);
}

fn nested_vector<const B: usize>(len: usize, repeat: usize) -> Result<Outcome> {
    let mut table = BlockedTableVector::<C, B>::try_new(len)
        .with_context(|| format!("allocating {len} elements in blocks of {B}"))?;
    Ok(bench::nested(&mut table, repeat))
}

fn run_fixed(repeat: usize) {
    info!("Fixed variants, len: {FIXED_LEN}");

    let mut array = vec![C::default(); FIXED_LEN];
    report("flat AoS array", bench::flat_aos(&mut array, repeat));

    let mut table = FlatTable::<C, FIXED_LEN>::new();
    report("flat SoA table", bench::flat_soa(&mut table, repeat));

    let mut blocked = BlockedTableArray::<C, 2, FIXED_LEN>::new();
    report("nested SoA array, block size 2", bench::nested(&mut blocked, repeat));

    let mut blocked = BlockedTableArray::<C, FIXED_LEN, FIXED_LEN>::new();
    report(
        "nested SoA array, block size max",
        bench::nested(&mut blocked, repeat),
    );

    let mut blocked = BlockedTableArray::<C, FIXED_BLOCK, FIXED_LEN>::new();
    report(
        &format!("nested SoA array, block size {FIXED_BLOCK}"),
        bench::nested(&mut blocked, repeat),
    );
}

fn run_dynamic(len: usize, repeat: usize, block_size: usize) -> Result<()> {
    info!("Dynamic variants, len: {len}");

    let mut table = FlatDynamicTable::<C>::try_new(len)
        .with_context(|| format!("allocating a flat table of {len} elements"))?;
    report("flat dynamic SoA table", bench::flat_soa(&mut table, repeat));

    let mut vector = vec![C::default(); len];
    report("Vec of records", bench::nested_aos(&mut vector, repeat));

    report(
        "nested SoA vector, block size 2",
        nested_vector::<2>(len, repeat)?,
    );

    if len <= MAX_BLOCK {
        report(
            "nested SoA vector, block size max",
            nested_vector::<MAX_BLOCK>(len, repeat)?,
        );
    }

    let outcome = match block_size {
        2 => nested_vector::<2>(len, repeat)?,
        8 => nested_vector::<8>(len, repeat)?,
        32 => nested_vector::<32>(len, repeat)?,
        128 => nested_vector::<128>(len, repeat)?,
        1024 => nested_vector::<1024>(len, repeat)?,
        other => bail!("unsupported block size {other}, expected 2, 8, 32, 128 or 1024"),
    };
    report(
        &format!("nested SoA vector, block size {block_size}"),
        outcome,
    );
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    info!("repeat: {}", cli.repeat);

    run_fixed(cli.repeat);
    run_dynamic(cli.len, cli.repeat, cli.block_size)?;
    Ok(())
}
