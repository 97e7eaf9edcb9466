use anyhow::{Context, Result};
use clap::error::ErrorKind;
use fm_partition::{
    BisectionPartitioningConfig, Hypergraph, InfeasibleMovePolicy, InitialPartitioningMethod,
    PartitionReport, StopReason,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time;

#[derive(clap::ValueEnum, Copy, Clone, Debug)]
enum InitialMethod {
    LogicAffinity,
    Modulo,
    Random,
}

#[derive(clap::Parser, Debug)]
#[command(name = "fm", about = "Balanced two-way min-cut netlist partitioner")]
struct PartitionerArgs {
    /// Netlist to partition: a balance factor followed by
    /// `NET <name> <cell>... ;` records.
    input: PathBuf,
    /// Where to write the cut size and both cell groups.
    output: PathBuf,
    /// How to seed the partition before refining it.
    #[arg(long, value_enum, default_value = "logic-affinity")]
    initial: InitialMethod,
    /// Seed for the random initial partition.
    #[arg(long, default_value_t = 1234)]
    seed: u64,
    /// The maximum number of FM passes.
    #[arg(long, default_value_t = 150)]
    max_passes: u32,
    /// How many recent pass gains are summed by the stagnation check.
    #[arg(long, default_value_t = 5)]
    stagnation_window: usize,
    /// Passes to run before the stagnation check applies.
    #[arg(long, default_value_t = 100)]
    stagnation_after: u32,
    /// Stop once the summed recent gains fall below this value.
    #[arg(long, default_value_t = 20, allow_hyphen_values = true)]
    stagnation_threshold: i32,
    /// Fail instead of ending the pass when no cell can move within the
    /// balance bounds.
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match <PartitionerArgs as clap::Parser>::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprint!("{e}");
            eprintln!("Usage: fm <input file> <output file>");
            return ExitCode::from(1);
        }
    };
    log::debug!("partitioner args:\n{:#?}", args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &PartitionerArgs) -> Result<()> {
    let t1 = time::Instant::now();
    let mut graph = Hypergraph::from_path(&args.input)?;

    let config = BisectionPartitioningConfig {
        rng_seed: args.seed,
        initial_partitioning: match args.initial {
            InitialMethod::LogicAffinity => InitialPartitioningMethod::LogicAffinity,
            InitialMethod::Modulo => InitialPartitioningMethod::Modulo,
            InitialMethod::Random => InitialPartitioningMethod::Random,
        },
        max_passes: args.max_passes,
        stagnation_window: args.stagnation_window,
        stagnation_after: args.stagnation_after,
        stagnation_threshold: args.stagnation_threshold,
        on_infeasible: if args.strict {
            InfeasibleMovePolicy::Abort
        } else {
            InfeasibleMovePolicy::EndPass
        },
    };
    let report = graph.partition_bisection(&config)?;
    print_progress(&graph, &report);
    println!();
    println!("{}", graph.summary());
    println!();

    let output = File::create(&args.output)
        .with_context(|| format!("cannot open the output file {}", args.output.display()))?;
    graph
        .write_result(BufWriter::new(output))
        .with_context(|| format!("could not write result to {}", args.output.display()))?;
    println!("Runtime: {}s", t1.elapsed().as_secs_f64());
    Ok(())
}

fn print_progress(graph: &Hypergraph, report: &PartitionReport) {
    println!("****initial partition****");
    println!("maxPinNum is: {}", graph.max_pin_count());
    println!("CutSize is: {}", report.initial_cut_size);
    for (i, pass) in report.passes.iter().enumerate() {
        println!();
        println!("****iteration: {}****", i + 1);
        if pass.stalled {
            println!(
                "no feasible move after {} of {} cells",
                pass.moves,
                graph.cell_count()
            );
        }
        println!("maxPartialSum: {}", pass.max_gain);
        println!("CutSize is: {}", pass.cut_size);
    }
    if report.stop == StopReason::Stagnated {
        println!("Early Break");
    }
}
