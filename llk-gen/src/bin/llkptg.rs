//! Command-line interface for the LL(k) parsing table generator.
//!
//! Reads a grammar file, builds its LL(k) tables and writes the report to a
//! file or to standard output.

#[cfg(feature = "cli")]
mod real {
    use clap::Parser;
    use llk::{Config, OutputDetail};
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(about = "Generate LL(k) parsing tables from a grammar")]
    struct Args {
        /// Path to the input grammar file
        #[arg(short = 'g', long)]
        grammar: PathBuf,

        /// Lookahead length (1..=100).
        #[arg(short = 'k', default_value_t = 1)]
        k: usize,

        /// Path to the output report; standard output when absent.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Report detail: `full` or `compact`.
        #[arg(long, default_value_t = OutputDetail::Full)]
        detail: OutputDetail,

        /// Enable debug logging (off by default).
        #[arg(short = 'd', long)]
        debug: bool,
    }

    pub fn main() -> anyhow::Result<()> {
        let args = Args::parse();
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "warn" }),
        )
        .init();
        let config = Config::new(args.k, args.detail)?;
        llk_gen::generate(args.grammar, args.output, config)
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    real::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("llkptg disabled (compiled without `cli` feature)");
}
