use crate::notation::read_grammar;
use crate::render;
use anyhow::{Context, Result};
use llk::{Config, ExtendedParsingTable, ParsingTable};
use std::io::{self, Write};
use std::path::Path;

/// Reads grammar text and writes the report for it to `out`.
///
/// # Parameters
/// - `text`: Grammar in the `%token ... %% rules` notation.
/// - `config`: Lookahead length and output detail.
/// - `out`: Destination of the report.
///
/// # Errors
/// Notation and validation errors come back unwrapped. A table that is not
/// deterministic for `config.k()` fails with [`llk::LlkError::TableConflict`],
/// with the conflicting cells listed in the error context; nothing is written
/// to `out` in that case.
pub fn generate_report<W: Write>(text: &str, config: Config, out: &mut W) -> Result<()> {
    let grammar = read_grammar(text)?;

    let standard = ParsingTable::build(&grammar, config.k())?;
    if let Err(err) = standard.ensure_deterministic() {
        let mut listing = Vec::new();
        render::write_conflicts(&mut listing, &grammar, &standard)?;
        let listing = String::from_utf8_lossy(&listing).into_owned();
        return Err(anyhow::Error::new(err).context(listing));
    }
    let extended = ExtendedParsingTable::from_table(&standard);

    render::write_report(out, &grammar, &standard, &extended, config.detail())?;
    out.flush()?;
    Ok(())
}

/// Generates the report for a grammar file.
///
/// Writes to `output` when given, to standard output otherwise. The output file
/// is created only after the tables are built.
pub fn generate<P: AsRef<Path>>(grammar_path: P, output: Option<P>, config: Config) -> Result<()> {
    let grammar_path = grammar_path.as_ref();
    let text = std::fs::read_to_string(grammar_path)
        .with_context(|| format!("cannot read grammar {}", grammar_path.display()))?;

    let mut report = Vec::new();
    generate_report(&text, config, &mut report)
        .with_context(|| format!("grammar {}", grammar_path.display()))?;

    match output {
        Some(path) => {
            let path = path.as_ref();
            std::fs::write(path, &report)
                .with_context(|| format!("cannot write report {}", path.display()))?;
            log::info!("report written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&report)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
