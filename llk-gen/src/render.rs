// Plain-text writers for grammars, canonical states and both table forms.

use llk::{
    Action, ExtAction, ExtendedParsingTable, Grammar, KSet, LlkState, OutputDetail, ParsingTable,
    PushdownSymbol, format_buffer, format_lookahead,
};
use std::io::{self, Write};

/// Writes the grammar: terminals, nonterminals, start symbol and numbered rules.
///
/// # Output Format
/// ```text
/// TS,<number of terminals>
/// T,<index>,<name>
/// NS,<number of nonterminals>
/// N,<index>,<name>
/// START,<name>
/// RS,<number of rules>
/// R,<number>: <lhs> -> <rhs or ε>
/// ```
pub fn write_grammar<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    writeln!(out, "TS,{}", grammar.terminals().len())?;
    for (id, name) in grammar.terminals().iter() {
        writeln!(out, "T,{},{}", id.0, name)?;
    }
    writeln!(out, "NS,{}", grammar.nonterminals().len())?;
    for (id, name) in grammar.nonterminals().iter() {
        writeln!(out, "N,{},{}", id.0, name)?;
    }
    writeln!(out, "START,{}", grammar.nonterm_name(grammar.start()))?;
    writeln!(out, "RS,{}", grammar.rules().len())?;
    for rule in grammar.rules() {
        writeln!(out, "R,{}", grammar.display_rule(rule))?;
    }
    Ok(())
}

fn format_set(grammar: &Grammar, set: &KSet) -> String {
    let items: Vec<String> = set
        .iter()
        .map(|s| {
            if s.is_empty() {
                "ε".to_owned()
            } else {
                format_lookahead(grammar, s.terms())
            }
        })
        .collect();
    format!("{{{}}}", items.join(", "))
}

fn write_state<W: Write>(out: &mut W, grammar: &Grammar, state: &LlkState) -> io::Result<()> {
    writeln!(
        out,
        "L,{},{},{}",
        state.id,
        grammar.nonterm_name(state.key.nonterm),
        format_set(grammar, &state.key.follow)
    )?;
    for row in &state.rows {
        let lookahead = if row.lookahead.is_empty() {
            "ε".to_owned()
        } else {
            format_lookahead(grammar, row.lookahead.terms())
        };
        write!(out, "U,{},{},{},", state.id, lookahead, row.rule)?;
        let follow: Vec<String> = row
            .follow
            .iter()
            .map(|ctx| format!("{}{}", grammar.nonterm_name(ctx.nonterm), format_set(grammar, &ctx.set)))
            .collect();
        writeln!(out, "[{}]", follow.join(" "))?;
    }
    Ok(())
}

/// Writes every discovered canonical state: its key, then one `U` line per row
/// with the triggering string, the rule number and the follow contexts.
pub fn write_states<W: Write>(out: &mut W, grammar: &Grammar, table: &ParsingTable) -> io::Result<()> {
    writeln!(out, "LS,{}", table.states().len())?;
    for state in table.states() {
        write_state(out, grammar, state)?;
    }
    Ok(())
}

fn format_rhs(grammar: &Grammar, rhs: &[PushdownSymbol]) -> String {
    if rhs.is_empty() {
        return "ε".to_owned();
    }
    rhs.iter()
        .map(|sym| sym.name(grammar))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_action(grammar: &Grammar, action: &Action) -> String {
    match action {
        Action::Accept => "accept".to_owned(),
        Action::Pop => "pop".to_owned(),
        Action::Expand { rule, rhs } => format!("expand({}: {})", rule, format_rhs(grammar, rhs)),
    }
}

fn format_ext_action(grammar: &Grammar, action: &ExtAction) -> String {
    match action {
        ExtAction::Accept => "accept".to_owned(),
        ExtAction::Pop { target } => format!("pop({})", format_buffer(grammar, target)),
        ExtAction::Expand { rule, rhs } => format!("expand({}: {})", rule, format_rhs(grammar, rhs)),
        ExtAction::Change { target } => format!("change({})", format_buffer(grammar, target)),
    }
}

/// Writes the non-empty cells of the standard table, one per line.
///
/// # Output Format
/// ```text
/// PT,<k>,<rows>,<columns>
/// P,<row>,<lookahead>,<action>[ | <action>...]
/// ```
pub fn write_table<W: Write>(out: &mut W, grammar: &Grammar, table: &ParsingTable) -> io::Result<()> {
    writeln!(
        out,
        "PT,{},{},{}",
        table.k(),
        table.rows().count(),
        table.columns().count()
    )?;
    for (row, col, actions) in table.cells() {
        let lookahead = table.column(col).unwrap_or(&[]);
        let actions: Vec<String> = actions.iter().map(|a| format_action(grammar, a)).collect();
        writeln!(
            out,
            "P,{},{},{}",
            row.name(grammar),
            format_lookahead(grammar, lookahead),
            actions.join(" | ")
        )?;
    }
    Ok(())
}

/// Writes the non-empty cells of the extended table, one per line.
pub fn write_extended<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    table: &ExtendedParsingTable,
) -> io::Result<()> {
    writeln!(
        out,
        "EPT,{},{},{}",
        table.k(),
        table.rows().count(),
        table.columns().count()
    )?;
    for (row, col, actions) in table.cells() {
        let buf = table.column(col).unwrap_or(&[]);
        let actions: Vec<String> = actions.iter().map(|a| format_ext_action(grammar, a)).collect();
        writeln!(
            out,
            "E,{},{},{}",
            row.name(grammar),
            format_buffer(grammar, buf),
            actions.join(" | ")
        )?;
    }
    Ok(())
}

/// Writes the cells of the standard table holding more than one action.
pub fn write_conflicts<W: Write>(out: &mut W, grammar: &Grammar, table: &ParsingTable) -> io::Result<()> {
    let conflicts = table.conflicts();
    writeln!(out, "CONFLICTS,{}", conflicts.len())?;
    for (row, col) in conflicts {
        let lookahead = table.column(col).unwrap_or(&[]);
        let actions: Vec<String> = table
            .actions(row, col)
            .iter()
            .map(|a| format_action(grammar, a))
            .collect();
        writeln!(
            out,
            "X,{},{},{}",
            row.name(grammar),
            format_lookahead(grammar, lookahead),
            actions.join(" | ")
        )?;
    }
    Ok(())
}

/// Writes the report for a deterministic table pair.
///
/// [`OutputDetail::Full`] precedes the tables with the grammar and the
/// canonical states; [`OutputDetail::Compact`] writes the tables only.
pub fn write_report<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    standard: &ParsingTable,
    extended: &ExtendedParsingTable,
    detail: OutputDetail,
) -> io::Result<()> {
    if detail == OutputDetail::Full {
        write_grammar(out, grammar)?;
        writeln!(out)?;
        write_states(out, grammar, standard)?;
        writeln!(out)?;
    }
    write_table(out, grammar, standard)?;
    writeln!(out)?;
    write_extended(out, grammar, extended)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::read_grammar;
    use llk::build_tables;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn a_s_b() -> Grammar {
        read_grammar("%token a b\n%%\nS : a S b | ;\n").unwrap()
    }

    #[test]
    fn grammar_listing() {
        let grammar = a_s_b();
        let text = render(|out| write_grammar(out, &grammar));
        assert_eq!(
            text,
            "TS,2\nT,0,a\nT,1,b\nNS,1\nN,0,S\nSTART,S\nRS,2\nR,1: S -> a S b\nR,2: S -> ε\n"
        );
    }

    #[test]
    fn states_listing() {
        let grammar = a_s_b();
        let tables = build_tables(&grammar, 1).unwrap();
        let text = render(|out| write_states(out, &grammar, &tables.standard));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "LS,2");
        assert_eq!(lines[1], "L,T0,S,{ε}");
        assert!(lines.contains(&"U,T0,a,1,[S{b}]"));
        assert!(lines.contains(&"U,T0,ε,2,[]"));
        assert!(lines.contains(&"L,T1,S,{b}"));
    }

    #[test]
    fn table_cells() {
        let grammar = a_s_b();
        let tables = build_tables(&grammar, 1).unwrap();
        let text = render(|out| write_table(out, &grammar, &tables.standard));
        // rows: T0 T1 a b #, columns: a b $
        assert!(text.starts_with("PT,1,5,3\n"));
        assert!(text.contains("P,T0,a,expand(1: a T1 b)\n"));
        assert!(text.contains("P,T0,$,expand(2: ε)\n"));
        assert!(text.contains("P,a,a,pop\n"));
        assert!(text.contains("P,#,$,accept\n"));
    }

    #[test]
    fn extended_cells() {
        let grammar = a_s_b();
        let tables = build_tables(&grammar, 1).unwrap();
        let text = render(|out| write_extended(out, &grammar, &tables.extended));
        assert!(text.contains("E,|a,ε,change(a)\n"));
        assert!(text.contains("E,|$,ε,change($)\n"));
        assert!(text.contains("E,a,a,pop(ε)\n"));
        assert!(text.contains("E,#,$,accept\n"));
    }

    #[test]
    fn conflict_listing() {
        let grammar = read_grammar("%token a b c\n%%\nS : a b | a c ;\n").unwrap();
        let table = ParsingTable::build(&grammar, 1).unwrap();
        let text = render(|out| write_conflicts(out, &grammar, &table));
        assert_eq!(
            text,
            "CONFLICTS,1\nX,T0,a,expand(1: a b) | expand(2: a c)\n"
        );
    }

    #[test]
    fn compact_report_has_tables_only() {
        let grammar = a_s_b();
        let tables = build_tables(&grammar, 1).unwrap();
        let full = render(|out| {
            write_report(out, &grammar, &tables.standard, &tables.extended, OutputDetail::Full)
        });
        let compact = render(|out| {
            write_report(out, &grammar, &tables.standard, &tables.extended, OutputDetail::Compact)
        });
        assert!(full.starts_with("TS,2\n"));
        assert!(full.contains("LS,2\n"));
        assert!(compact.starts_with("PT,1,"));
        assert!(!compact.contains("LS,"));
        assert!(full.ends_with(&compact));
    }
}
