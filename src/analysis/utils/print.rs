use colored::*;
use terminal_size::{Width, terminal_size};

use crate::analysis::config::CostModel;
use crate::analysis::keywords::Keyword;
use crate::analysis::types::AnalysisOutput;
use crate::analysis::utils::format::format_number;

fn colorize_line(line: &str, use_color: bool) -> String {
    if !use_color {
        return line.to_string();
    }

    if line.starts_with("Total") {
        return line.bold().yellow().to_string();
    }

    // "<label>: <value>" rows; the label is cyan, digits magenta.
    if let Some(colon_idx) = line.find(':') {
        let (label, rest) = line.split_at(colon_idx);
        let mut result = label.bold().cyan().to_string();
        result.push(':');
        for word in rest[1..].split_inclusive(' ') {
            if word.trim().chars().all(|c| c.is_ascii_digit() || c == ',') {
                result.push_str(&word.magenta().to_string());
            } else {
                result.push_str(&word.bright_blue().to_string());
            }
        }
        return result;
    }

    line.white().to_string()
}

fn visible_len(styled: &str) -> usize {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(styled.as_bytes()))
        .chars()
        .count()
}

pub fn print_boxed_section(lines: &[String], separator_indices: &[usize], title: Option<&str>) {
    let mut content_width = lines.iter().map(|l| visible_len(l)).max().unwrap_or(0);
    if let Some(title) = title {
        content_width = content_width.max(title.len());
    }
    content_width = content_width.max(40);

    let terminal_width = if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    };

    let box_width = content_width + 2;
    let use_box = terminal_width >= box_width + 2;
    let use_color = atty::is(atty::Stream::Stdout);
    let paint = |s: String| if use_color { s.white().to_string() } else { s };

    if !use_box {
        if let Some(title) = title {
            let title = if use_color {
                title.bold().yellow().to_string()
            } else {
                title.to_string()
            };
            println!("{}", title);
            println!("{}", paint("-".repeat(content_width)));
        }
        for (i, line) in lines.iter().enumerate() {
            println!("{}", colorize_line(line, use_color));
            if separator_indices.contains(&i) {
                println!("{}", paint("-".repeat(content_width)));
            }
        }
        println!("{}", paint("-".repeat(content_width)));
        return;
    }

    let rule = format!("+{:-<width$}+", "", width = box_width);
    match title {
        Some(title) => {
            let dash_total = box_width.saturating_sub(title.len());
            let left = dash_total / 2;
            let right = dash_total - left;
            let title = if use_color {
                title.bold().yellow().to_string()
            } else {
                title.to_string()
            };
            println!(
                "{}{}{}",
                paint(format!("+{:-<left$}", "")),
                title,
                paint(format!("{:->right$}+", ""))
            );
        }
        None => println!("{}", paint(rule.clone())),
    }
    for (i, line) in lines.iter().enumerate() {
        let styled = colorize_line(line, use_color);
        let pad = " ".repeat(content_width.saturating_sub(visible_len(&styled)));
        println!("{}{}{}{}", paint("| ".to_string()), styled, pad, paint(" |".to_string()));
        if separator_indices.contains(&i) {
            println!("{}", paint(rule.clone()));
        }
    }
    println!("{}", paint(rule));
}

/// Summary lines for a finished analysis, with separators after the
/// per-instruction block and the overhead block.
pub fn summary_lines(output: &AnalysisOutput) -> (Vec<String>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut separators = Vec::new();

    if output.instructions.is_empty() {
        lines.push(String::from("No instructions found in the input file"));
    }
    for row in &output.instructions {
        lines.push(format!(
            "{}: {} x {} cycles = {} cycles",
            row.instruction,
            format_number(row.count),
            format_number(row.cycles_per_instruction),
            format_number(row.cycles)
        ));
    }
    separators.push(lines.len() - 1);

    let cycles = &output.cycles;
    lines.push(format!(
        "Fetch/decode: {} cycles",
        format_number(cycles.fetch_decode_cycles)
    ));
    lines.push(format!(
        "Memory latency: {} cycles ({} loads/stores)",
        format_number(cycles.memory_overhead),
        format_number(output.load_store_count)
    ));
    lines.push(format!(
        "Branch penalty: {} cycles ({} calls/rets)",
        format_number(cycles.branch_overhead),
        format_number(output.branch_count)
    ));
    separators.push(lines.len() - 1);

    lines.push(format!(
        "Total Instructions: {}",
        format_number(output.total_instructions)
    ));
    lines.push(format!(
        "Total Cycles: {}",
        format_number(cycles.total_cycles)
    ));

    (lines, separators)
}

pub fn print_summary(output: &AnalysisOutput) {
    println!(
        "Analyzed {} ({} lines, {} with instructions) in {:.2} seconds",
        output.file,
        format_number(output.total_lines as u64),
        format_number(output.qualifying_lines as u64),
        output.elapsed_secs
    );
    let (lines, separators) = summary_lines(output);
    print_boxed_section(&lines, &separators, Some("Instruction Cycle Estimate"));
}

pub fn cost_model_lines(model: &CostModel) -> Vec<String> {
    let mut lines: Vec<String> = model
        .weights
        .iter()
        .map(|(k, weight)| format!("{:<6}: {} cycles - {}", k.as_str(), weight, k.description()))
        .collect();
    lines.push(format!(
        "Fetch/decode: {} cycles per instruction",
        model.fetch_decode_cycles
    ));
    lines.push(format!(
        "Memory latency: {} cycles per load/store",
        model.memory_latency
    ));
    lines.push(format!(
        "Branch penalty: {} cycles per call/ret",
        model.branch_penalty
    ));
    lines.push(format!("Match mode: {}", model.match_mode));
    lines
}

pub fn print_cost_model(model: &CostModel) {
    let lines = cost_model_lines(model);
    print_boxed_section(&lines, &[Keyword::COUNT - 1], Some("Instruction Cost Model"));
}
