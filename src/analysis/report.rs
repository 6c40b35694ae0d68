use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::analysis::error::{AnalyzerError, Result};
use crate::analysis::types::AnalysisOutput;

pub const CSV_HEADER: &str = "Instruction_Name,Instruction_Count,Cycles_Per_Instruction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    /// Per-instruction rows only
    Basic,
    /// Per-instruction rows followed by instruction and cycle totals
    #[default]
    Extended,
}

impl ReportVariant {
    pub fn default_output(self) -> &'static str {
        match self {
            ReportVariant::Basic => "instructions.csv",
            ReportVariant::Extended => "instruction_analysis.csv",
        }
    }
}

pub fn write_csv<W: Write>(out: &mut W, output: &AnalysisOutput) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for row in &output.instructions {
        writeln!(
            out,
            "{},{},{}",
            row.instruction, row.count, row.cycles_per_instruction
        )?;
    }
    if output.variant == ReportVariant::Extended {
        writeln!(out)?;
        writeln!(out, "Total Instructions,{}", output.total_instructions)?;
        writeln!(out, "Total Cycles,{}", output.cycles.total_cycles)?;
    }
    Ok(())
}

/// Creates or truncates `path`. Rows flushed before a failure stay on disk.
pub fn write_csv_file(path: &Path, output: &AnalysisOutput) -> Result<()> {
    let output_error = |source| AnalyzerError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(output_error)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, output).map_err(output_error)?;
    writer.flush().map_err(output_error)?;
    log::info!(
        "Wrote {} instruction rows to {}",
        output.instructions.len(),
        path.display()
    );
    Ok(())
}

#[derive(Serialize)]
struct JsonWrapper<'a> {
    analysis_results: &'a AnalysisOutput,
}

pub fn export_json(path: &Path, output: &AnalysisOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonWrapper {
        analysis_results: output,
    })?;
    write_export(path, json)
}

pub fn export_toml(path: &Path, output: &AnalysisOutput) -> Result<()> {
    let toml = toml::to_string_pretty(output)?;
    write_export(path, toml)
}

fn write_export(path: &Path, contents: String) -> Result<()> {
    fs::write(path, contents).map_err(|source| AnalyzerError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported analysis to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::CostModel;
    use crate::analysis::cost::compute_cycles;
    use crate::analysis::keywords::Keyword;
    use crate::analysis::types::ScanResult;

    fn output_for(keywords: &[Keyword], variant: ReportVariant) -> AnalysisOutput {
        let mut scan = ScanResult::default();
        for &k in keywords {
            scan.credit(k);
        }
        let model = CostModel::default();
        let cycles = compute_cycles(&scan, &model);
        AnalysisOutput::new(Path::new("in.ll"), &scan, &model, cycles, variant, 0.0)
    }

    fn render(output: &AnalysisOutput) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, output).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn basic_report_has_header_and_rows() {
        let output = output_for(&[Keyword::Load, Keyword::Ret], ReportVariant::Basic);
        assert_eq!(
            render(&output),
            "Instruction_Name,Instruction_Count,Cycles_Per_Instruction\nload,1,3\nret,1,1\n"
        );
    }

    #[test]
    fn extended_report_appends_totals() {
        let output = output_for(&[Keyword::Load, Keyword::Ret], ReportVariant::Extended);
        assert_eq!(
            render(&output),
            "Instruction_Name,Instruction_Count,Cycles_Per_Instruction\n\
             load,1,3\n\
             ret,1,1\n\
             \n\
             Total Instructions,2\n\
             Total Cycles,21\n"
        );
    }

    #[test]
    fn empty_reports() {
        let basic = output_for(&[], ReportVariant::Basic);
        assert_eq!(render(&basic), format!("{CSV_HEADER}\n"));

        let extended = output_for(&[], ReportVariant::Extended);
        assert_eq!(
            render(&extended),
            format!("{CSV_HEADER}\n\nTotal Instructions,0\nTotal Cycles,0\n")
        );
    }

    #[test]
    fn default_outputs_follow_variant() {
        assert_eq!(ReportVariant::Basic.default_output(), "instructions.csv");
        assert_eq!(
            ReportVariant::Extended.default_output(),
            "instruction_analysis.csv"
        );
    }

    #[test]
    fn write_csv_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale contents that are much longer than the report\n").unwrap();

        let output = output_for(&[Keyword::Mul], ReportVariant::Basic);
        write_csv_file(&path, &output).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{CSV_HEADER}\nmul,1,2\n")
        );
    }

    #[test]
    fn write_csv_file_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.csv");
        let output = output_for(&[], ReportVariant::Basic);
        let err = write_csv_file(&path, &output).unwrap_err();
        assert!(matches!(err, AnalyzerError::OutputWrite { .. }));
    }

    #[test]
    fn exports_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_for(&[Keyword::Call, Keyword::Call], ReportVariant::Extended);

        let json_path = dir.path().join("out.json");
        export_json(&json_path, &output).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        let results = &json["analysis_results"];
        assert_eq!(results["total_instructions"], 2);
        assert_eq!(results["cycles"]["branch_overhead"], 10);
        assert_eq!(results["instructions"][0]["instruction"], "call");
        assert_eq!(results["instructions"][0]["cycles"], 10);

        let toml_path = dir.path().join("out.toml");
        export_toml(&toml_path, &output).unwrap();
        let text = fs::read_to_string(&toml_path).unwrap();
        let value: toml::Value = toml::from_str(&text).unwrap();
        assert_eq!(value["variant"].as_str(), Some("extended"));
        assert_eq!(value["cycles"]["total_cycles"].as_integer(), Some(22));
    }
}
