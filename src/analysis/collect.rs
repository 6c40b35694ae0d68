use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use regex::Regex;

use crate::analysis::config::{CostModel, MatchMode};
use crate::analysis::cost::compute_cycles;
use crate::analysis::error::{AnalyzerError, Result};
use crate::analysis::keywords::{Keyword, keyword_pattern};
use crate::analysis::report::ReportVariant;
use crate::analysis::types::{AnalysisOutput, ScanResult};

/// Decides which keywords a single listing line credits.
pub struct LineScanner {
    pattern: Regex,
    mode: MatchMode,
}

impl LineScanner {
    pub fn new(mode: MatchMode) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(&keyword_pattern())?,
            mode,
        })
    }

    /// Keywords credited by `line`, in canonical order, each at most once.
    pub fn credited(&self, line: &str) -> Vec<Keyword> {
        let line = line.trim();
        match self.mode {
            MatchMode::Permissive => {
                if !self.pattern.is_match(line) {
                    return Vec::new();
                }
                Keyword::ALL
                    .into_iter()
                    .filter(|k| line.contains(k.as_str()))
                    .collect()
            }
            MatchMode::Strict => {
                let mut seen = [false; Keyword::COUNT];
                for m in self.pattern.find_iter(line) {
                    if let Some(pos) = Keyword::ALL.iter().position(|k| k.as_str() == m.as_str()) {
                        seen[pos] = true;
                    }
                }
                Keyword::ALL
                    .into_iter()
                    .zip(seen)
                    .filter_map(|(k, hit)| hit.then_some(k))
                    .collect()
            }
        }
    }

    pub fn scan_line(&self, line: &str, result: &mut ScanResult) {
        result.total_lines += 1;
        let credited = self.credited(line);
        if credited.is_empty() {
            return;
        }
        result.qualifying_lines += 1;
        for keyword in credited {
            result.credit(keyword);
        }
    }

    /// Reads `reader` to the end. Invalid UTF-8 is replaced rather than rejected.
    pub fn scan<R: BufRead>(&self, mut reader: R) -> io::Result<ScanResult> {
        let mut result = ScanResult::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if read_line_bytes(&mut reader, &mut buf)? == 0 {
                break;
            }
            self.scan_line(&String::from_utf8_lossy(&buf), &mut result);
        }
        Ok(result)
    }
}

/// Reads one line into `buf` without its terminator. A line ends at `\n`,
/// `\r\n` or a lone `\r`. Returns the bytes consumed, 0 at end of input.
fn read_line_bytes<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<usize> {
    let mut consumed = 0;
    loop {
        let available = match reader.fill_buf() {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(consumed);
        }

        let Some(end) = available.iter().position(|&b| b == b'\n' || b == b'\r') else {
            let len = available.len();
            buf.extend_from_slice(available);
            reader.consume(len);
            consumed += len;
            continue;
        };

        let carriage_return = available[end] == b'\r';
        buf.extend_from_slice(&available[..end]);
        reader.consume(end + 1);
        consumed += end + 1;

        // The `\n` of a `\r\n` pair may start the next buffer.
        if carriage_return && reader.fill_buf()?.first() == Some(&b'\n') {
            reader.consume(1);
            consumed += 1;
        }
        return Ok(consumed);
    }
}

pub fn scan_file(path: &Path, scanner: &LineScanner) -> Result<ScanResult> {
    let input_error = |source| AnalyzerError::InputRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(input_error)?;
    scanner.scan(BufReader::new(file)).map_err(input_error)
}

/// Scans `path` and prices the result. Nothing is written here.
pub fn analyze_and_collect(
    path: &Path,
    model: &CostModel,
    variant: ReportVariant,
) -> Result<AnalysisOutput> {
    let scanner = LineScanner::new(model.match_mode)?;
    let start_time = Instant::now();

    log::debug!("Scanning {} ({:?} matching)", path.display(), model.match_mode);
    let scan = scan_file(path, &scanner)?;
    let cycles = compute_cycles(&scan, model);
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    log::info!(
        "Scanned {} lines, {} qualifying, {} instructions credited",
        scan.total_lines,
        scan.qualifying_lines,
        scan.total_instructions
    );

    Ok(AnalysisOutput::new(
        path,
        &scan,
        model,
        cycles,
        variant,
        elapsed_secs,
    ))
}
