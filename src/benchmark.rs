//! Parameter sweeps over a loaded dataset and their textual summary.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::{info, instrument};

use crate::dataset::Dataset;
use crate::error::{BenchmarkError, ReportError};
use crate::item_sets::mine_frequent_itemsets;
use crate::rules::generate_rules;

const HEADER: [&str; 8] = [
    "min_support",
    "min_confidence",
    "max_length",
    "itemset_time_ms",
    "rule_time_ms",
    "total_time_ms",
    "itemset_count",
    "rule_count",
];

/// Parameter values to combine in a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkGrid {
    pub supports: Vec<f64>,
    pub confidences: Vec<f64>,
    pub max_lengths: Vec<usize>,
}

impl Default for BenchmarkGrid {
    fn default() -> Self {
        Self {
            supports: vec![0.001, 0.005, 0.01, 0.02, 0.05],
            confidences: vec![0.1, 0.2, 0.3, 0.5, 0.7],
            max_lengths: vec![2, 3, 4, 5],
        }
    }
}

impl BenchmarkGrid {
    /// Very low supports explode combinatorially past length 3.
    pub fn skips(&self, min_support: f64, max_length: usize) -> bool {
        min_support < 0.005 && max_length > 3
    }

    /// Every `(support, confidence, max_length)` combination that is run, in
    /// sweep order.
    pub fn combinations(&self) -> Vec<(f64, f64, usize)> {
        let mut combos = Vec::new();
        for &support in &self.supports {
            for &confidence in &self.confidences {
                for &max_length in &self.max_lengths {
                    if !self.skips(support, max_length) {
                        combos.push((support, confidence, max_length));
                    }
                }
            }
        }
        combos
    }
}

/// Timings and output sizes of one mining run. Times are whole milliseconds
/// once read back from a results file.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub min_support: f64,
    pub min_confidence: f64,
    pub max_length: usize,
    pub itemset_time: Duration,
    pub rule_time: Duration,
    pub total_time: Duration,
    pub itemset_count: usize,
    pub rule_count: usize,
}

/// Mines and derives rules once, timing both phases.
pub fn run_once(
    dataset: &Dataset,
    min_support: f64,
    min_confidence: f64,
    max_length: usize,
) -> Result<BenchmarkResult, BenchmarkError> {
    let started = Instant::now();
    let itemsets = mine_frequent_itemsets(dataset, min_support, max_length);
    let itemset_time = started.elapsed();

    let rules_started = Instant::now();
    let rules = generate_rules(&itemsets, min_confidence)?;
    let rule_time = rules_started.elapsed();

    Ok(BenchmarkResult {
        min_support,
        min_confidence,
        max_length,
        itemset_time,
        rule_time,
        total_time: started.elapsed(),
        itemset_count: itemsets.len(),
        rule_count: rules.len(),
    })
}

/// Runs every combination of `grid`, handing each result to `on_result` as
/// soon as it is available.
#[instrument(skip_all, fields(transactions = dataset.len()))]
pub fn run_grid<F>(
    dataset: &Dataset,
    grid: &BenchmarkGrid,
    mut on_result: F,
) -> Result<Vec<BenchmarkResult>, BenchmarkError>
where
    F: FnMut(&BenchmarkResult),
{
    let combinations = grid.combinations();
    info!(runs = combinations.len(), "starting benchmark sweep");
    let mut results = Vec::with_capacity(combinations.len());
    for (support, confidence, max_length) in combinations {
        let result = run_once(dataset, support, confidence, max_length)?;
        on_result(&result);
        results.push(result);
    }
    Ok(results)
}

pub fn write_results<W: Write>(writer: W, results: &[BenchmarkResult]) -> Result<(), ReportError> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for r in results {
        csv.write_record([
            format!("{:.6}", r.min_support),
            format!("{:.6}", r.min_confidence),
            r.max_length.to_string(),
            r.itemset_time.as_millis().to_string(),
            r.rule_time.as_millis().to_string(),
            r.total_time.as_millis().to_string(),
            r.itemset_count.to_string(),
            r.rule_count.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the results CSV, creating missing parent directories.
pub fn save_results(path: &Path, results: &[BenchmarkResult]) -> Result<(), ReportError> {
    write_results(crate::report::create(path)?, results)
}

pub fn read_results<R: Read>(reader: R) -> Result<Vec<BenchmarkResult>, BenchmarkError> {
    let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut results = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = index as u64 + 2;
        results.push(BenchmarkResult {
            min_support: field(&record, 0, line)?,
            min_confidence: field(&record, 1, line)?,
            max_length: field(&record, 2, line)?,
            itemset_time: Duration::from_millis(field(&record, 3, line)?),
            rule_time: Duration::from_millis(field(&record, 4, line)?),
            total_time: Duration::from_millis(field(&record, 5, line)?),
            itemset_count: field(&record, 6, line)?,
            rule_count: field(&record, 7, line)?,
        });
    }
    if results.is_empty() {
        return Err(BenchmarkError::Empty);
    }
    Ok(results)
}

pub fn load_results(path: &Path) -> Result<Vec<BenchmarkResult>, BenchmarkError> {
    let file = File::open(path).map_err(|source| BenchmarkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_results(file)
}

fn field<T: std::str::FromStr>(
    record: &StringRecord,
    index: usize,
    line: u64,
) -> Result<T, BenchmarkError> {
    record
        .get(index)
        .and_then(|raw| raw.trim().parse().ok())
        .ok_or(BenchmarkError::MalformedRecord {
            line,
            field: HEADER[index],
        })
}

/// `850ms`, `12.34s`, or `3m 4.5s`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        let minutes = (secs / 60.0).floor();
        format!("{minutes}m {:.1}s", secs - minutes * 60.0)
    }
}

/// Mean time and output sizes over the runs sharing one parameter value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage<K> {
    pub key: K,
    pub runs: usize,
    pub time_ms: f64,
    pub itemsets: f64,
    pub rules: f64,
}

/// Averages grouped by the value `key` picks, ascending by that value.
pub fn averages_by<K, F>(results: &[BenchmarkResult], key: F) -> Vec<GroupAverage<K>>
where
    K: PartialOrd + Copy,
    F: Fn(&BenchmarkResult) -> K,
{
    let mut groups: Vec<GroupAverage<K>> = Vec::new();
    for r in results {
        let k = key(r);
        let slot = match groups.iter().position(|g| g.key == k) {
            Some(slot) => slot,
            None => {
                groups.push(GroupAverage {
                    key: k,
                    runs: 0,
                    time_ms: 0.0,
                    itemsets: 0.0,
                    rules: 0.0,
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[slot];
        group.runs += 1;
        group.time_ms += r.total_time.as_millis() as f64;
        group.itemsets += r.itemset_count as f64;
        group.rules += r.rule_count as f64;
    }
    for group in &mut groups {
        let runs = group.runs as f64;
        group.time_ms /= runs;
        group.itemsets /= runs;
        group.rules /= runs;
    }
    groups.sort_by(|a, b| a.key.partial_cmp(&b.key).unwrap_or(Ordering::Equal));
    groups
}

/// Up to `n` runs with the lowest total time.
pub fn fastest(results: &[BenchmarkResult], n: usize) -> Vec<&BenchmarkResult> {
    let mut sorted: Vec<&BenchmarkResult> = results.iter().collect();
    sorted.sort_by_key(|r| r.total_time);
    sorted.truncate(n);
    sorted
}

/// Up to `n` runs that produced rules, with the lowest milliseconds per rule.
pub fn best_time_per_rule(results: &[BenchmarkResult], n: usize) -> Vec<(&BenchmarkResult, f64)> {
    let mut ratios: Vec<(&BenchmarkResult, f64)> = results
        .iter()
        .filter(|r| r.rule_count > 0)
        .map(|r| (r, r.total_time.as_millis() as f64 / r.rule_count as f64))
        .collect();
    ratios.sort_by(|a, b| a.1.total_cmp(&b.1));
    ratios.truncate(n);
    ratios
}

/// Prints grouped averages and the best configurations.
pub fn render_summary<W: Write>(out: &mut W, results: &[BenchmarkResult]) -> io::Result<()> {
    writeln!(out, "\n===== BENCHMARK RESULTS SUMMARY =====")?;

    render_group(out, "SUPPORT VALUE", "Support", &averages_by(results, |r| r.min_support), |k| {
        format!("{k:.4}")
    })?;
    render_group(
        out,
        "CONFIDENCE VALUE",
        "Confidence",
        &averages_by(results, |r| r.min_confidence),
        |k| format!("{k:.4}"),
    )?;
    render_group(out, "MAX LENGTH", "Max Length", &averages_by(results, |r| r.max_length), |k| {
        k.to_string()
    })?;

    writeln!(out, "\n----- TOP 5 FASTEST CONFIGURATIONS -----")?;
    writeln!(
        out,
        "{:<8} {:<8} {:<8} {:<15} {:<15} {:<15}",
        "Support", "Conf", "MaxLen", "Time (ms)", "Itemsets", "Rules"
    )?;
    writeln!(out, "{}", "-".repeat(75))?;
    for r in fastest(results, 5) {
        writeln!(
            out,
            "{:<8.4} {:<8.2} {:<8} {:<15} {:<15} {:<15}",
            r.min_support,
            r.min_confidence,
            r.max_length,
            r.total_time.as_millis(),
            r.itemset_count,
            r.rule_count
        )?;
    }

    writeln!(out, "\n----- OPTIMAL CONFIGURATIONS (TIME/RULES RATIO) -----")?;
    writeln!(
        out,
        "{:<8} {:<8} {:<8} {:<15} {:<15} {:<15} {:<15}",
        "Support", "Conf", "MaxLen", "Time (ms)", "Itemsets", "Rules", "Ratio (ms/rule)"
    )?;
    writeln!(out, "{}", "-".repeat(90))?;
    for (r, ratio) in best_time_per_rule(results, 5) {
        writeln!(
            out,
            "{:<8.4} {:<8.2} {:<8} {:<15} {:<15} {:<15} {:<15.2}",
            r.min_support,
            r.min_confidence,
            r.max_length,
            r.total_time.as_millis(),
            r.itemset_count,
            r.rule_count,
            ratio
        )?;
    }
    Ok(())
}

fn render_group<W: Write, K>(
    out: &mut W,
    title: &str,
    label: &str,
    groups: &[GroupAverage<K>],
    key: impl Fn(&K) -> String,
) -> io::Result<()> {
    writeln!(out, "\n----- ANALYSIS BY {title} -----")?;
    writeln!(
        out,
        "{:<10} {:<15} {:<15} {:<15}",
        label, "Avg Time (ms)", "Avg Itemsets", "Avg Rules"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;
    for group in groups {
        writeln!(
            out,
            "{:<10} {:<15.1} {:<15.1} {:<15.1}",
            key(&group.key),
            group.time_ms,
            group.itemsets,
            group.rules
        )?;
    }
    Ok(())
}
