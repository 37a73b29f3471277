//! CSV rendering of mined itemsets and rules.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;
use tracing::{info, instrument};

use crate::dataset::{Dataset, ItemId};
use crate::error::ReportError;
use crate::item_sets::FrequentItemset;
use crate::rules::AssociationRule;

#[derive(Serialize)]
struct ItemsetRecord {
    support: String,
    itemsets: String,
    length: usize,
}

#[derive(Serialize)]
struct RuleRecord {
    antecedents: String,
    consequents: String,
    support: String,
    confidence: String,
    lift: String,
    leverage: String,
    conviction: String,
}

/// `{a,b,c}` with item names in ascending order.
pub fn format_items(dataset: &Dataset, items: &[ItemId]) -> String {
    format!("{{{}}}", dataset.item_names(items).join(","))
}

/// Six decimals, or `inf` for positive infinity.
pub fn format_metric(value: f64) -> String {
    if value == f64::INFINITY {
        "inf".to_owned()
    } else {
        format!("{value:.6}")
    }
}

/// Writes `support,itemsets,length` rows.
pub fn write_itemsets<W: Write>(
    writer: W,
    dataset: &Dataset,
    itemsets: &[FrequentItemset],
) -> Result<(), ReportError> {
    let mut csv = Writer::from_writer(writer);
    for frequent in itemsets {
        csv.serialize(ItemsetRecord {
            support: format_metric(frequent.support),
            itemsets: format_items(dataset, frequent.items()),
            length: frequent.length(),
        })?;
    }
    if itemsets.is_empty() {
        csv.write_record(["support", "itemsets", "length"])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `antecedents,consequents,support,confidence,lift,leverage,conviction`
/// rows.
pub fn write_rules<W: Write>(
    writer: W,
    dataset: &Dataset,
    rules: &[AssociationRule],
) -> Result<(), ReportError> {
    let mut csv = Writer::from_writer(writer);
    for rule in rules {
        csv.serialize(RuleRecord {
            antecedents: format_items(dataset, rule.antecedent.items()),
            consequents: format_items(dataset, rule.consequent.items()),
            support: format_metric(rule.support),
            confidence: format_metric(rule.confidence),
            lift: format_metric(rule.lift),
            leverage: format_metric(rule.leverage),
            conviction: format_metric(rule.conviction),
        })?;
    }
    if rules.is_empty() {
        csv.write_record([
            "antecedents",
            "consequents",
            "support",
            "confidence",
            "lift",
            "leverage",
            "conviction",
        ])?;
    }
    csv.flush()?;
    Ok(())
}

#[instrument(skip(dataset, itemsets), fields(path = %path.display(), count = itemsets.len()))]
pub fn save_itemsets(
    path: &Path,
    dataset: &Dataset,
    itemsets: &[FrequentItemset],
) -> Result<(), ReportError> {
    write_itemsets(create(path)?, dataset, itemsets)?;
    info!("frequent itemsets saved");
    Ok(())
}

#[instrument(skip(dataset, rules), fields(path = %path.display(), count = rules.len()))]
pub fn save_rules(
    path: &Path,
    dataset: &Dataset,
    rules: &[AssociationRule],
) -> Result<(), ReportError> {
    write_rules(create(path)?, dataset, rules)?;
    info!("association rules saved");
    Ok(())
}

pub(crate) fn create(path: &Path) -> Result<File, ReportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
