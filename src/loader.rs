//! Reads `basket,item` CSV records into a [`Dataset`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, instrument, warn};

use crate::dataset::{Dataset, DatasetBuilder};
use crate::error::LoadError;

/// Loads transactions from a two-column `basket,item` CSV file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_transactions(file)?;
    info!(
        transactions = dataset.len(),
        items = dataset.universe().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Groups `basket,item` records from `reader` into transactions.
///
/// The first record is treated as a header when its first field mentions
/// "basket" or its second mentions "item". Fields are trimmed. Records with
/// fewer than two fields or an undecodable line are skipped with a warning,
/// records with an empty basket or item are skipped silently, and repeated
/// items within a basket collapse to one.
pub fn read_transactions<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut records = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut builder = DatasetBuilder::new();
    let mut record = StringRecord::new();
    let mut row = 0u64;
    loop {
        row += 1;
        match records.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(row, error = %err, "skipping unreadable row");
                continue;
            }
        }

        if row == 1 && looks_like_header(&record) {
            continue;
        }
        if record.len() < 2 {
            warn!(row, "skipping row with fewer than 2 columns");
            continue;
        }

        let basket = record[0].trim();
        let item = record[1].trim();
        if basket.is_empty() || item.is_empty() {
            continue;
        }
        builder.add(basket, item);
    }

    Ok(builder.build())
}

fn looks_like_header(record: &StringRecord) -> bool {
    record.len() >= 2
        && (record[0].to_lowercase().contains("basket")
            || record[1].to_lowercase().contains("item"))
}
