// In app/src/feed.rs

use anyhow::{Context, Result};
use core_types::Bar;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of a bar file. Only the close is used; other columns are ignored.
#[derive(Debug, Deserialize)]
struct BarRecord {
    close: Decimal,
}

/// Reads completed bars from a CSV file with a `close` column.
pub fn load_bars(path: &Path, tick_size: Decimal) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open bar file {}", path.display()))?;
    read_bars(file, tick_size).with_context(|| format!("Failed to read bars from {}", path.display()))
}

fn read_bars<R: Read>(source: R, tick_size: Decimal) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_reader(source);
    let mut bars = Vec::new();
    for (index, record) in reader.deserialize::<BarRecord>().enumerate() {
        let record = record.with_context(|| format!("Malformed bar record at row {}", index + 1))?;
        bars.push(Bar::new(index as u64, record.close, tick_size)?);
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_close_column_in_order() {
        let data = "time,close,volume\n1,100.25,10\n2,101.50,12\n3,99.75,8\n";
        let bars = read_bars(data.as_bytes(), dec!(0.25)).unwrap();

        let closes: Vec<_> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![dec!(100.25), dec!(101.50), dec!(99.75)]);
        assert_eq!(bars[2].index, 2);
        assert_eq!(bars[0].tick_size, dec!(0.25));
    }

    #[test]
    fn rejects_malformed_and_negative_closes() {
        assert!(read_bars("close\nabc\n".as_bytes(), dec!(0.25)).is_err());
        assert!(read_bars("close\n-1\n".as_bytes(), dec!(0.25)).is_err());
        assert!(read_bars("open\n1\n".as_bytes(), dec!(0.25)).is_err());
    }
}
