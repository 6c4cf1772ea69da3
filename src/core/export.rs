use crate::core::{ProductRecord, Result};

pub const CSV_HEADER: [&str; 4] = ["Name", "Price", "Category", "Details"];

/// Header row first, then one row per record in collection order. The header
/// is written even when there are no records.
pub fn records_to_csv(records: &[ProductRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.price.as_str(),
            record.category.as_str(),
            record.details.as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

pub fn records_to_json(records: &[ProductRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// Reads back a file produced by [`records_to_csv`].
pub fn records_from_csv(data: &[u8]) -> Result<Vec<ProductRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        records.push(ProductRecord {
            name: field(0),
            price: field(1),
            category: field(2),
            details: field(3),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("Widget A", "9.99", "Tools", "Steel, 10cm"),
            ProductRecord::new("Widget B", "14.50", "Tools", "Says \"hello\"\non two lines"),
        ]
    }

    #[test]
    fn test_csv_header_only_for_empty_input() {
        let data = records_to_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(data).unwrap(), "Name,Price,Category,Details\n");
    }

    #[test]
    fn test_csv_quotes_embedded_delimiters() {
        let data = records_to_csv(&widgets()).unwrap();
        let text = String::from_utf8(data.clone()).unwrap();

        assert!(text.starts_with("Name,Price,Category,Details\nWidget A,9.99,Tools,\"Steel, 10cm\"\n"));
        assert_eq!(records_from_csv(&data).unwrap(), widgets());
    }

    #[test]
    fn test_json_array_keeps_order() {
        let data = records_to_json(&widgets()).unwrap();
        let parsed: Vec<ProductRecord> = serde_json::from_slice(&data).unwrap();
        assert_eq!(parsed, widgets());

        let empty = records_to_json(&[]).unwrap();
        assert_eq!(String::from_utf8(empty).unwrap(), "[]");
    }
}
