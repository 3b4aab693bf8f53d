use super::{
    dataset::{ColumnBuilder, Dataset},
    value::Value,
};
use crate::CoreError;
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, LargeStringArray, StringArray},
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Schema},
    record_batch::RecordBatch,
    util::display::{ArrayFormatter, FormatOptions},
};
use regex::Regex;
use std::{
    fs::File,
    io::{Seek, SeekFrom},
    path::Path,
    sync::Arc,
};
use tracing::debug;

pub const INFER_SCHEMA_RECORDS: usize = 1000;

/// Cells read as missing: empty fields plus the usual spreadsheet and dataframe null markers.
pub const MISSING_PATTERN: &str = r"^(|#N/A|#N/A N/A|#NA|-1\.#IND|-1\.#QNAN|-NaN|-nan|1\.#IND|1\.#QNAN|<NA>|N/A|NA|NULL|NaN|None|n/a|nan|null)$";

/// Reads a delimited text file with a header row into a [`Dataset`], inferring column types.
pub fn read_csv(path: &Path) -> Result<Dataset, CoreError> {
    let mut file = File::open(path)?;

    let format = Format::default()
        .with_header(true)
        .with_null_regex(Regex::new(MISSING_PATTERN)?);
    let (schema, records) = format
        .clone()
        .infer_schema(&mut file, Some(INFER_SCHEMA_RECORDS))?;
    debug!(schema = ?schema, records, "inferred csv schema");

    file.seek(SeekFrom::Start(0))?;

    let reader = ReaderBuilder::new(Arc::new(schema.clone()))
        .with_format(format)
        .build(file)?;

    let batches = reader.collect::<Result<Vec<RecordBatch>, _>>()?;

    record_batches_to_dataset(&schema, &batches)
}

pub fn record_batches_to_dataset(
    schema: &Schema,
    batches: &[RecordBatch],
) -> Result<Dataset, CoreError> {
    let mut builders: Vec<ColumnBuilder> = schema
        .fields()
        .iter()
        .map(|field| ColumnBuilder::new(field.name().as_str()))
        .collect();

    for batch in batches {
        for (builder, column) in builders.iter_mut().zip(batch.columns()) {
            append_array(builder, column)?;
        }
    }

    Dataset::new(builders.into_iter().map(ColumnBuilder::finish).collect())
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef) -> Result<&'a T, CoreError> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| CoreError::Downcast(array.data_type().clone()))
}

fn append_array(builder: &mut ColumnBuilder, array: &ArrayRef) -> Result<(), CoreError> {
    match array.data_type() {
        DataType::Int64 => downcast::<Int64Array>(array)?
            .iter()
            .for_each(|value| builder.push(value.into())),
        DataType::Float64 => downcast::<Float64Array>(array)?
            .iter()
            .for_each(|value| builder.push(value.into())),
        DataType::Boolean => downcast::<BooleanArray>(array)?
            .iter()
            .for_each(|value| builder.push(value.into())),
        DataType::Utf8 => downcast::<StringArray>(array)?
            .iter()
            .for_each(|value| builder.push(value.into())),
        DataType::LargeUtf8 => downcast::<LargeStringArray>(array)?
            .iter()
            .for_each(|value| builder.push(value.into())),
        DataType::Null => (0..array.len()).for_each(|_| builder.push(Value::Missing)),
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;

            for index in 0..array.len() {
                if array.is_null(index) {
                    builder.push(Value::Missing);
                } else {
                    builder.push(Value::text(&formatter.value(index).to_string()));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::Field;
    use std::io::Write;
    use tempdir::TempDir;

    #[test]
    fn converts_record_batches() {
        let schema = Schema::new(vec![
            Field::new("age", DataType::Int64, true),
            Field::new("profession", DataType::Utf8, true),
            Field::new("pay", DataType::Float64, true),
        ]);

        let batch = RecordBatch::try_new(
            Arc::new(schema.clone()),
            vec![
                Arc::new(Int64Array::from(vec![Some(18), None, Some(18)])),
                Arc::new(StringArray::from(vec!["Sales", "", "Marketing"])),
                Arc::new(Float64Array::from(vec![54.0, f64::NAN, 42.5])),
            ],
        )
        .unwrap();

        let dataset = record_batches_to_dataset(&schema, &[batch.clone(), batch]).unwrap();

        assert_eq!(dataset.num_rows(), 6);
        assert_eq!(dataset.value(1, 0), &Value::Missing);
        assert_eq!(dataset.value(1, 1), &Value::Missing);
        assert_eq!(dataset.value(1, 2), &Value::Missing);
        assert_eq!(dataset.value(5, 2), &Value::Float(42.5));
        assert_eq!(dataset.column(0).distinct(), 1);
    }

    #[test]
    fn reads_csv_with_inferred_types() {
        let dir = TempDir::new("traitscan").unwrap();
        let path = dir.path().join("people.csv");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "age,profession,pay,remote").unwrap();
        writeln!(file, "18,Sales,54.5,true").unwrap();
        writeln!(file, "40,,54.5,false").unwrap();
        writeln!(file, ",Engineering,120,true").unwrap();
        drop(file);

        let dataset = read_csv(&path).unwrap();

        assert_eq!(
            dataset.column_names(),
            vec!["age", "profession", "pay", "remote"]
        );
        assert_eq!(dataset.num_rows(), 3);
        assert_eq!(dataset.value(0, 0), &Value::Integer(18));
        assert_eq!(dataset.value(2, 0), &Value::Missing);
        assert_eq!(dataset.value(1, 1), &Value::Missing);
        assert_eq!(dataset.value(2, 2), &Value::Float(120.0));
        assert_eq!(dataset.value(1, 3), &Value::Boolean(false));
    }

    #[test]
    fn null_markers_are_missing() {
        let dir = TempDir::new("traitscan").unwrap();
        let path = dir.path().join("markers.csv");
        std::fs::write(
            &path,
            "age,city\n18,Berlin\n18,NA\n20,Berlin\nNaN,null\nN/A,Paris\n18,NAN\n",
        )
        .unwrap();

        let dataset = read_csv(&path).unwrap();

        assert_eq!(dataset.value(0, 0), &Value::Integer(18));
        assert_eq!(dataset.value(1, 1), &Value::Missing);
        assert_eq!(dataset.value(3, 0), &Value::Missing);
        assert_eq!(dataset.value(3, 1), &Value::Missing);
        assert_eq!(dataset.value(4, 0), &Value::Missing);
        assert_eq!(dataset.value(5, 1), &Value::text("NAN"));
        assert_eq!(dataset.column(0).missing(), 2);
        assert_eq!(dataset.column(1).missing(), 2);
    }

    #[test]
    fn null_markers_are_never_chosen_as_traits() {
        let dir = TempDir::new("traitscan").unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(
            &path,
            "age,city\n18,Berlin\n18,NA\n20,Berlin\n20,Berlin\n18,Berlin\nNaN,Berlin\n",
        )
        .unwrap();

        let dataset = read_csv(&path).unwrap();
        let identification = crate::GreedyIdentifier::new(&dataset, 1).identify(1).unwrap();

        assert!(identification
            .traits
            .iter()
            .all(|selected| !selected.value.is_missing()));
        assert_eq!(identification.traits.columns().collect::<Vec<_>>(), vec!["age"]);
        assert_eq!(identification.remaining, 3);
    }

    #[test]
    fn header_only_csv_is_empty() {
        let dir = TempDir::new("traitscan").unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "age,profession\n").unwrap();

        assert!(matches!(read_csv(&path), Err(CoreError::EmptyDataset)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_csv(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
