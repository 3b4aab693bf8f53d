use super::value::Value;
use crate::CoreError;
use std::collections::HashMap;

static MISSING: Value = Value::Missing;

/// A dictionary encoded column. Every row holds the code of its value, `None` if missing.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    dictionary: Vec<Value>,
    codes: Vec<Option<u32>>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn code(&self, row: usize) -> Option<u32> {
        self.codes[row]
    }

    pub fn decode(&self, code: u32) -> &Value {
        &self.dictionary[code as usize]
    }

    pub fn value(&self, row: usize) -> &Value {
        self.code(row).map_or(&MISSING, |code| self.decode(code))
    }

    pub fn distinct(&self) -> usize {
        self.dictionary.len()
    }

    pub fn missing(&self) -> usize {
        self.codes.iter().filter(|code| code.is_none()).count()
    }

    pub fn lookup(&self, value: &Value) -> Option<u32> {
        self.dictionary
            .iter()
            .position(|candidate| candidate == value)
            .map(|position| position as u32)
    }
}

pub struct ColumnBuilder {
    name: String,
    dictionary: Vec<Value>,
    lookup: HashMap<Value, u32>,
    codes: Vec<Option<u32>>,
}

impl ColumnBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dictionary: vec![],
            lookup: HashMap::new(),
            codes: vec![],
        }
    }

    pub fn push(&mut self, value: Value) {
        let value = value.normalize();

        if value.is_missing() {
            self.codes.push(None);
            return;
        }

        let code = match self.lookup.get(&value) {
            Some(code) => *code,
            None => {
                let code = self.dictionary.len() as u32;
                self.dictionary.push(value.clone());
                self.lookup.insert(value, code);
                code
            }
        };

        self.codes.push(Some(code));
    }

    pub fn finish(self) -> Column {
        Column {
            name: self.name,
            dictionary: self.dictionary,
            codes: self.codes,
        }
    }
}

/// An immutable, column-major table. Shared read-only between all workers of a run.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, CoreError> {
        let rows = columns.first().map_or(0, Column::len);

        if rows == 0 {
            return Err(CoreError::EmptyDataset);
        }

        for column in &columns {
            if column.len() != rows {
                return Err(CoreError::ColumnLength {
                    name: column.name.clone(),
                    expected: rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn from_rows<R>(names: &[&str], rows: R) -> Result<Self, CoreError>
    where
        R: IntoIterator<Item = Vec<Value>>,
    {
        let mut builders: Vec<ColumnBuilder> =
            names.iter().map(|name| ColumnBuilder::new(*name)).collect();

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != builders.len() {
                return Err(CoreError::RowWidth {
                    row: index,
                    expected: builders.len(),
                    actual: row.len(),
                });
            }

            for (builder, value) in builders.iter_mut().zip(row) {
                builder.push(value);
            }
        }

        Self::new(builders.into_iter().map(ColumnBuilder::finish).collect())
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> &Column {
        &self.columns[index]
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn value(&self, row: usize, column: usize) -> &Value {
        self.columns[column].value(row)
    }

    /// Drops the named columns, e.g. true identifiers that must not take part in the search.
    pub fn without_columns(self, names: &[String]) -> Result<Self, CoreError> {
        self.ensure_known(names)?;

        let columns = self
            .columns
            .into_iter()
            .filter(|column| !names.contains(&column.name))
            .collect();

        Self::new(columns)
    }

    /// Keeps only the named columns, in dataset order.
    pub fn with_columns(self, names: &[String]) -> Result<Self, CoreError> {
        self.ensure_known(names)?;

        let columns = self
            .columns
            .into_iter()
            .filter(|column| names.contains(&column.name))
            .collect();

        Self::new(columns)
    }

    fn ensure_known(&self, names: &[String]) -> Result<(), CoreError> {
        match names.iter().find(|name| self.column_index(name).is_none()) {
            Some(name) => Err(CoreError::UnknownColumn(name.clone())),
            None => Ok(()),
        }
    }

    /// Rows whose value equals `value` in every `(column name, value)` filter.
    pub fn matching_rows<'a, F>(&self, filters: F) -> Result<Vec<usize>, CoreError>
    where
        F: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut rows: Vec<usize> = (0..self.rows).collect();

        for (name, value) in filters {
            let column = self
                .column_index(name)
                .map(|index| &self.columns[index])
                .ok_or_else(|| CoreError::UnknownColumn(name.to_string()))?;

            match column.lookup(value) {
                Some(code) => rows.retain(|row| column.code(*row) == Some(code)),
                None => rows.clear(),
            }
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Dataset {
        Dataset::from_rows(
            &["name", "age", "city"],
            vec![
                vec!["Max".into(), 18i64.into(), "Berlin".into()],
                vec!["Mia".into(), 26i64.into(), Value::Missing],
                vec!["Noa".into(), 18i64.into(), "Berlin".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn dictionary_encodes_columns() {
        let dataset = people();
        let age = dataset.column(1);

        assert_eq!(dataset.num_rows(), 3);
        assert_eq!(age.distinct(), 2);
        assert_eq!(age.code(0), age.code(2));
        assert_eq!(dataset.value(1, 2), &Value::Missing);
        assert_eq!(dataset.column(2).missing(), 1);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let result = Dataset::from_rows(&["a"], Vec::<Vec<Value>>::new());
        assert!(matches!(result, Err(CoreError::EmptyDataset)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = Dataset::from_rows(&["a", "b"], vec![vec![Value::from(1i64)]]);
        assert!(matches!(result, Err(CoreError::RowWidth { row: 0, .. })));
    }

    #[test]
    fn drops_identifier_columns() {
        let dataset = people().without_columns(&["name".to_string()]).unwrap();
        assert_eq!(dataset.column_names(), vec!["age", "city"]);

        let result = people().without_columns(&["id".to_string()]);
        assert!(matches!(result, Err(CoreError::UnknownColumn(name)) if name == "id"));
    }

    #[test]
    fn keeps_selected_columns() {
        let dataset = people()
            .with_columns(&["city".to_string(), "age".to_string()])
            .unwrap();
        assert_eq!(dataset.column_names(), vec!["age", "city"]);
    }

    #[test]
    fn filters_rows_by_exact_match() {
        let dataset = people();
        let age = Value::Integer(18);
        let city = Value::from("Berlin");

        assert_eq!(
            dataset.matching_rows(vec![("age", &age), ("city", &city)]).unwrap(),
            vec![0, 2]
        );
        assert!(dataset
            .matching_rows(vec![("city", &Value::from("Hamburg"))])
            .unwrap()
            .is_empty());
    }
}
