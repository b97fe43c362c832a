use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A single value in a provider table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Anything the provider sent that has no tabular meaning.
    Unsupported(String),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::Timestamp(value)
    }
}

/// Rows keyed by a named index, in provider order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub index_name: Option<String>,
    pub columns: Vec<String>,
    pub index: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            index_name: Some(index_name.into()),
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, index: Cell, row: Vec<Cell>) {
        self.index.push(index);
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: Option<String>,
    pub index_name: Option<String>,
    pub index: Vec<Cell>,
    pub values: Vec<Cell>,
}

/// What a provider hands back for one metric.
#[derive(Debug, Clone, PartialEq)]
pub enum FinancialData {
    Table(Table),
    Series(Series),
    Value(Value),
}

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StockReport {
    Data {
        #[serde(rename = "EARNINGS")]
        earnings: Value,
        #[serde(rename = "EPS")]
        eps: Value,
    },
    Error {
        error: String,
    },
}

impl StockReport {
    pub fn is_error(&self) -> bool {
        matches!(self, StockReport::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_shapes() {
        let data = StockReport::Data {
            earnings: json!([]),
            eps: json!([]),
        };
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"EARNINGS": [], "EPS": []})
        );

        let error = StockReport::Error {
            error: "boom".into(),
        };
        assert!(error.is_error());
        assert_eq!(serde_json::to_value(&error).unwrap(), json!({"error": "boom"}));
    }

    #[test]
    fn test_table_push() {
        let mut table = Table::new("period", vec!["current".into()]);
        assert!(table.is_empty());
        table.push_row("0q".into(), vec![Cell::Float(1.25)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.index[0], Cell::Text("0q".into()));
    }
}
