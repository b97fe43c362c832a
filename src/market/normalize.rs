use chrono::SecondsFormat;
use serde_json::{Number, Value};

use crate::{
    error::{FunctionError, Result},
    models::{Cell, FinancialData, Record, Series, Table},
};

/// Converts provider output into plain JSON.
///
/// Tables become an ordered list of records with the index restored as the
/// first column. Series are treated as a two-column table. Anything else
/// passes through untouched.
pub fn to_json_serializable(data: FinancialData) -> Result<Value> {
    match data {
        FinancialData::Table(table) => Ok(Value::Array(
            table_to_records(&table)?.into_iter().map(Value::Object).collect(),
        )),
        FinancialData::Series(series) => to_json_serializable(FinancialData::Table(series_to_table(series))),
        FinancialData::Value(value) => Ok(value),
    }
}

pub fn table_to_records(table: &Table) -> Result<Vec<Record>> {
    let index_column = table.index_name.as_deref().unwrap_or("index");

    table
        .index
        .iter()
        .zip(&table.rows)
        .map(|(index, row)| {
            let mut record = Record::new();
            record.insert(index_column.to_string(), encode_cell(index)?);
            for (column, cell) in table.columns.iter().zip(row) {
                record.insert(column.clone(), encode_cell(cell)?);
            }
            Ok(record)
        })
        .collect()
}

fn series_to_table(series: Series) -> Table {
    let column = series.name.unwrap_or_else(|| "0".to_string());
    Table {
        index_name: series.index_name,
        columns: vec![column],
        index: series.index,
        rows: series.values.into_iter().map(|value| vec![value]).collect(),
    }
}

/// Encodes one cell, rendering dates and timestamps as ISO-8601 text.
pub fn encode_cell(cell: &Cell) -> Result<Value> {
    Ok(match cell {
        Cell::Null => Value::Null,
        Cell::Bool(value) => Value::Bool(*value),
        Cell::Int(value) => Value::Number((*value).into()),
        Cell::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
        Cell::Text(value) => Value::String(value.clone()),
        Cell::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
        Cell::Timestamp(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        Cell::Unsupported(type_name) => {
            return Err(FunctionError::UnsupportedType {
                type_name: type_name.clone(),
            })
        }
    })
}
