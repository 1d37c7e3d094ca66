//! Property rendering.
//!
//! The graph store rejects NaN floats and has no null. Rendering therefore:
//! - omits a null cell of a text column
//! - writes a null cell of a numeric column as the string `"NaN"`
//! - writes non-finite floats as `"NaN"`, `"Infinity"` or `"-Infinity"`
//!
//! A column is numeric when the adapter declares it so, or when every
//! non-null value in it is a number (and there is at least one). Cells of a
//! numeric column are written as numbers; everything else keeps its source
//! text.

use tracing::debug;

use oncograph_common::{Properties, Table, Value};

pub const NAN_MARKER: &str = "NaN";

/// A source column and the property key it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyColumn {
    pub column: String,
    pub key: String,
}

impl PropertyColumn {
    pub fn new(column: impl Into<String>) -> Self {
        let column = column.into();
        Self { key: column.clone(), column }
    }

    pub fn renamed(column: impl Into<String>, key: impl Into<String>) -> Self {
        Self { column: column.into(), key: key.into() }
    }
}

impl From<&str> for PropertyColumn {
    fn from(column: &str) -> Self { PropertyColumn::new(column) }
}

impl From<String> for PropertyColumn {
    fn from(column: String) -> Self { PropertyColumn::new(column) }
}

/// Render one cell. `None` means "leave the key out".
pub fn render_value(value: &Value, numeric: bool) -> Option<Value> {
    if value.is_null() {
        return numeric.then(|| Value::from(NAN_MARKER));
    }
    let typed = if numeric { value.to_number().unwrap_or_else(|| value.clone()) } else { value.clone() };
    match typed {
        Value::Float(x) if x.is_nan() => Some(Value::from(NAN_MARKER)),
        Value::Float(x) if x.is_infinite() => {
            Some(Value::from(if x > 0.0 { "Infinity" } else { "-Infinity" }))
        }
        other => Some(other),
    }
}

#[derive(Debug, Clone)]
struct Slot {
    index: usize,
    key: String,
    numeric: bool,
}

/// Property columns resolved against one table.
#[derive(Debug, Clone)]
pub struct PropertyRenderer {
    slots: Vec<Slot>,
}

impl PropertyRenderer {
    /// Columns absent from `table` are skipped.
    pub fn new<'p, I>(table: &Table, columns: I, declared_numeric: &[String]) -> Self
    where
        I: IntoIterator<Item = &'p PropertyColumn>,
    {
        let mut slots = Vec::new();
        for pc in columns {
            let Some(index) = table.column_index(&pc.column) else {
                debug!(column = %pc.column, "Property column not in table; skipped");
                continue;
            };
            let numeric = declared_numeric.contains(&pc.column) || table.is_numeric_column(&pc.column);
            slots.push(Slot { index, key: pc.key.clone(), numeric });
        }
        Self { slots }
    }

    /// Table indices of the rendered columns, in property order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().map(|s| s.index)
    }

    pub fn render(&self, row: &[Value]) -> Properties {
        self.slots
            .iter()
            .filter_map(|s| render_value(&row[s.index], s.numeric).map(|v| (s.key.clone(), v)))
            .collect()
    }
}
