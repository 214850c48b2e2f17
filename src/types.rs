use serde::{Deserialize, Serialize};
use std::fmt;

/// The data kinds a port can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// A single scalar (int or float).
    Number,
    Boolean,
    /// An ordered sequence of numbers, e.g. a price history or indicator line.
    Series,
    /// One OHLCV record.
    Bar,
    /// Wildcard. As a target it accepts every producer.
    Any,
    /// Control flow only, carries no value.
    Exec,
}

impl DataType {
    pub const ALL: [DataType; 6] = [
        DataType::Number,
        DataType::Boolean,
        DataType::Series,
        DataType::Bar,
        DataType::Any,
        DataType::Exec,
    ];

    /// The target types a producer of this type may feed.
    pub fn compatible_targets(self) -> &'static [DataType] {
        match self {
            DataType::Number => &[DataType::Number, DataType::Any],
            DataType::Boolean => &[DataType::Boolean, DataType::Any],
            DataType::Series => &[DataType::Series, DataType::Any],
            DataType::Bar => &[DataType::Bar, DataType::Any],
            DataType::Any => &[
                DataType::Number,
                DataType::Boolean,
                DataType::Series,
                DataType::Bar,
                DataType::Any,
            ],
            DataType::Exec => &[DataType::Exec],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Series => "series",
            DataType::Bar => "bar",
            DataType::Any => "any",
            DataType::Exec => "exec",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checks whether an output of `source` may be wired into an input of `target`.
///
/// `Exec` only pairs with `Exec`. Apart from that an `Any` target accepts
/// everything and the table in [`DataType::compatible_targets`] decides.
pub fn can_connect(source: DataType, target: DataType) -> bool {
    if source == DataType::Exec || target == DataType::Exec {
        return source == target;
    }
    target == DataType::Any || source.compatible_targets().contains(&target)
}
