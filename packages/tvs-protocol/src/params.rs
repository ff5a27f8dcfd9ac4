//! Encodings of list and range valued parameters.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Identifier of a tracked series.
pub type SeriesId = u64;

/// Series identifiers, sent as one comma-joined parameter (`c=5,12,9`).
///
/// Order and duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesIds(pub Vec<SeriesId>);

impl SeriesIds {
    pub fn as_slice(&self) -> &[SeriesId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SeriesId>> for SeriesIds {
    fn from(ids: Vec<SeriesId>) -> Self {
        Self(ids)
    }
}

impl From<&[SeriesId]> for SeriesIds {
    fn from(ids: &[SeriesId]) -> Self {
        Self(ids.to_vec())
    }
}

impl fmt::Display for SeriesIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, self.0.iter())
    }
}

impl FromStr for SeriesIds {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .map(|item| {
                item.trim()
                    .parse()
                    .map_err(|_| ProtocolError::InvalidSeriesId(item.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Field names restricting which series fields the service returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList(pub Vec<String>);

impl FieldList {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, self.0.iter())
    }
}

/// Season or episode selector for `setstatus`.
///
/// Range expressions such as `1-3,5` are passed through untouched; the
/// service parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSpec {
    Single(u32),
    List(Vec<u32>),
    Expr(String),
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSpec::Single(n) => write!(f, "{}", n),
            RangeSpec::List(items) => write_joined(f, items.iter()),
            RangeSpec::Expr(expr) => f.write_str(expr),
        }
    }
}

impl From<u32> for RangeSpec {
    fn from(n: u32) -> Self {
        RangeSpec::Single(n)
    }
}

impl From<Vec<u32>> for RangeSpec {
    fn from(items: Vec<u32>) -> Self {
        RangeSpec::List(items)
    }
}

impl From<&str> for RangeSpec {
    fn from(expr: &str) -> Self {
        RangeSpec::Expr(expr.to_string())
    }
}

impl From<String> for RangeSpec {
    fn from(expr: String) -> Self {
        RangeSpec::Expr(expr)
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_ids_round_trip() {
        let ids = SeriesIds::from(vec![5, 12, 9]);
        let encoded = ids.to_string();
        assert_eq!(encoded, "5,12,9");
        let decoded: SeriesIds = encoded.parse().unwrap();
        assert_eq!(decoded.as_slice(), &[5, 12, 9]);
    }

    #[test]
    fn test_series_ids_keep_duplicates() {
        let ids = SeriesIds::from(vec![1, 2, 2, 3]);
        assert_eq!(ids.to_string(), "1,2,2,3");
    }

    #[test]
    fn test_empty_series_ids() {
        assert_eq!(SeriesIds::default().to_string(), "");
        assert!("".parse::<SeriesIds>().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_series_id_rejected() {
        let result = "1,x,3".parse::<SeriesIds>();
        assert!(matches!(result, Err(ProtocolError::InvalidSeriesId(item)) if item == "x"));
    }

    #[test]
    fn test_field_list() {
        assert_eq!(FieldList::new(["name", "lastseen"]).to_string(), "name,lastseen");
        assert_eq!(FieldList::default().to_string(), "");
    }

    #[test]
    fn test_range_spec_encodings() {
        assert_eq!(RangeSpec::from(3).to_string(), "3");
        assert_eq!(RangeSpec::from(vec![1, 2]).to_string(), "1,2");
        assert_eq!(RangeSpec::from("1-3,5").to_string(), "1-3,5");
    }
}
