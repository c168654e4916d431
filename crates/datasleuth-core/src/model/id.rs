/// Scalar-or-list identifier fields.
///
/// Most files resolve to a single sample and a single patient, but a summary
/// table can resolve to many of each.  Downstream consumers (JSON document,
/// HTML tables, research-object bundles) receive a plain string when exactly
/// one value applies and an array when several do, so the distinction is a
/// proper sum type here rather than a runtime shape check on their side.
use serde::{Serialize, Serializer};

/// A resolved identifier field: one value or several.
///
/// The serialized form follows the field's formatting contract: `Single`
/// becomes a JSON string, `Many` a JSON array.  "No patient resolved" is
/// `Single("")` so the field is always present on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdField {
    Single(String),
    Many(Vec<String>),
}

impl IdField {
    /// Collapse a resolved identifier list into the scalar-or-list form:
    /// zero values → empty scalar, one value → that value as a scalar,
    /// several → the full list.
    pub fn from_vec(mut ids: Vec<String>) -> Self {
        match ids.len() {
            0 => Self::Single(String::new()),
            1 => Self::Single(ids.remove(0)),
            _ => Self::Many(ids),
        }
    }

    /// All values in order.  An unresolved field yields one empty string;
    /// consumers that want "real" identifiers should filter those out.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Many(v) => v,
        }
    }
}

impl Serialize for IdField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(s) => serializer.serialize_str(s),
            Self::Many(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_empty_is_empty_scalar() {
        assert_eq!(IdField::from_vec(vec![]), IdField::Single(String::new()));
    }

    #[test]
    fn from_vec_single_is_scalar() {
        assert_eq!(
            IdField::from_vec(vec!["S1".into()]),
            IdField::Single("S1".into())
        );
    }

    #[test]
    fn from_vec_many_keeps_order() {
        assert_eq!(
            IdField::from_vec(vec!["S2".into(), "S1".into()]),
            IdField::Many(vec!["S2".into(), "S1".into()])
        );
    }

    /// A scalar serializes as a JSON string, a list as a JSON array.
    #[test]
    fn serialization_shape() {
        let single = serde_json::to_value(IdField::Single("S1".into())).unwrap();
        assert_eq!(single, serde_json::json!("S1"));

        let many =
            serde_json::to_value(IdField::Many(vec!["S1".into(), "S2".into()])).unwrap();
        assert_eq!(many, serde_json::json!(["S1", "S2"]));

        let none = serde_json::to_value(IdField::from_vec(vec![])).unwrap();
        assert_eq!(none, serde_json::json!(""));
    }
}
