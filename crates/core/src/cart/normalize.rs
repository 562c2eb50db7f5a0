use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::domain::cart::CartLine;
use crate::domain::product::{Product, ProductId};

/// What normalization had to repair in a persisted cart value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// The stored value was unparsable or not a sequence.
    pub malformed: bool,
    pub discarded: usize,
    pub coerced_quantities: usize,
    pub merged_duplicates: usize,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        !self.malformed
            && self.discarded == 0
            && self.coerced_quantities == 0
            && self.merged_duplicates == 0
    }
}

/// Reconciles a raw persisted cart value against the live catalog.
///
/// Records that are not objects, or whose product cannot be resolved by `id`
/// and then by `name`, are dropped. Quantities are coerced to an integer of at
/// least 1. Repeated references to one product fold into the first line.
pub fn normalize(raw: Option<&str>, catalog: &Catalog) -> (Vec<CartLine>, NormalizeReport) {
    let mut report = NormalizeReport::default();

    let Some(raw) = raw else {
        return (Vec::new(), report);
    };

    let records = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => records,
        Ok(Value::Null) => return (Vec::new(), report),
        Ok(_) | Err(_) => {
            report.malformed = true;
            return (Vec::new(), report);
        }
    };

    let mut lines: Vec<CartLine> = Vec::with_capacity(records.len());
    for record in &records {
        let Some(fields) = record.as_object() else {
            report.discarded += 1;
            continue;
        };

        let Some(product) = resolve_product(fields, catalog) else {
            report.discarded += 1;
            continue;
        };

        let (quantity, coerced) = coerce_quantity(fields);
        if coerced {
            report.coerced_quantities += 1;
        }

        if let Some(existing) = lines.iter_mut().find(|line| line.product_id == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            report.merged_duplicates += 1;
            continue;
        }

        let mut line = CartLine::from_product(product, quantity);
        if let Some(image) = fields.get("img").and_then(Value::as_str) {
            line.image = image.to_string();
        }
        lines.push(line);
    }

    (lines, report)
}

fn resolve_product<'a>(fields: &Map<String, Value>, catalog: &'a Catalog) -> Option<&'a Product> {
    let by_id = fields
        .get("id")
        .and_then(integral_id)
        .and_then(|id| catalog.find(ProductId(id)));
    if by_id.is_some() {
        return by_id;
    }

    fields
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .and_then(|name| catalog.find_by_name(name))
}

fn integral_id(value: &Value) -> Option<u32> {
    if let Some(id) = value.as_u64() {
        return u32::try_from(id).ok();
    }

    let id = value.as_f64()?;
    if id.fract() != 0.0 || id < 0.0 || id > f64::from(u32::MAX) {
        return None;
    }
    Some(id as u32)
}

/// Reads `qty`, falling back to the legacy `quantity` field only when `qty` is
/// absent or null. Returns the usable quantity and whether it had to be
/// repaired.
fn coerce_quantity(fields: &Map<String, Value>) -> (u32, bool) {
    let source = [fields.get("qty"), fields.get("quantity")]
        .into_iter()
        .flatten()
        .find(|value| !value.is_null());

    let Some(source) = source else {
        return (1, true);
    };

    if let Some(quantity) = source.as_u64().and_then(|value| u32::try_from(value).ok()) {
        if quantity >= 1 {
            return (quantity, false);
        }
    }

    match numeric_value(source) {
        Some(number) if number.is_finite() && number >= 1.0 => {
            let truncated = number.trunc();
            let quantity =
                if truncated > f64::from(u32::MAX) { u32::MAX } else { truncated as u32 };
            (quantity, true)
        }
        _ => (1, true),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed.parse::<f64>().ok()
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::domain::product::ProductId;

    use super::normalize;

    fn run(raw: &str) -> (Vec<crate::domain::cart::CartLine>, super::NormalizeReport) {
        normalize(Some(raw), &Catalog::builtin())
    }

    #[test]
    fn absent_value_is_an_empty_clean_cart() {
        let (lines, report) = normalize(None, &Catalog::builtin());

        assert!(lines.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn json_null_is_treated_as_empty() {
        let (lines, report) = run("null");

        assert!(lines.is_empty());
        assert!(!report.malformed);
    }

    #[test]
    fn unparsable_and_non_sequence_values_are_malformed() {
        for raw in ["{not json", r#"{"id":1,"qty":2}"#, "42", r#""cart""#] {
            let (lines, report) = run(raw);
            assert!(lines.is_empty(), "expected empty cart for {raw}");
            assert!(report.malformed, "expected malformed report for {raw}");
        }
    }

    #[test]
    fn unresolvable_entries_are_dropped_and_valid_entries_kept() {
        let (lines, report) = run(
            r#"[{"id":99,"name":"Discontinued","qty":2},{"id":1,"qty":2},null,false,7]"#,
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, ProductId(1));
        assert_eq!(report.discarded, 4);
    }

    #[test]
    fn falls_back_to_name_when_id_does_not_resolve() {
        let (lines, _) = run(r#"[{"id":"3","name":"Gari (5kg)","qty":1},{"name":"Palm Oil (5L)"}]"#);

        let ids: Vec<u32> = lines.iter().map(|line| line.product_id.0).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn quantity_is_coerced_to_at_least_one() {
        let (lines, report) = run(
            r#"[{"id":1,"qty":0},{"id":2,"qty":"abc"},{"id":3},{"id":4,"qty":-3},{"id":5,"qty":null,"quantity":"4"},{"id":6,"qty":2.9}]"#,
        );

        let quantities: Vec<u32> = lines.iter().map(|line| line.quantity).collect();
        assert_eq!(quantities, vec![1, 1, 1, 1, 4, 2]);
        assert_eq!(report.coerced_quantities, 6);
    }

    #[test]
    fn legacy_quantity_field_is_honoured() {
        let (lines, report) = run(r#"[{"id":2,"quantity":3}]"#);

        assert_eq!(lines[0].quantity, 3);
        assert_eq!(report.coerced_quantities, 0);
    }

    #[test]
    fn canonical_fields_replace_stale_snapshot_but_image_override_survives() {
        let (lines, _) = run(
            r#"[{"id":1,"name":"Old Rice","price":1,"img":"custom.jpg","qty":2},{"id":2,"price":1}]"#,
        );

        assert_eq!(lines[0].name, "Ofada Rice (5kg)");
        assert_eq!(lines[0].price, 8500);
        assert_eq!(lines[0].image, "custom.jpg");
        assert_eq!(lines[1].image, "Assets/Items/Poundo yam.JPG");
    }

    #[test]
    fn duplicate_references_fold_into_one_line() {
        let (lines, report) = run(r#"[{"id":3,"qty":1},{"id":1,"qty":1},{"name":"Ripe Plantain (Bunch)","qty":2}]"#);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, ProductId(3));
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(report.merged_duplicates, 1);
    }
}
