use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Sort direction on the bounded quantity, keyed by which criteria are present.
    ///
    /// | text | min | max | order          |
    /// |------|-----|-----|----------------|
    /// | any  |  -  |  -  | identity only  |
    /// |  -   |  x  |  -  | quantity ASC   |
    /// |  -   |  -  |  x  | quantity DESC  |
    /// |  -   |  x  |  x  | quantity ASC   |
    /// |  x   |  x  |  -  | quantity ASC   |
    /// |  x   |  -  |  x  | quantity DESC  |
    /// |  x   |  x  |  x  | quantity DESC  |
    ///
    /// The last row differs from the untexted range row on purpose.
    pub fn decide(has_text: bool, has_min: bool, has_max: bool) -> Option<SortDirection> {
        match (has_text, has_min, has_max) {
            (_, false, false) => None,
            (_, true, false) => Some(SortDirection::Asc),
            (_, false, true) => Some(SortDirection::Desc),
            (false, true, true) => Some(SortDirection::Asc),
            (true, true, true) => Some(SortDirection::Desc),
        }
    }

    /// Full ordering: the quantity (when sorted) then the identity column as tie-breaker.
    pub fn resolve(
        direction: Option<SortDirection>,
        quantity_column: &str,
        identity_column: &str,
    ) -> Vec<FilterOrderInfo> {
        let mut out = Vec::with_capacity(2);
        if let Some(sort) = direction {
            out.push(FilterOrderInfo { column: quantity_column.to_string(), sort });
        }
        out.push(FilterOrderInfo { column: identity_column.to_string(), sort: SortDirection::Asc });
        out
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
