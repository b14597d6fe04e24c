use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    /// Builds the id assigned to admin-created products:
    /// `<prefix>-<unix-millis>`. The timestamp is taken as an argument so
    /// callers control the clock.
    pub fn generated(prefix: &str, at: DateTime<Utc>) -> Self {
        Self(format!("{prefix}-{}", at.timestamp_millis()))
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry. `image` is a reference to an uploaded image resource
/// (public URL or static path), never inline image data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a product; everything except the generated id and
/// timestamps, which the catalog owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::ProductId;

    #[test]
    fn generated_id_combines_prefix_and_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = ProductId::generated("aria-voile", at);
        assert_eq!(id.0, "aria-voile-1700000000123");
    }
}
