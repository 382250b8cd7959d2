use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipauto::utoipa_ignore;

// Referenced from the path macros with concrete type arguments; excluded
// from schema auto-discovery because it is generic.
#[utoipa_ignore]
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct GenericResponse<D> {
    pub status: bool,
    pub customer_message: String,
    pub code: String,
    pub data: Option<D>,
}

impl<D> GenericResponse<D> {
    pub fn success(message: &str, data: Option<D>) -> Self {
        Self {
            status: true,
            customer_message: String::from(message),
            code: String::from("200"),
            data,
        }
    }

    pub fn error(message: &str, code: &str, data: Option<D>) -> Self {
        Self {
            status: false,
            customer_message: String::from(message),
            code: String::from(code),
            data,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyType {
    Eur,
    Usd,
    Gbp,
}

impl std::fmt::Display for CurrencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CurrencyType::Eur => "EUR",
            CurrencyType::Usd => "USD",
            CurrencyType::Gbp => "GBP",
        };
        write!(f, "{}", s)
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}
