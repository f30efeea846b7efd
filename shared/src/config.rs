use std::env;

pub const USER_TABLE_VAR: &str = "USER_TABLE";
pub const ITEM_TABLE_VAR: &str = "ITEM_TABLE";
pub const DYNAMODB_ENDPOINT_VAR: &str = "DYNAMODB_ENDPOINT";

/// Runtime configuration read from the Lambda environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayConfig {
    pub user_table: String,
    pub item_table: String,
    /// Endpoint override, e.g. DynamoDB Local at `http://localhost:8000`
    pub dynamodb_endpoint: Option<String>,
}

impl GatewayConfig {
    /// Missing table names are not rejected here; DynamoDB reports them on
    /// the first call against the table.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_table = table_name(&lookup, USER_TABLE_VAR);
        let item_table = table_name(&lookup, ITEM_TABLE_VAR);
        let dynamodb_endpoint = lookup(DYNAMODB_ENDPOINT_VAR).filter(|v| !v.is_empty());

        Self {
            user_table,
            item_table,
            dynamodb_endpoint,
        }
    }
}

fn table_name<F>(lookup: &F, var: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(name) if !name.is_empty() => name,
        _ => {
            tracing::warn!("{} is not set; requests against this table will fail", var);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reads_tables_and_endpoint() {
        let vars: HashMap<&str, &str> = [
            ("USER_TABLE", "users-dev"),
            ("ITEM_TABLE", "items-dev"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]
        .into_iter()
        .collect();

        let config = GatewayConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.user_table, "users-dev");
        assert_eq!(config.item_table, "items-dev");
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn missing_values_are_not_fatal() {
        let config = GatewayConfig::from_lookup(|_| None);
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn empty_endpoint_is_ignored() {
        let config = GatewayConfig::from_lookup(|k| {
            (k == DYNAMODB_ENDPOINT_VAR).then(String::new)
        });
        assert!(config.dynamodb_endpoint.is_none());
    }
}
