//! JSON Schema generation for Autotile files.
//!
//! Generates draft 2020-12 schemas from the Rust types, for editors that
//! validate JSONC files against a schema.

use schemars::{Schema, schema_for};

use crate::cli::Scenario;
use crate::config::AutotileConfig;

/// Identifier of the configuration schema.
pub const CONFIG_SCHEMA_ID: &str = "https://autotile.dev/schema/config.json";

/// Identifier of the scenario schema.
pub const SCENARIO_SCHEMA_ID: &str = "https://autotile.dev/schema/scenario.json";

fn with_id(mut schema: Schema, id: &str) -> Schema {
    schema.insert("$id".to_string(), serde_json::Value::from(id));
    schema
}

/// Generates the configuration file schema.
#[must_use]
pub fn config_schema() -> Schema { with_id(schema_for!(AutotileConfig), CONFIG_SCHEMA_ID) }

/// Generates the scenario file schema.
#[must_use]
pub fn scenario_schema() -> Schema { with_id(schema_for!(Scenario), SCENARIO_SCHEMA_ID) }

/// Renders a schema as pretty-printed JSON.
#[must_use]
pub fn print_schema(schema: &Schema) -> String {
    serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_schema_has_id_and_draft() {
        let schema = config_schema();
        let value = schema.as_value();

        assert_eq!(value["$id"], CONFIG_SCHEMA_ID);
        assert!(value["$schema"].as_str().is_some_and(|s| s.contains("2020-12")));
    }

    #[test]
    fn test_config_schema_lists_sections() {
        let output = print_schema(&config_schema());

        assert!(output.contains("preferences"));
        assert!(output.contains("engine"));
        assert!(output.contains("hostTimeoutMs"));
    }

    #[test]
    fn test_scenario_schema() {
        let schema = scenario_schema();
        assert_eq!(schema.as_value()["$id"], SCENARIO_SCHEMA_ID);
        assert!(print_schema(&schema).contains("displays"));
    }
}
