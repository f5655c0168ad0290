//! Catalog of AWS regions and instance sizes the deployment supports.

use serde_json::Value;

use dct_iac::VariableMap;

pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ap-south-1",
    "ca-central-1",
    "ap-northeast-1",
    "ap-southeast-2",
    "ap-southeast-1",
    "ap-northeast-2",
    "eu-central-1",
    "sa-east-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "af-south-1",
    "ap-east-1",
    "ap-northeast-3",
];

pub const AWS_INSTANCE_TYPES: &[&str] = &[
    "c4.large",
    "c4.xlarge",
    "c4.2xlarge",
    "c4.4xlarge",
    "c4.8xlarge",
    "c5.large",
    "c5.xlarge",
    "c5.2xlarge",
    "c5.4xlarge",
    "c5.9xlarge",
    "c5.18xlarge",
    "c5d.large",
    "c5d.xlarge",
    "c5d.2xlarge",
    "c5d.4xlarge",
    "c5d.9xlarge",
    "c5d.18xlarge",
    "d2.xlarge",
    "d2.2xlarge",
    "d2.4xlarge",
    "d2.8xlarge",
    "h1.2xlarge",
    "h1.4xlarge",
    "h1.8xlarge",
    "h1.16xlarge",
    "i3.large",
    "i3.xlarge",
    "i3.2xlarge",
    "i3.4xlarge",
    "i3.8xlarge",
    "i3.16xlarge",
    "i3.metal",
    "m4.large",
    "m4.xlarge",
    "m4.2xlarge",
    "m4.4xlarge",
    "m4.10xlarge",
    "m4.16xlarge",
    "m5.large",
    "m5.xlarge",
    "m5.2xlarge",
    "m5.4xlarge",
    "m5.12xlarge",
    "m5.24xlarge",
    "m5d.large",
    "m5d.xlarge",
    "m5d.2xlarge",
    "m5d.4xlarge",
    "m5d.12xlarge",
    "m5d.24xlarge",
    "r4.large",
    "r4.xlarge",
    "r4.2xlarge",
    "r4.4xlarge",
    "r4.8xlarge",
    "r4.16xlarge",
    "r5.large",
    "r5.xlarge",
    "r5.2xlarge",
    "r5.4xlarge",
    "r5.12xlarge",
    "r5.24xlarge",
    "r5d.large",
    "r5d.xlarge",
    "r5d.2xlarge",
    "r5d.4xlarge",
    "r5d.12xlarge",
    "r5d.24xlarge",
    "t2.medium",
    "t2.large",
    "t2.xlarge",
    "t2.2xlarge",
    "t3.medium",
    "t3.large",
    "t3.xlarge",
    "t3.2xlarge",
    "x1.16xlarge",
    "x1.32xlarge",
    "x1e.xlarge",
    "x1e.2xlarge",
    "x1e.4xlarge",
    "x1e.8xlarge",
    "x1e.16xlarge",
    "x1e.32xlarge",
    "z1d.large",
    "z1d.xlarge",
    "z1d.2xlarge",
    "z1d.3xlarge",
    "z1d.6xlarge",
    "z1d.12xlarge",
];

pub const AWS_DB_INSTANCE_CLASSES: &[&str] = &[
    "db.m5.large",
    "db.m5.xlarge",
    "db.m5.2xlarge",
    "db.m5.4xlarge",
    "db.m5.12xlarge",
    "db.m5.24xlarge",
    "db.m4.large",
    "db.m4.xlarge",
    "db.m4.2xlarge",
    "db.m4.4xlarge",
    "db.m4.10xlarge",
    "db.m4.16xlarge",
    "db.r5.large",
    "db.r5.xlarge",
    "db.r5.2xlarge",
    "db.r5.4xlarge",
    "db.r5.12xlarge",
    "db.r5.24xlarge",
    "db.r4.large",
    "db.r4.xlarge",
    "db.r4.2xlarge",
    "db.r4.4xlarge",
    "db.r4.8xlarge",
    "db.r4.16xlarge",
    "db.t3.medium",
    "db.t3.large",
    "db.t3.xlarge",
    "db.t3.2xlarge",
    "db.t2.medium",
    "db.t2.large",
    "db.t2.xlarge",
    "db.t2.2xlarge",
];

pub fn is_known_region(region: &str) -> bool {
    AWS_REGIONS.contains(&region)
}

pub fn is_known_instance_type(instance_type: &str) -> bool {
    AWS_INSTANCE_TYPES.contains(&instance_type)
}

pub fn is_known_db_instance_class(class: &str) -> bool {
    AWS_DB_INSTANCE_CLASSES.contains(&class)
}

/// Warnings for catalog values in `vars` that the deployment does not list.
///
/// Checks `region`, `eks.instance_types` and `db_configuration.db_instance_class`.
pub fn lint_variables(vars: &VariableMap) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(region) = vars.get("region").and_then(Value::as_str) {
        if !is_known_region(region) {
            warnings.push(format!("region '{}' is not a supported region", region));
        }
    }

    let instance_types = vars
        .get("eks")
        .and_then(|eks| eks.get("instance_types"))
        .and_then(Value::as_array);
    for instance_type in instance_types.into_iter().flatten().filter_map(Value::as_str) {
        if !is_known_instance_type(instance_type) {
            warnings.push(format!(
                "eks.instance_types: '{}' is not a supported instance type",
                instance_type
            ));
        }
    }

    if let Some(class) = vars
        .get("db_configuration")
        .and_then(|db| db.get("db_instance_class"))
        .and_then(Value::as_str)
    {
        if !is_known_db_instance_class(class) {
            warnings.push(format!(
                "db_configuration.db_instance_class: '{}' is not a supported instance class",
                class
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> VariableMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_catalog_lookups() {
        assert!(is_known_region("eu-north-1"));
        assert!(!is_known_region("mars-1"));
        assert!(is_known_instance_type("m5.2xlarge"));
        assert!(is_known_db_instance_class("db.t3.medium"));
        assert!(!is_known_db_instance_class("db.t3.micro"));
    }

    #[test]
    fn test_default_candidate_regions_are_known() {
        for region in &crate::settings::E2eSettings::default().candidate_regions {
            assert!(is_known_region(region), "{} missing from catalog", region);
        }
    }

    #[test]
    fn test_lint_clean_variables() {
        let warnings = lint_variables(&vars(json!({
            "region": "us-east-1",
            "eks": { "instance_types": ["m5.xlarge", "t3.large"] },
            "db_configuration": { "db_instance_class": "db.m5.large" }
        })));
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_lint_reports_each_unknown_value() {
        let warnings = lint_variables(&vars(json!({
            "region": "mars-1",
            "eks": { "instance_types": ["m5.xlarge", "m99.huge"] },
            "db_configuration": { "db_instance_class": "dummy_db_instance_class" }
        })));
        assert_eq!(warnings.len(), 3);
        assert!(warnings[1].contains("m99.huge"));
    }

    #[test]
    fn test_lint_fixture_flags_dummy_class() {
        let warnings = lint_variables(&dct_iac::fixtures::bamboo_correct_variables());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("dummy_db_instance_class"));
    }
}
