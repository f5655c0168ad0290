//! Model of `terraform show -json` plan output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IacError, IacResult};

/// A resource as it appears in the plan's planned values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedResource {
    pub address: String,
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub provider_name: String,
    /// Attribute values known at plan time.
    #[serde(default, rename = "values")]
    pub attribute_values: Map<String, Value>,
}

impl PlannedResource {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attribute_values.get(name)
    }

    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }
}

/// A planned change to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub change: Change,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    format_version: String,
    #[serde(default)]
    terraform_version: Option<String>,
    #[serde(default)]
    planned_values: Option<RawPlannedValues>,
    #[serde(default)]
    resource_changes: Vec<ResourceChange>,
}

#[derive(Debug, Deserialize)]
struct RawPlannedValues {
    #[serde(default)]
    root_module: Option<RawModule>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    #[serde(default)]
    resources: Vec<PlannedResource>,
    #[serde(default)]
    child_modules: Vec<RawModule>,
}

impl RawModule {
    fn collect_into(self, map: &mut BTreeMap<String, PlannedResource>) {
        for resource in self.resources {
            map.insert(resource.address.clone(), resource);
        }
        for child in self.child_modules {
            child.collect_into(map);
        }
    }
}

/// Parsed plan with resources keyed by address.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub format_version: String,
    pub terraform_version: Option<String>,
    /// Planned values of every resource, including nested modules.
    pub resource_planned_values_map: BTreeMap<String, PlannedResource>,
    /// Planned changes keyed by address.
    pub resource_changes_map: BTreeMap<String, ResourceChange>,
}

impl Plan {
    /// Parse the output of `terraform show -json <planfile>`.
    pub fn from_json(json: &str) -> IacResult<Self> {
        let raw: RawPlan = serde_json::from_str(json)
            .map_err(|e| IacError::InvalidPlan(e.to_string()))?;

        let mut resource_planned_values_map = BTreeMap::new();
        if let Some(root) = raw.planned_values.and_then(|pv| pv.root_module) {
            root.collect_into(&mut resource_planned_values_map);
        }

        let resource_changes_map = raw
            .resource_changes
            .into_iter()
            .map(|rc| (rc.address.clone(), rc))
            .collect();

        Ok(Self {
            format_version: raw.format_version,
            terraform_version: raw.terraform_version,
            resource_planned_values_map,
            resource_changes_map,
        })
    }

    pub fn resource(&self, address: &str) -> Option<&PlannedResource> {
        self.resource_planned_values_map.get(address)
    }

    /// Addresses of all planned resources, sorted.
    pub fn addresses(&self) -> Vec<&str> {
        self.resource_planned_values_map
            .keys()
            .map(String::as_str)
            .collect()
    }

    /// Resources of a given type, e.g. `helm_release`.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a PlannedResource> + 'a {
        self.resource_planned_values_map
            .values()
            .filter(move |r| r.resource_type == resource_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = r#"{
        "format_version": "1.2",
        "terraform_version": "1.6.6",
        "planned_values": {
            "root_module": {
                "resources": [
                    {
                        "address": "helm_release.bamboo",
                        "mode": "managed",
                        "type": "helm_release",
                        "name": "bamboo",
                        "provider_name": "registry.terraform.io/hashicorp/helm",
                        "values": { "chart": "bamboo", "status": "deployed" }
                    }
                ],
                "child_modules": [
                    {
                        "address": "module.database",
                        "resources": [
                            {
                                "address": "module.database.aws_db_instance.this",
                                "mode": "managed",
                                "type": "aws_db_instance",
                                "name": "this",
                                "values": { "allocated_storage": 5 }
                            }
                        ],
                        "child_modules": [
                            {
                                "address": "module.database.module.sg",
                                "resources": [
                                    {
                                        "address": "module.database.module.sg.aws_security_group.this",
                                        "type": "aws_security_group",
                                        "name": "this"
                                    }
                                ]
                            }
                        ]
                    }
                ]
            }
        },
        "resource_changes": [
            {
                "address": "helm_release.bamboo",
                "type": "helm_release",
                "name": "bamboo",
                "change": { "actions": ["create"], "before": null, "after": { "chart": "bamboo" } }
            }
        ]
    }"#;

    #[test]
    fn test_parse_flattens_child_modules() {
        let plan = Plan::from_json(PLAN).unwrap();

        assert_eq!(plan.format_version, "1.2");
        assert_eq!(plan.terraform_version.as_deref(), Some("1.6.6"));
        assert_eq!(
            plan.addresses(),
            vec![
                "helm_release.bamboo",
                "module.database.aws_db_instance.this",
                "module.database.module.sg.aws_security_group.this",
            ]
        );

        let bamboo = plan.resource("helm_release.bamboo").unwrap();
        assert_eq!(bamboo.attribute_str("chart"), Some("bamboo"));
        assert_eq!(bamboo.resource_type, "helm_release");

        let sg = plan
            .resource("module.database.module.sg.aws_security_group.this")
            .unwrap();
        assert!(sg.attribute_values.is_empty());
    }

    #[test]
    fn test_parse_resource_changes() {
        let plan = Plan::from_json(PLAN).unwrap();
        let change = &plan.resource_changes_map["helm_release.bamboo"];
        assert_eq!(change.change.actions, vec!["create"]);
        assert_eq!(change.change.before, None);
    }

    #[test]
    fn test_resources_of_type() {
        let plan = Plan::from_json(PLAN).unwrap();
        let releases: Vec<_> = plan.resources_of_type("helm_release").collect();
        assert_eq!(releases.len(), 1);
    }

    #[test]
    fn test_empty_plan() {
        let plan = Plan::from_json(r#"{"format_version": "1.2"}"#).unwrap();
        assert!(plan.resource_planned_values_map.is_empty());
    }

    #[test]
    fn test_invalid_plan() {
        let err = Plan::from_json("not json").unwrap_err();
        assert!(matches!(err, IacError::InvalidPlan(_)));
    }
}
