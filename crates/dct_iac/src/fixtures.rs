//! Fixed variable maps for planning the product modules in isolation.
//!
//! Values are dummies: they only need to satisfy the module's variable types
//! so that `terraform plan` succeeds without a real cluster.

use serde_json::{json, Value};

use crate::product::Product;
use crate::variables::VariableMap;

fn into_map(value: Value) -> VariableMap {
    match value {
        Value::Object(map) => map,
        _ => VariableMap::new(),
    }
}

/// The `vpc` module output shape expected by product modules.
pub fn vpc_default_module_variable() -> Value {
    json!({
        "vpc_id": "dummy_vpc_id",
        "private_subnets": ["subnet-dummy-private-1", "subnet-dummy-private-2"],
        "public_subnets": ["subnet-dummy-public-1", "subnet-dummy-public-2"],
        "private_subnets_cidr_blocks": ["10.0.0.0/18", "10.0.64.0/18"],
        "vpc_cidr_block": "10.0.0.0/16"
    })
}

/// The `eks` module output shape expected by product modules.
pub fn eks_default_module_variable() -> Value {
    json!({
        "kubernetes_provider_config": {
            "host": "dummy-host",
            "token": "dummy-token",
            "cluster_ca_certificate": "dummy-certificate"
        },
        "cluster_security_group": "dummy-sg"
    })
}

fn db_configuration() -> Value {
    json!({
        "db_allocated_storage": 5,
        "db_instance_class": "dummy_db_instance_class",
        "db_iops": 1000
    })
}

/// Inputs shared by every product module.
fn common_variables() -> VariableMap {
    into_map(json!({
        "environment_name": "dummy-environment",
        "namespace": "dummy-namespace",
        "eks": eks_default_module_variable(),
        "vpc": vpc_default_module_variable(),
        "pvc_claim_name": "dummy_pvc_claimname",
        "db_major_engine_version": "13",
        "ingress": {},
        "db_configuration": db_configuration()
    }))
}

pub fn bamboo_correct_variables() -> VariableMap {
    let mut vars = common_variables();
    vars.extend(into_map(json!({
        "dataset_url": null,
        "bamboo_configuration": {
            "helm_version": "1.0.0",
            "cpu": "1",
            "mem": "1Gi",
            "min_heap": "256m",
            "max_heap": "512m",
            "license": "dummy_license"
        },
        "admin_username": "dummy_admin_username",
        "admin_password": "dummy_admin_password",
        "admin_display_name": "dummy_admin_display_name",
        "admin_email_address": "dummy_admin@email_address.com",
        "bamboo_agent_configuration": {
            "helm_version": "1.0.0",
            "cpu": "1",
            "mem": "1Gi",
            "agent_count": 5
        }
    })));
    vars
}

pub fn jira_correct_variables() -> VariableMap {
    let mut vars = common_variables();
    vars.extend(into_map(json!({
        "replica_count": 1,
        "jira_configuration": {
            "helm_version": "1.0.0",
            "cpu": "1",
            "mem": "1Gi",
            "min_heap": "256m",
            "max_heap": "512m",
            "reserved_code_cache": "256m",
            "license": "dummy_license"
        }
    })));
    vars
}

pub fn confluence_correct_variables() -> VariableMap {
    let mut vars = common_variables();
    vars.extend(into_map(json!({
        "replica_count": 1,
        "enable_synchrony": false,
        "confluence_configuration": {
            "helm_version": "1.0.0",
            "cpu": "1",
            "mem": "1Gi",
            "min_heap": "256m",
            "max_heap": "512m",
            "license": "dummy_license"
        }
    })));
    vars
}

pub fn bitbucket_correct_variables() -> VariableMap {
    let mut vars = common_variables();
    vars.extend(into_map(json!({
        "replica_count": 1,
        "bitbucket_configuration": {
            "helm_version": "1.0.0",
            "cpu": "1",
            "mem": "1Gi",
            "min_heap": "256m",
            "max_heap": "512m",
            "license": "dummy_license"
        },
        "admin_configuration": {
            "admin_username": "dummy_admin_username",
            "admin_password": "dummy_admin_password",
            "admin_display_name": "dummy_admin_display_name",
            "admin_email_address": "dummy_admin@email_address.com"
        },
        "nfs_requests_cpu": "1",
        "nfs_requests_memory": "1Gi",
        "nfs_limits_cpu": "2",
        "nfs_limits_memory": "2Gi",
        "elasticsearch_cpu": "1",
        "elasticsearch_mem": "1Gi",
        "elasticsearch_storage": 10,
        "elasticsearch_replicas": 2
    })));
    vars
}

/// Correct variables for `product`'s module.
pub fn correct_variables(product: Product) -> VariableMap {
    match product {
        Product::Jira => jira_correct_variables(),
        Product::Confluence => confluence_correct_variables(),
        Product::Bitbucket => bitbucket_correct_variables(),
        Product::Bamboo => bamboo_correct_variables(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bamboo_variables_shape() {
        let vars = bamboo_correct_variables();
        assert_eq!(vars["environment_name"], "dummy-environment");
        assert_eq!(vars["dataset_url"], Value::Null);
        assert_eq!(vars["bamboo_agent_configuration"]["agent_count"], 5);
        assert_eq!(
            vars["eks"]["kubernetes_provider_config"]["host"],
            "dummy-host"
        );
        assert!(vars["vpc"]["vpc_id"].is_string());
    }

    #[test]
    fn test_each_product_has_its_configuration_block() {
        for product in Product::ALL {
            let vars = correct_variables(product);
            let key = format!("{}_configuration", product);
            assert!(vars.contains_key(&key), "missing {} for {}", key, product);
            assert!(vars.contains_key("db_configuration"));
        }
    }
}
