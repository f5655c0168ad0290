//! Terraform input variables.

use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::IacResult;

/// Terraform input variables: strings, numbers, nested maps and nulls.
pub type VariableMap = Map<String, Value>;

/// A variable map written to a temporary `.tfvars.json` file.
///
/// The file is removed when this value is dropped.
pub struct VarFile {
    file: NamedTempFile,
}

impl VarFile {
    /// Write `vars` to a new temporary var file.
    pub fn write(vars: &VariableMap) -> IacResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("dct-vars-")
            .suffix(".tfvars.json")
            .tempfile()?;

        serde_json::to_writer_pretty(&mut file, vars)?;
        file.flush()?;

        debug!("Wrote {} variables to {:?}", vars.len(), file.path());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_var_file_round_trips_nested_values() {
        let vars = json!({
            "environment_name": "dummy-environment",
            "dataset_url": null,
            "db_configuration": { "db_iops": 1000 }
        });
        let vars = vars.as_object().cloned().unwrap();

        let var_file = VarFile::write(&vars).unwrap();
        assert!(var_file
            .path()
            .to_string_lossy()
            .ends_with(".tfvars.json"));

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(var_file.path()).unwrap()).unwrap();
        assert_eq!(written["dataset_url"], Value::Null);
        assert_eq!(written["db_configuration"]["db_iops"], 1000);
    }

    #[test]
    fn test_var_file_removed_on_drop() {
        let var_file = VarFile::write(&VariableMap::new()).unwrap();
        let path = var_file.path().to_path_buf();
        assert!(path.exists());
        drop(var_file);
        assert!(!path.exists());
    }
}
