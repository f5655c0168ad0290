//! Terraform runner over a command runner.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use dct_runner::{CommandConfig, CommandRunner, RunConfig};

use crate::error::{IacError, IacResult};
use crate::plan::Plan;
use crate::variables::{VarFile, VariableMap};

/// Result of a Terraform operation.
#[derive(Debug)]
pub struct TerraformResult {
    pub success: bool,
    pub output: String,
    pub exit_code: i64,
}

/// Module directory and inputs for a terraform invocation.
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// Directory holding the root module
    pub terraform_dir: PathBuf,
    /// Input variables, passed through a generated var file
    pub vars: VariableMap,
    /// Additional `-var-file` arguments
    pub var_files: Vec<PathBuf>,
    /// Extra environment variables for the terraform process
    pub env_vars: HashMap<String, String>,
    /// Per-command timeout in seconds
    pub timeout_seconds: u64,
}

impl TerraformOptions {
    pub fn new(terraform_dir: impl Into<PathBuf>) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            vars: VariableMap::new(),
            var_files: Vec::new(),
            env_vars: HashMap::new(),
            timeout_seconds: 600, // 10 minute timeout
        }
    }

    pub fn with_vars(mut self, vars: VariableMap) -> Self {
        self.vars = vars;
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.var_files.push(path.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Terraform runner that executes the terraform CLI.
pub struct TerraformRunner {
    runner: Arc<dyn CommandRunner>,
    binary: String,
}

impl TerraformRunner {
    /// Create a new Terraform runner.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "terraform".to_string(),
        }
    }

    /// Use a different terraform binary (e.g. `tofu` or an absolute path).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Fail unless the terraform binary can be executed.
    pub async fn ensure_available(&self) -> IacResult<()> {
        if self.runner.is_available(&self.binary).await? {
            Ok(())
        } else {
            Err(IacError::TerraformNotAvailable(self.binary.clone()))
        }
    }

    /// Run terraform init.
    pub async fn init(&self, options: &TerraformOptions) -> IacResult<TerraformResult> {
        info!("Running terraform init in {:?}", options.terraform_dir);
        self.run_command(options, vec!["init".into(), "-input=false".into(), "-no-color".into()])
            .await
    }

    /// Run terraform plan, writing the plan to `plan_file`.
    pub async fn plan(
        &self,
        options: &TerraformOptions,
        plan_file: &Path,
    ) -> IacResult<TerraformResult> {
        info!("Running terraform plan in {:?}", options.terraform_dir);
        let var_file = VarFile::write(&options.vars)?;

        let mut args: Vec<String> = vec![
            "plan".into(),
            "-input=false".into(),
            "-lock=false".into(),
            "-no-color".into(),
            format!("-out={}", plan_file.display()),
        ];
        args.extend(Self::var_file_args(options, &var_file));

        self.run_command(options, args).await
    }

    /// Run terraform show -json on a saved plan.
    pub async fn show_json(&self, options: &TerraformOptions, plan_file: &Path) -> IacResult<Plan> {
        debug!("Reading plan {:?}", plan_file);
        let result = self
            .run_command(
                options,
                vec![
                    "show".into(),
                    "-json".into(),
                    "-no-color".into(),
                    plan_file.display().to_string(),
                ],
            )
            .await?;
        Plan::from_json(&result.output)
    }

    /// Init, plan and parse the plan in one go.
    pub async fn init_and_plan_and_show(&self, options: &TerraformOptions) -> IacResult<Plan> {
        self.init(options).await?;

        let plan_file = tempfile::Builder::new()
            .prefix("dct-")
            .suffix(".tfplan")
            .tempfile()?
            .into_temp_path();

        self.plan(options, &plan_file).await?;
        let plan = self.show_json(options, &plan_file).await?;

        info!(
            "Plan for {:?} has {} resources",
            options.terraform_dir,
            plan.resource_planned_values_map.len()
        );
        Ok(plan)
    }

    /// Run terraform apply with auto-approve.
    pub async fn apply(&self, options: &TerraformOptions) -> IacResult<TerraformResult> {
        info!("Running terraform apply in {:?}", options.terraform_dir);
        let var_file = VarFile::write(&options.vars)?;

        let mut args: Vec<String> = vec![
            "apply".into(),
            "-input=false".into(),
            "-auto-approve".into(),
            "-no-color".into(),
        ];
        args.extend(Self::var_file_args(options, &var_file));

        self.run_command(options, args).await
    }

    /// Run terraform destroy with auto-approve.
    pub async fn destroy(&self, options: &TerraformOptions) -> IacResult<TerraformResult> {
        info!("Running terraform destroy in {:?}", options.terraform_dir);
        let var_file = VarFile::write(&options.vars)?;

        let mut args: Vec<String> = vec![
            "destroy".into(),
            "-input=false".into(),
            "-auto-approve".into(),
            "-no-color".into(),
        ];
        args.extend(Self::var_file_args(options, &var_file));

        self.run_command(options, args).await
    }

    /// Read all root module outputs as `name -> value`.
    pub async fn output_json(&self, options: &TerraformOptions) -> IacResult<Map<String, Value>> {
        let result = self
            .run_command(options, vec!["output".into(), "-json".into(), "-no-color".into()])
            .await?;

        let raw: Map<String, Value> = serde_json::from_str(&result.output)?;
        Ok(raw
            .into_iter()
            .map(|(name, output)| {
                let value = output.get("value").cloned().unwrap_or(Value::Null);
                (name, value)
            })
            .collect())
    }

    fn var_file_args(options: &TerraformOptions, generated: &VarFile) -> Vec<String> {
        options
            .var_files
            .iter()
            .map(|p| p.as_path())
            .chain(std::iter::once(generated.path()))
            .map(|p| format!("-var-file={}", p.display()))
            .collect()
    }

    /// Run a terraform command, failing on a non-zero exit.
    async fn run_command(
        &self,
        options: &TerraformOptions,
        args: Vec<String>,
    ) -> IacResult<TerraformResult> {
        let subcommand = args.first().cloned().unwrap_or_default();
        let command = CommandConfig::new(&self.binary)
            .args(args)
            .workdir(&options.terraform_dir)
            .env("TF_IN_AUTOMATION", "1")
            .envs(&options.env_vars);

        let run_config = RunConfig::default().timeout(options.timeout_seconds);

        debug!("Executing {}", command.display());

        let result = self.runner.run(&command, &run_config).await?;

        if !result.success() {
            let message = format!("exit code {}: {}", result.exit_code, result.combined_output());
            return Err(match subcommand.as_str() {
                "init" => IacError::InitFailed(message),
                "plan" => IacError::PlanFailed(message),
                "show" => IacError::ShowFailed(message),
                "apply" => IacError::ApplyFailed(message),
                "destroy" => IacError::DestroyFailed(message),
                "output" => IacError::OutputFailed(message),
                _ => IacError::CommandFailed {
                    command: subcommand,
                    message,
                },
            });
        }

        Ok(TerraformResult {
            success: true,
            output: result.stdout,
            exit_code: result.exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dct_runner::{MockResponse, MockRunner};

    const PLAN_JSON: &str = r#"{
        "format_version": "1.2",
        "planned_values": { "root_module": { "resources": [
            { "address": "helm_release.jira", "type": "helm_release", "name": "jira",
              "values": { "chart": "jira" } }
        ] } }
    }"#;

    fn terraform(mock: &MockRunner) -> TerraformRunner {
        TerraformRunner::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_init_and_plan_and_show_sequence() {
        let mock = MockRunner::new().respond_to("show", MockResponse::success(PLAN_JSON));
        let options = TerraformOptions::new("products/jira").with_var("environment_name", "dummy");

        let plan = terraform(&mock)
            .init_and_plan_and_show(&options)
            .await
            .unwrap();

        assert!(plan.resource("helm_release.jira").is_some());
        assert_eq!(mock.subcommands(), vec!["init", "plan", "show"]);

        let plan_call = &mock.get_subcommand_calls("plan")[0];
        assert!(plan_call.has_arg("-input=false"));
        assert!(plan_call.arg_value("-out=").unwrap().ends_with(".tfplan"));
        assert!(plan_call
            .arg_value("-var-file=")
            .unwrap()
            .ends_with(".tfvars.json"));
        assert_eq!(plan_call.workdir, Some(PathBuf::from("products/jira")));
        assert_eq!(
            plan_call.env.get("TF_IN_AUTOMATION").map(String::as_str),
            Some("1")
        );

        let show_call = &mock.get_subcommand_calls("show")[0];
        assert_eq!(
            show_call.args.last().map(String::as_str),
            plan_call.arg_value("-out=")
        );
    }

    #[tokio::test]
    async fn test_plan_failure_stops_before_show() {
        let mock = MockRunner::new()
            .respond_to("plan", MockResponse::failure(1, "Error: Missing required argument"));
        let options = TerraformOptions::new("products/bamboo");

        let err = terraform(&mock)
            .init_and_plan_and_show(&options)
            .await
            .unwrap_err();

        assert!(
            matches!(err, IacError::PlanFailed(ref m) if m.contains("Missing required argument"))
        );
        assert!(!mock.was_called("show"));
    }

    #[tokio::test]
    async fn test_init_failure() {
        let mock = MockRunner::new().respond_to("init", MockResponse::failure(1, "no provider"));
        let err = terraform(&mock)
            .init(&TerraformOptions::new("."))
            .await
            .unwrap_err();
        assert!(matches!(err, IacError::InitFailed(_)));
    }

    #[tokio::test]
    async fn test_extra_var_files_come_first() {
        let mock = MockRunner::new();
        let options = TerraformOptions::new("install").with_var_file("/tmp/test-config.tfvars");

        terraform(&mock).apply(&options).await.unwrap();

        let call = &mock.get_subcommand_calls("apply")[0];
        let var_files: Vec<_> = call
            .args
            .iter()
            .filter(|a| a.starts_with("-var-file="))
            .collect();
        assert_eq!(var_files.len(), 2);
        assert_eq!(var_files[0], "-var-file=/tmp/test-config.tfvars");
        assert!(call.has_arg("-auto-approve"));
    }

    #[tokio::test]
    async fn test_output_json_unwraps_values() {
        let mock = MockRunner::new().respond_to(
            "output",
            MockResponse::success(
                r#"{"product_urls": {"sensitive": false, "type": ["map", "string"], "value": {"jira": "https://jira.example.com"}}}"#,
            ),
        );

        let outputs = terraform(&mock)
            .output_json(&TerraformOptions::new("install"))
            .await
            .unwrap();

        assert_eq!(outputs["product_urls"]["jira"], "https://jira.example.com");
    }

    #[tokio::test]
    async fn test_ensure_available() {
        let mock = MockRunner::new().set_available(false);
        let err = terraform(&mock).ensure_available().await.unwrap_err();
        assert!(matches!(err, IacError::TerraformNotAvailable(ref b) if b == "terraform"));
    }
}
