//! IAM/STS facts via the `aws` command line
//!
//! Every call runs the CLI with `--output json` and decodes the response into
//! the lean identity records. The CLI resolves credentials, profiles, regions
//! and pagination exactly as it does for the operator's own shell.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use super::IdentitySource;
use crate::config::IdentityConfig;
use crate::error::{FatalConfigError, SourceError};
use crate::models::{CallerIdentity, Policy, Role, User};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserOutput {
    user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListRolesOutput {
    #[serde(default)]
    roles: Vec<Role>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListPoliciesOutput {
    #[serde(default)]
    policies: Vec<Policy>,
}

/// Identity source backed by the AWS CLI
#[derive(Debug, Clone)]
pub struct AwsCliIdentitySource {
    program: String,
    profile: Option<String>,
    region: Option<String>,
}

impl AwsCliIdentitySource {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            program: config.aws_cli.clone(),
            profile: config.profile.clone(),
            region: config.region.clone(),
        }
    }

    /// Create the source and check that the ambient AWS configuration loads
    ///
    /// `aws configure list` fails when the CLI is missing or the selected
    /// profile does not exist.
    pub async fn load(config: &IdentityConfig) -> Result<Self, FatalConfigError> {
        let source = Self::new(config);
        let output = source
            .command(&["configure", "list"])
            .output()
            .await
            .map_err(|e| {
                FatalConfigError(SourceError::Spawn {
                    command: source.describe(&["configure", "list"]),
                    source: e,
                })
            })?;

        if !output.status.success() {
            return Err(FatalConfigError(SourceError::CommandFailed {
                command: source.describe(&["configure", "list"]),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }));
        }

        tracing::debug!(
            "AWS configuration loaded (profile: {})",
            source.profile.as_deref().unwrap_or("default")
        );
        Ok(source)
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(profile) = &self.profile {
            cmd.arg("--profile").arg(profile);
        }
        if let Some(region) = &self.region {
            cmd.arg("--region").arg(region);
        }
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    /// Run a CLI query and decode its JSON output
    async fn query<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, SourceError> {
        let command = self.describe(args);
        tracing::debug!("Running {}", command);

        let output = self
            .command(args)
            .args(["--output", "json"])
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|source| SourceError::Decode { command, source })
    }
}

#[async_trait]
impl IdentitySource for AwsCliIdentitySource {
    async fn user(&self) -> Result<User, SourceError> {
        let output: GetUserOutput = self.query(&["iam", "get-user"]).await?;
        Ok(output.user)
    }

    async fn caller_identity(&self) -> Result<CallerIdentity, SourceError> {
        self.query(&["sts", "get-caller-identity"]).await
    }

    async fn roles(&self) -> Result<Vec<Role>, SourceError> {
        let output: ListRolesOutput = self.query(&["iam", "list-roles"]).await?;
        tracing::debug!("Fetched {} roles", output.roles.len());
        Ok(output.roles)
    }

    async fn attached_policies(&self) -> Result<Vec<Policy>, SourceError> {
        let output: ListPoliciesOutput = self
            .query(&["iam", "list-policies", "--only-attached"])
            .await?;
        tracing::debug!("Fetched {} attached policies", output.policies.len());
        Ok(output.policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_user_output_decodes() {
        let json = r#"{
            "User": {
                "Path": "/",
                "UserName": "mhausenblas",
                "UserId": "AIDAEXAMPLE",
                "Arn": "arn:aws:iam::123456789012:user/mhausenblas",
                "CreateDate": "2018-06-01T09:00:00+00:00",
                "Tags": [{"Key": "team", "Value": "platform"}]
            }
        }"#;
        let output: GetUserOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.user.user_name, "mhausenblas");
        assert_eq!(output.user.tags.len(), 1);
        assert_eq!(output.user.tags[0].key, "team");
    }

    #[test]
    fn test_list_outputs_tolerate_missing_arrays() {
        let roles: ListRolesOutput = serde_json::from_str("{}").unwrap();
        assert!(roles.roles.is_empty());
        let policies: ListPoliciesOutput = serde_json::from_str("{}").unwrap();
        assert!(policies.policies.is_empty());
    }

    #[test]
    fn test_describe_includes_program() {
        let source = AwsCliIdentitySource {
            program: "aws".to_string(),
            profile: Some("dev".to_string()),
            region: None,
        };
        assert_eq!(source.describe(&["iam", "get-user"]), "aws iam get-user");
    }

    #[tokio::test]
    async fn test_missing_program_is_a_config_error() {
        let config = IdentityConfig {
            aws_cli: "rbiam-test-no-such-aws-binary".to_string(),
            profile: None,
            region: None,
        };
        let err = AwsCliIdentitySource::load(&config).await.unwrap_err();
        assert!(matches!(err.0, SourceError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_missing_program_fails_queries() {
        let config = IdentityConfig {
            aws_cli: "rbiam-test-no-such-aws-binary".to_string(),
            profile: None,
            region: None,
        };
        let source = AwsCliIdentitySource::new(&config);
        let err = source.caller_identity().await.unwrap_err();
        assert!(matches!(err, SourceError::Spawn { .. }));
        assert!(err.to_string().contains("sts get-caller-identity"));
    }
}
