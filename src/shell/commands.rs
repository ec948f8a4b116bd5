//! Command registry for the interactive shell
//!
//! Centralizes command names, their help text and lookup so the session loop
//! only deals with [`Command`] values.

use crate::models::EntryKind;

/// A shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    IamUser,
    IamRoles,
    IamPolicies,
    K8sServiceAccounts,
    K8sSecrets,
    K8sPods,
    History,
    Sync,
    Trace,
    ExportRaw,
    ExportGraph,
    Help,
    Quit,
}

/// Command definition
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// What the operator types
    pub name: &'static str,
    /// One-line help text
    pub description: &'static str,
    pub command: Command,
}

/// All shell commands, in help order
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "iam-user",
        description: "look up the calling AWS IAM user",
        command: Command::IamUser,
    },
    CommandSpec {
        name: "iam-roles",
        description: "look up an AWS IAM role by ARN",
        command: Command::IamRoles,
    },
    CommandSpec {
        name: "iam-policies",
        description: "look up an AWS IAM policy by ARN",
        command: Command::IamPolicies,
    },
    CommandSpec {
        name: "k8s-sa",
        description: "look up a Kubernetes service account",
        command: Command::K8sServiceAccounts,
    },
    CommandSpec {
        name: "k8s-secrets",
        description: "look up a Kubernetes secret",
        command: Command::K8sSecrets,
    },
    CommandSpec {
        name: "k8s-pods",
        description: "look up a Kubernetes pod",
        command: Command::K8sPods,
    },
    CommandSpec {
        name: "history",
        description: "show history",
        command: Command::History,
    },
    CommandSpec {
        name: "sync",
        description: "refresh the local data",
        command: Command::Sync,
    },
    CommandSpec {
        name: "trace",
        description: "start tracing",
        command: Command::Trace,
    },
    CommandSpec {
        name: "export-raw",
        description: "stop tracing and export the trace as a JSON dump",
        command: Command::ExportRaw,
    },
    CommandSpec {
        name: "export-graph",
        description: "stop tracing and export the trace as a DOT graph",
        command: Command::ExportGraph,
    },
    CommandSpec {
        name: "help",
        description: "explain how it works and show available commands",
        command: Command::Help,
    },
    CommandSpec {
        name: "quit",
        description: "terminate the interactive session and quit",
        command: Command::Quit,
    },
];

impl Command {
    /// Exact, case-sensitive lookup of a typed command
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        COMMANDS
            .iter()
            .find(|spec| spec.name == input)
            .map(|spec| spec.command)
    }

    /// Kind of entity a selection command looks up
    pub fn entry_kind(&self) -> Option<EntryKind> {
        match self {
            Command::IamRoles => Some(EntryKind::Role),
            Command::IamPolicies => Some(EntryKind::Policy),
            Command::K8sServiceAccounts => Some(EntryKind::ServiceAccount),
            Command::K8sSecrets => Some(EntryKind::Secret),
            Command::K8sPods => Some(EntryKind::Pod),
            _ => None,
        }
    }
}

/// Find all command names that start with the given prefix
pub fn find_matching_commands(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.trim().to_lowercase();
    COMMANDS
        .iter()
        .filter(|spec| spec.name.starts_with(&prefix))
        .map(|spec| spec.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("k8s-sa"), Some(Command::K8sServiceAccounts));
        assert_eq!(Command::parse("  quit "), Some(Command::Quit));
        assert_eq!(Command::parse("K8S-SA"), None);
        assert_eq!(Command::parse("frobnicate"), None);
    }

    #[test]
    fn test_every_selection_command_has_a_kind() {
        let kinds: Vec<_> = COMMANDS
            .iter()
            .filter_map(|spec| spec.command.entry_kind())
            .collect();
        assert_eq!(kinds.len(), EntryKind::all().len());
    }

    #[test]
    fn test_find_matching_commands() {
        assert_eq!(find_matching_commands("export"), vec!["export-raw", "export-graph"]);
        assert_eq!(find_matching_commands("k8s-s"), vec!["k8s-sa", "k8s-secrets"]);
        assert!(find_matching_commands("zzz").is_empty());
    }
}
