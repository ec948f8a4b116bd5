//! Text rendering of access graph records

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use crate::graph::AccessGraph;
use crate::models::{Pod, Policy, Role, Secret, ServiceAccount, Tag, render_policy_document};

const INDENT: &str = "     ";

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{}{}: {}", INDENT, label, value);
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn tags(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "none".to_string();
    }
    tags.iter()
        .map(|tag| format!("{}={}", tag.key, tag.value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn list(items: impl IntoIterator<Item = String>) -> String {
    let items: Vec<String> = items.into_iter().collect();
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// The calling user, their STS identity and the cluster context in use
pub fn format_caller(graph: &AccessGraph) -> String {
    let user = graph.user();
    let caller = graph.caller();
    let mut out = String::new();
    line(&mut out, "Account ID", &caller.account);
    line(&mut out, "User name", &user.user_name);
    line(&mut out, "User ID", &user.user_id);
    line(&mut out, "Caller ID", &caller.user_id);
    line(&mut out, "Caller ARN", &caller.arn);
    line(&mut out, "Path", &user.path);
    line(&mut out, "Created at", timestamp(&user.create_date));
    line(&mut out, "Tags", tags(&user.tags));
    line(
        &mut out,
        "Kube context",
        graph
            .active_context()
            .map(|c| c.name.as_str())
            .unwrap_or("unknown"),
    );
    out
}

pub fn format_role(role: &Role) -> String {
    let mut out = String::new();
    line(&mut out, "Name", &role.role_name);
    line(&mut out, "ID", &role.role_id);
    line(&mut out, "Path", &role.path);
    if let Some(description) = &role.description {
        line(&mut out, "Description", description);
    }
    line(
        &mut out,
        "Assume role by",
        role
            .assume_role_policy_document
            .as_ref()
            .map(render_policy_document)
            .unwrap_or_default(),
    );
    match role.max_session_duration {
        Some(seconds) => line(&mut out, "Maximum session duration", format!("{} sec", seconds)),
        None => line(&mut out, "Maximum session duration", "unknown"),
    }
    line(&mut out, "Created at", timestamp(&role.create_date));
    line(&mut out, "Tags", tags(&role.tags));
    out
}

pub fn format_policy(policy: &Policy) -> String {
    let mut out = String::new();
    line(&mut out, "Name", &policy.policy_name);
    line(&mut out, "ID", &policy.policy_id);
    line(&mut out, "Path", &policy.path);
    line(
        &mut out,
        "Number of entities the policy is attached",
        policy.attachment_count,
    );
    line(&mut out, "Created at", timestamp(&policy.create_date));
    line(&mut out, "Updated at", timestamp(&policy.update_date));
    out
}

pub fn format_service_account(sa: &ServiceAccount) -> String {
    let mut out = String::new();
    line(&mut out, "Namespace", &sa.namespace);
    line(&mut out, "Name", &sa.name);
    line(
        &mut out,
        "Secrets",
        list(sa.secrets.iter().map(|s| s.name.clone())),
    );
    line(
        &mut out,
        "Image pull secrets",
        list(sa.image_pull_secrets.iter().map(|s| s.name.clone())),
    );
    if let Some(automount) = sa.automount_service_account_token {
        line(&mut out, "Automount token", automount);
    }
    out
}

/// Secret metadata; values are never printed, only their decoded sizes
pub fn format_secret(secret: &Secret) -> String {
    let mut out = String::new();
    line(&mut out, "Namespace", &secret.namespace);
    line(&mut out, "Name", &secret.name);
    line(&mut out, "Type", &secret.secret_type);
    line(
        &mut out,
        "Data",
        list(secret.data.iter().map(|(key, value)| match STANDARD.decode(value) {
            Ok(bytes) => format!("{} ({} bytes)", key, bytes.len()),
            Err(_) => format!("{} (not base64)", key),
        })),
    );
    out
}

pub fn format_pod(pod: &Pod) -> String {
    let mut out = String::new();
    line(&mut out, "Namespace", &pod.namespace);
    line(&mut out, "Name", &pod.name);
    line(&mut out, "Service account", &pod.spec.service_account_name);
    line(&mut out, "Phase", pod.status.phase.as_deref().unwrap_or("unknown"));
    line(&mut out, "Host IP", pod.status.host_ip.as_deref().unwrap_or("none"));
    line(&mut out, "Pod IP", pod.status.pod_ip.as_deref().unwrap_or("none"));
    line(
        &mut out,
        "Containers",
        list(pod.spec.containers.iter().map(|c| match &c.image {
            Some(image) => format!("{} ({})", c.name, image),
            None => c.name.clone(),
        })),
    );
    line(
        &mut out,
        "Secret volumes",
        list(pod.spec.volumes.iter().filter_map(|v| v.secret_name.clone())),
    );
    line(
        &mut out,
        "Env from",
        list(
            pod.spec
                .containers
                .iter()
                .flat_map(|c| c.env.iter())
                .filter_map(|e| {
                    e.value_from
                        .as_ref()
                        .map(|from| format!("{} <- {}", e.name, from))
                }),
        ),
    );
    out
}
