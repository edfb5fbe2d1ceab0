//! Advisory container-escape risk scan.
//!
//! These findings never contribute to the benchmark score; they flag
//! docker-run invocations and instructions embedded in the Dockerfile that
//! weaken isolation (privileged mode, sensitive mounts, dangerous
//! capabilities, host networking, sensitive ports).

use crate::dockerfile::{Document, Keyword};
use crate::rules::Severity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscapeRisk {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
    pub recommendation: String,
    pub line: usize,
}

static SENSITIVE_MOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:-v|--volume)[ =](/proc|/sys|/dev|/etc|/var/run/docker\.sock)\b")
        .expect("sensitive mount regex")
});

static CAP_ADD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--cap-add[ =]?(?:CAP_)?(SYS_ADMIN|SYS_PTRACE|NET_ADMIN|ALL)\b")
        .expect("cap-add regex")
});

static HOST_NETWORK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--net(?:work)?[ =]host\b").expect("host network regex"));

const SENSITIVE_PORTS: &[(u16, &str)] = &[
    (22, "SSH"),
    (3306, "MySQL"),
    (5432, "PostgreSQL"),
    (6379, "Redis"),
    (27017, "MongoDB"),
];

pub fn analyze_escape_risks(document: &Document) -> Vec<EscapeRisk> {
    let mut risks = Vec::new();

    for instr in document.instructions() {
        match instr.keyword {
            Keyword::Expose => check_exposed_ports(instr.line, &instr.arguments, &mut risks),
            _ => check_command_text(instr.line, &instr.arguments, &mut risks),
        }
    }

    risks
}

fn check_command_text(line: usize, text: &str, risks: &mut Vec<EscapeRisk>) {
    if text.contains("--privileged") {
        risks.push(EscapeRisk {
            severity: Severity::Critical,
            title: "Privileged container".to_string(),
            detail: "Privileged containers can escape isolation and access host resources."
                .to_string(),
            recommendation: "Remove --privileged; grant only the specific capabilities needed."
                .to_string(),
            line,
        });
    }

    if text.contains("docker.sock") {
        risks.push(EscapeRisk {
            severity: Severity::Critical,
            title: "Docker socket exposure".to_string(),
            detail: "Access to /var/run/docker.sock is equivalent to root on the host."
                .to_string(),
            recommendation: "Do not mount the Docker socket into containers.".to_string(),
            line,
        });
    } else if let Some(caps) = SENSITIVE_MOUNT.captures(text) {
        risks.push(EscapeRisk {
            severity: Severity::High,
            title: format!("Sensitive host path {} mounted", &caps[1]),
            detail: "Mounting sensitive host paths can lead to container escape.".to_string(),
            recommendation: "Use named volumes or narrowly scoped bind mounts.".to_string(),
            line,
        });
    }

    if let Some(caps) = CAP_ADD.captures(text) {
        risks.push(EscapeRisk {
            severity: Severity::High,
            title: format!("Dangerous capability {} added", &caps[1]),
            detail: "This capability can be leveraged to break container isolation.".to_string(),
            recommendation: "Drop the capability or replace it with a narrower permission."
                .to_string(),
            line,
        });
    }

    if HOST_NETWORK.is_match(text) {
        risks.push(EscapeRisk {
            severity: Severity::Medium,
            title: "Host network mode".to_string(),
            detail: "Host networking bypasses container network isolation.".to_string(),
            recommendation: "Use the default bridge network or a custom network.".to_string(),
            line,
        });
    }
}

fn check_exposed_ports(line: usize, arguments: &str, risks: &mut Vec<EscapeRisk>) {
    for token in arguments.split_whitespace() {
        let port = token.split('/').next().unwrap_or("");
        let Ok(port) = port.parse::<u16>() else {
            continue;
        };
        if let Some((_, service)) = SENSITIVE_PORTS.iter().find(|(p, _)| *p == port) {
            risks.push(EscapeRisk {
                severity: Severity::Medium,
                title: format!("Sensitive port {port} ({service}) exposed"),
                detail: "Database and SSH ports should not be exposed by the image.".to_string(),
                recommendation: "Reach internal services over a private network instead."
                    .to_string(),
                line,
            });
        }
    }
}
