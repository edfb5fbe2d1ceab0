//! The CIS Docker Benchmark §4 rule catalog.
//!
//! Rules are data: metadata plus a predicate function, held in fixed report
//! order. Predicates are total: malformed input resolves to the least
//! alarming applicable outcome with a note in the message, never a panic.

use crate::dockerfile::{Document, Keyword};
use crate::rules::secrets::{env_pairs, SecretPolicy};
use crate::rules::types::{Rule, RuleOutcome, Severity};
use regex::Regex;
use std::sync::LazyLock;

pub fn all_rules() -> &'static [Rule] {
    &CATALOG
}

static CATALOG: [Rule; 11] = [
    Rule {
        id: "4.1",
        title: "Create a user for the container",
        category: "user",
        severity: Severity::High,
        manual_review: false,
        remediation: "Create a non-root user and switch to it with a USER instruction in the final stage, e.g. RUN useradd -m appuser && USER appuser.",
        check: check_non_root_user,
    },
    Rule {
        id: "4.2",
        title: "Use trusted base images",
        category: "supply-chain",
        severity: Severity::Medium,
        manual_review: true,
        remediation: "Verify that base images come from an official or internally vetted registry.",
        check: needs_human_trusted_base,
    },
    Rule {
        id: "4.3",
        title: "Do not install unnecessary packages",
        category: "packages",
        severity: Severity::Medium,
        manual_review: false,
        remediation: "Pass --no-install-recommends to apt-get or --no-cache to apk so only required packages land in the image.",
        check: check_minimal_packages,
    },
    Rule {
        id: "4.4",
        title: "Pin base image versions",
        category: "supply-chain",
        severity: Severity::High,
        manual_review: false,
        remediation: "Pin every FROM to a specific version tag or digest, e.g. FROM node:20.10.0 or FROM node@sha256:...; never rely on latest.",
        check: check_pinned_base_image,
    },
    Rule {
        id: "4.5",
        title: "Enable content trust",
        category: "supply-chain",
        severity: Severity::Medium,
        manual_review: true,
        remediation: "Set DOCKER_CONTENT_TRUST=1 in the build environment; this cannot be expressed inside the Dockerfile.",
        check: needs_human_content_trust,
    },
    Rule {
        id: "4.6",
        title: "Add a HEALTHCHECK instruction",
        category: "runtime",
        severity: Severity::Medium,
        manual_review: false,
        remediation: "Add a HEALTHCHECK to the final stage, e.g. HEALTHCHECK --interval=30s CMD curl -f http://localhost/ || exit 1.",
        check: check_healthcheck_present,
    },
    Rule {
        id: "4.7",
        title: "Do not use update instructions alone",
        category: "packages",
        severity: Severity::Low,
        manual_review: false,
        remediation: "Combine the package index refresh and the install in one RUN instruction so cached layers never pin a stale index.",
        check: check_update_install_combined,
    },
    Rule {
        id: "4.8",
        title: "Remove setuid and setgid permissions",
        category: "permissions",
        severity: Severity::High,
        manual_review: true,
        remediation: "Strip setuid/setgid bits from binaries the application does not need, e.g. RUN find / -perm /6000 -type f -exec chmod a-s {} + || true.",
        check: needs_human_setuid,
    },
    Rule {
        id: "4.9",
        title: "Use COPY instead of ADD",
        category: "files",
        severity: Severity::Low,
        manual_review: false,
        remediation: "Replace ADD with COPY for local files; COPY is transparent and does not auto-extract archives.",
        check: check_copy_not_add,
    },
    Rule {
        id: "4.10",
        title: "Do not store secrets in the Dockerfile",
        category: "secrets",
        severity: Severity::Critical,
        manual_review: false,
        remediation: "Remove hardcoded credentials; inject them at runtime via --env/secret mounts or a secret manager, and rotate anything already committed.",
        check: check_no_secrets,
    },
    Rule {
        id: "4.11",
        title: "Install verified packages only",
        category: "packages",
        severity: Severity::Medium,
        manual_review: false,
        remediation: "Drop flags that disable package signature checks (--allow-unauthenticated, --allow-untrusted, --nogpgcheck).",
        check: check_verified_packages,
    },
];

static INSTALL_CMD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(apt-get\s+install|apt\s+install|apk\s+add|yum\s+install|dnf\s+install|zypper\s+install)\b")
        .expect("install command regex")
});

static INDEX_REFRESH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(apt-get\s+update|apt\s+update|apk\s+update|yum\s+makecache|dnf\s+makecache)\b")
        .expect("index refresh regex")
});

static MINIMAL_FLAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)--no-install-recommends|--no-cache\b").expect("minimal flags regex")
});

static UNVERIFIED_FLAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)--allow-unauthenticated|--allow-untrusted|--nogpgcheck|--no-gpg-checks|--force-yes")
        .expect("unverified flags regex")
});

fn check_non_root_user(doc: &Document) -> RuleOutcome {
    let stage = doc.final_stage();
    let Some(instr) = stage.last_instruction(Keyword::User) else {
        return RuleOutcome::Violated(
            "final stage never sets USER; the container runs as root".to_string(),
        );
    };

    let user = instr.arguments.split_whitespace().next().unwrap_or("");
    // USER may carry a group: appuser:appgroup or 1000:1000.
    let name = user.split(':').next().unwrap_or("");
    if name.is_empty() {
        RuleOutcome::Violated(format!(
            "USER at line {} has an empty argument; the container falls back to root",
            instr.line
        ))
    } else if name.eq_ignore_ascii_case("root") || name == "0" {
        RuleOutcome::Violated(format!(
            "final stage runs as {} (line {})",
            name, instr.line
        ))
    } else {
        RuleOutcome::Satisfied(format!("final stage runs as {}", name))
    }
}

fn check_minimal_packages(doc: &Document) -> RuleOutcome {
    let mut installs = 0;
    for instr in doc.instructions().filter(|i| i.keyword == Keyword::Run) {
        if !INSTALL_CMD.is_match(&instr.arguments) {
            continue;
        }
        installs += 1;
        if !MINIMAL_FLAGS.is_match(&instr.arguments) {
            return RuleOutcome::Violated(format!(
                "package install at line {} lacks a recommends-exclusion/no-cache flag",
                instr.line
            ));
        }
    }
    if installs == 0 {
        RuleOutcome::Satisfied("no package install instructions found".to_string())
    } else {
        RuleOutcome::Satisfied("all package installs exclude optional packages".to_string())
    }
}

fn check_pinned_base_image(doc: &Document) -> RuleOutcome {
    for stage in &doc.stages {
        // FROM <alias> chains an earlier stage; its pin is that stage's.
        if doc.is_earlier_alias(&stage.base_image, stage.index) {
            continue;
        }
        if stage.base_image == "scratch" {
            continue;
        }
        let from_line = stage
            .instructions
            .iter()
            .find(|i| i.keyword == Keyword::From)
            .map(|i| i.line)
            .unwrap_or(0);
        match stage.base_tag.as_deref() {
            None => {
                return RuleOutcome::Violated(format!(
                    "FROM {} (line {}) has no tag and floats on latest",
                    stage.base_image, from_line
                ));
            }
            Some("latest") => {
                return RuleOutcome::Violated(format!(
                    "FROM {}:latest (line {}) is not reproducible",
                    stage.base_image, from_line
                ));
            }
            Some(_) => {}
        }
    }
    RuleOutcome::Satisfied("every base image is pinned to a tag or digest".to_string())
}

fn check_healthcheck_present(doc: &Document) -> RuleOutcome {
    let stage = doc.final_stage();
    match stage.last_instruction(Keyword::Healthcheck) {
        None => RuleOutcome::Violated(
            "final stage has no HEALTHCHECK; failures go undetected at runtime".to_string(),
        ),
        Some(instr) if instr.arguments.trim().eq_ignore_ascii_case("NONE") => {
            RuleOutcome::Violated(format!(
                "HEALTHCHECK NONE at line {} disables health monitoring",
                instr.line
            ))
        }
        Some(_) => RuleOutcome::Satisfied("final stage defines a HEALTHCHECK".to_string()),
    }
}

fn check_update_install_combined(doc: &Document) -> RuleOutcome {
    for instr in doc.instructions().filter(|i| i.keyword == Keyword::Run) {
        if INDEX_REFRESH.is_match(&instr.arguments) && !INSTALL_CMD.is_match(&instr.arguments) {
            return RuleOutcome::Violated(format!(
                "bare package index refresh at line {}; combine it with the install in one RUN",
                instr.line
            ));
        }
    }
    RuleOutcome::Satisfied("index refreshes and installs are combined".to_string())
}

fn check_copy_not_add(doc: &Document) -> RuleOutcome {
    for instr in doc.instructions().filter(|i| i.keyword == Keyword::Add) {
        let Some(source) = instr
            .arguments
            .split_whitespace()
            .find(|t| !t.starts_with("--"))
        else {
            // ADD with no source is malformed; nothing to flag.
            continue;
        };
        let lower = source.to_ascii_lowercase();
        let remote = lower.starts_with("http://")
            || lower.starts_with("https://")
            || lower.starts_with("ftp://");
        if !remote {
            return RuleOutcome::Violated(format!(
                "ADD {} at line {} copies a local path; use COPY",
                source, instr.line
            ));
        }
    }
    RuleOutcome::Satisfied("no local-path ADD instructions".to_string())
}

fn check_no_secrets(doc: &Document) -> RuleOutcome {
    let policy = SecretPolicy::default();
    for instr in doc
        .instructions()
        .filter(|i| matches!(i.keyword, Keyword::Env | Keyword::Arg))
    {
        for (key, value) in env_pairs(&instr.arguments) {
            if policy.looks_like_secret(&key, &value) {
                // The value itself stays out of the report on purpose.
                return RuleOutcome::Violated(format!(
                    "{} {} at line {} looks like a hardcoded credential",
                    instr.keyword, key, instr.line
                ));
            }
        }
    }
    RuleOutcome::Satisfied("no hardcoded credentials detected".to_string())
}

fn check_verified_packages(doc: &Document) -> RuleOutcome {
    for instr in doc.instructions().filter(|i| i.keyword == Keyword::Run) {
        if UNVERIFIED_FLAGS.is_match(&instr.arguments) {
            return RuleOutcome::Violated(format!(
                "install at line {} disables package signature verification",
                instr.line
            ));
        }
    }
    RuleOutcome::Satisfied("no signature checks are disabled".to_string())
}

fn needs_human_trusted_base(_doc: &Document) -> RuleOutcome {
    RuleOutcome::NeedsHuman(
        "whether a base image is trusted cannot be decided from the Dockerfile alone".to_string(),
    )
}

fn needs_human_content_trust(_doc: &Document) -> RuleOutcome {
    RuleOutcome::NeedsHuman(
        "content trust is a build-environment setting (DOCKER_CONTENT_TRUST=1), not a Dockerfile property".to_string(),
    )
}

fn needs_human_setuid(_doc: &Document) -> RuleOutcome {
    RuleOutcome::NeedsHuman(
        "setuid/setgid removal depends on which binaries the application needs; review the image contents".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dockerfile::parse;

    fn outcome(id: &str, dockerfile: &str) -> RuleOutcome {
        let doc = parse(dockerfile).unwrap();
        let rule = all_rules().iter().find(|r| r.id == id).unwrap();
        (rule.check)(&doc)
    }

    fn is_violated(o: &RuleOutcome) -> bool {
        matches!(o, RuleOutcome::Violated(_))
    }

    fn is_satisfied(o: &RuleOutcome) -> bool {
        matches!(o, RuleOutcome::Satisfied(_))
    }

    #[test]
    fn test_catalog_order_and_size() {
        let ids: Vec<&str> = all_rules().iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec!["4.1", "4.2", "4.3", "4.4", "4.5", "4.6", "4.7", "4.8", "4.9", "4.10", "4.11"]
        );
    }

    #[test]
    fn test_manual_review_rules() {
        for rule in all_rules() {
            let expected = matches!(rule.id, "4.2" | "4.5" | "4.8");
            assert_eq!(rule.manual_review, expected, "rule {}", rule.id);
        }
    }

    #[test]
    fn test_non_root_user_pass() {
        let o = outcome("4.1", "FROM alpine:3.19\nUSER appuser\n");
        assert!(is_satisfied(&o));
    }

    #[test]
    fn test_non_root_user_with_group_pass() {
        let o = outcome("4.1", "FROM alpine:3.19\nUSER 1000:1000\n");
        assert!(is_satisfied(&o));
    }

    #[test]
    fn test_non_root_user_fail_variants() {
        assert!(is_violated(&outcome("4.1", "FROM alpine:3.19\nUSER root\n")));
        assert!(is_violated(&outcome("4.1", "FROM alpine:3.19\nUSER 0\n")));
        assert!(is_violated(&outcome("4.1", "FROM alpine:3.19\nRUN echo hi\n")));
    }

    #[test]
    fn test_non_root_user_last_user_wins() {
        let o = outcome("4.1", "FROM alpine:3.19\nUSER app\nUSER root\n");
        assert!(is_violated(&o));
        let o = outcome("4.1", "FROM alpine:3.19\nUSER root\nUSER app\n");
        assert!(is_satisfied(&o));
    }

    #[test]
    fn test_non_root_user_only_final_stage_counts() {
        let text = "FROM golang:1.22 AS builder\nUSER root\nRUN go build .\nFROM alpine:3.19\nCOPY --from=builder /app /app\nUSER app\n";
        assert!(is_satisfied(&outcome("4.1", text)));
    }

    #[test]
    fn test_minimal_packages() {
        assert!(is_violated(&outcome(
            "4.3",
            "FROM debian:12\nRUN apt-get update && apt-get install -y curl\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.3",
            "FROM debian:12\nRUN apt-get update && apt-get install -y --no-install-recommends curl\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.3",
            "FROM alpine:3.19\nRUN apk add --no-cache curl\n"
        )));
        // No installs at all is a pass with a note, not a failure.
        assert!(is_satisfied(&outcome("4.3", "FROM alpine:3.19\nRUN echo hi\n")));
    }

    #[test]
    fn test_pinned_base_image() {
        assert!(is_violated(&outcome("4.4", "FROM ubuntu\n")));
        assert!(is_violated(&outcome("4.4", "FROM ubuntu:latest\n")));
        assert!(is_satisfied(&outcome("4.4", "FROM ubuntu:22.04\n")));
        assert!(is_satisfied(&outcome(
            "4.4",
            "FROM python@sha256:0123456789abcdef\n"
        )));
        assert!(is_satisfied(&outcome("4.4", "FROM scratch\nCOPY app /app\n")));
    }

    #[test]
    fn test_pinned_base_image_all_stages_must_pass() {
        let text = "FROM golang:1.22 AS builder\nRUN go build .\nFROM alpine\nCOPY --from=builder /app /app\n";
        assert!(is_violated(&outcome("4.4", text)));
    }

    #[test]
    fn test_pinned_base_image_alias_reference_is_fine() {
        let text = "FROM golang:1.22 AS builder\nRUN go build .\nFROM builder\nCMD [\"/app\"]\n";
        assert!(is_satisfied(&outcome("4.4", text)));
    }

    #[test]
    fn test_healthcheck() {
        assert!(is_violated(&outcome("4.6", "FROM alpine:3.19\nCMD [\"/app\"]\n")));
        assert!(is_satisfied(&outcome(
            "4.6",
            "FROM alpine:3.19\nHEALTHCHECK CMD wget -qO- http://localhost/ || exit 1\n"
        )));
        assert!(is_violated(&outcome(
            "4.6",
            "FROM alpine:3.19\nHEALTHCHECK NONE\n"
        )));
    }

    #[test]
    fn test_healthcheck_only_final_stage() {
        let text = "FROM node:20 AS build\nHEALTHCHECK CMD true\nRUN npm ci\nFROM nginx:1.27\nCOPY --from=build /dist /usr/share/nginx/html\n";
        assert!(is_violated(&outcome("4.6", text)));
    }

    #[test]
    fn test_update_install_combined() {
        assert!(is_violated(&outcome(
            "4.7",
            "FROM debian:12\nRUN apt-get update\nRUN apt-get install -y --no-install-recommends curl\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.7",
            "FROM debian:12\nRUN apt-get update && apt-get install -y curl\n"
        )));
        assert!(is_satisfied(&outcome("4.7", "FROM alpine:3.19\nRUN echo hi\n")));
    }

    #[test]
    fn test_copy_not_add() {
        assert!(is_violated(&outcome(
            "4.9",
            "FROM alpine:3.19\nADD config.json /app/config.json\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.9",
            "FROM alpine:3.19\nADD https://example.com/f.tgz /tmp/\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.9",
            "FROM alpine:3.19\nCOPY config.json /app/config.json\n"
        )));
    }

    #[test]
    fn test_no_secrets() {
        assert!(is_violated(&outcome(
            "4.10",
            "FROM alpine:3.19\nENV API_KEY=\"sk_test_12345\"\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.10",
            "FROM alpine:3.19\nENV API_KEY=\"\"\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.10",
            "FROM alpine:3.19\nENV API_KEY=${API_KEY:-default}\n"
        )));
        assert!(is_violated(&outcome(
            "4.10",
            "FROM alpine:3.19\nARG DB_PASSWORD=changeme123\n"
        )));
    }

    #[test]
    fn test_verified_packages() {
        assert!(is_violated(&outcome(
            "4.11",
            "FROM debian:12\nRUN apt-get install -y --allow-unauthenticated curl\n"
        )));
        assert!(is_satisfied(&outcome(
            "4.11",
            "FROM debian:12\nRUN apt-get install -y --no-install-recommends curl\n"
        )));
    }

    #[test]
    fn test_manual_rules_always_need_human() {
        for id in ["4.2", "4.5", "4.8"] {
            let o = outcome(id, "FROM alpine:3.19\nUSER app\n");
            assert!(matches!(o, RuleOutcome::NeedsHuman(_)), "rule {}", id);
        }
    }
}
