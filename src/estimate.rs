//! Heuristic image size estimate.
//!
//! Rough figures derived from the base image family plus per-package
//! install overhead. Good enough to show the payoff of a slimmer base in
//! the report; not a substitute for inspecting real layers.

use crate::dockerfile::{Document, Keyword};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Serialize)]
pub struct SizeEstimate {
    pub original_gb: f64,
    pub optimized_gb: f64,
}

static INSTALL_PACKAGES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:apt-get|apt)\s+install\s+([^&|;]+)").expect("install packages regex")
});

/// Base size in GB by image family, tag variants considered.
fn base_size(image: &str, tag: &str) -> f64 {
    let image = image.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let alpine = tag.contains("alpine") || image.contains("alpine");
    let slim = tag.contains("slim");

    if image.contains("scratch") {
        0.2
    } else if image.contains("node") {
        if alpine {
            0.6
        } else {
            1.5
        }
    } else if image.contains("python") {
        if alpine {
            0.7
        } else if slim {
            0.9
        } else {
            1.3
        }
    } else if image.contains("golang") {
        if alpine {
            0.6
        } else {
            1.4
        }
    } else if image.contains("openjdk") || image.contains("java") {
        if alpine {
            1.0
        } else {
            1.6
        }
    } else if alpine {
        0.4
    } else if slim {
        0.7
    } else if image.contains("ubuntu") {
        1.3
    } else if image.contains("debian") {
        1.1
    } else {
        1.0
    }
}

pub fn estimate_image_size(document: &Document) -> SizeEstimate {
    let final_stage = document.final_stage();
    let mut original = base_size(
        &final_stage.base_image,
        final_stage.base_tag.as_deref().unwrap_or(""),
    );

    // ~50MB per apt package named in the final stage.
    let mut package_count = 0usize;
    for instr in final_stage
        .instructions
        .iter()
        .filter(|i| i.keyword == Keyword::Run)
    {
        for caps in INSTALL_PACKAGES.captures_iter(&instr.arguments) {
            package_count += caps[1]
                .split_whitespace()
                .filter(|w| !w.starts_with('-') && *w != "\\")
                .count();
        }
    }
    original += package_count as f64 * 0.05;

    // A multi-stage build already sheds the toolchain; assume a further
    // modest win. Single-stage builds usually have much more to give.
    let optimized = if document.stages.len() > 1 {
        original * 0.8
    } else {
        (original * 0.4).max(0.1)
    };

    SizeEstimate {
        original_gb: round1(original),
        optimized_gb: round1(optimized),
    }
}

fn round1(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
