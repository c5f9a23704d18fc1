//! # TendRS Compose Manifest Parser
//!
//! File: cli/src/common/compose.rs
//! Repository: https://github.com/tendrs/tendrs
//!
//! ## Overview
//!
//! Extracts service names and image references from a compose-style
//! manifest. Used by the image-pull workflow to turn a manifest into a list
//! of pullable images.
//!
//! ## Architecture
//!
//! Two extraction paths, tried in order:
//!
//! 1. **Runtime-assisted**: when the runtime binary is on the search path,
//!    `docker compose -f <file> config --services` lists the service names
//!    authoritatively.
//! 2. **Textual fallback**: when the tool is unavailable or its invocation
//!    fails, a structural scan recovers service names from the manifest
//!    text: bare `name:` keys nested directly under the `services:` section,
//!    or top-level bare keys for old-style manifests that declare services
//!    at the root (minus the reserved compose keys and `x-*` extensions).
//!    Keys under other sections (`volumes:`, `networks:`, ...) are never
//!    reported as services.
//!
//! Either way, each service's image is scraped best-effort from the
//! manifest text: the service header line, then its more-deeply indented
//! block, up to an `image:` key. Services without an image (build-context
//! services) carry `image: None`.
//!
//! Every fault (unreadable file, failed tool, nothing matching) yields an
//! empty list, never an error. Callers treat empty as "no services found".
//!
use crate::common::exec::{argv, CommandRunner};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// One service entry recovered from a compose manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeService {
    pub name: String,
    /// Image reference, when the service declares one.
    pub image: Option<String>,
}

/// Top-level compose keys that are never service names. The fallback
/// scanner must not mistake them for services.
const RESERVED_KEYS: &[&str] = &[
    "services", "version", "volumes", "networks", "configs", "secrets",
];

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A line holding nothing but a bare key and a colon, applied to the
    // trimmed line content.
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9][A-Za-z0-9_.-]*):$")
            .unwrap_or_else(|e| panic!("invalid key regex: {e}"))
    })
}

/// The bare key of a trimmed `key:` line, if that is all the line holds.
fn bare_key(trimmed: &str) -> Option<&str> {
    key_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Lists the services declared in the manifest at `path`.
///
/// Prefers the runtime-assisted listing; falls back to textual scanning.
/// Any fault yields an empty list rather than an error.
pub async fn parse_services(
    path: &Path,
    runner: Arc<dyn CommandRunner>,
    binary: &str,
) -> Vec<ComposeService> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Cannot read compose manifest '{}': {}", path.display(), e);
            return Vec::new();
        }
    };

    let names = match assisted_service_names(path, runner, binary).await {
        Some(names) => names,
        None => {
            debug!("Falling back to textual service scan.");
            fallback_service_names(&text)
        }
    };

    names
        .into_iter()
        .map(|name| {
            let image = scrape_image(&text, &name);
            ComposeService { name, image }
        })
        .collect()
}

/// Runtime-assisted path: `docker compose -f <path> config --services`.
/// `None` means the tool is unavailable or the invocation failed, and the
/// caller should fall back.
async fn assisted_service_names(
    path: &Path,
    runner: Arc<dyn CommandRunner>,
    binary: &str,
) -> Option<Vec<String>> {
    if which::which(binary).is_err() {
        debug!("Runtime binary '{}' not on PATH; no assisted parse.", binary);
        return None;
    }
    let file = path.to_string_lossy();
    let out = runner
        .run(
            binary,
            &argv(&["compose", "-f", file.as_ref(), "config", "--services"]),
        )
        .await;
    if !out.success {
        debug!("Assisted service listing failed: {}", out.detail());
        return None;
    }
    // The tool answered; its listing is authoritative even when empty.
    Some(
        out.output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Textual fallback: service names are the bare keys nested directly under
/// the `services:` section, or top-level bare keys in old-style manifests
/// that declare services at the root. Keys under any other section are
/// never services.
fn fallback_service_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_services = false;
    let mut entry_indent: Option<usize> = None;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = indent_of(line);
        if indent == 0 {
            // A new top-level section begins.
            in_services = trimmed == "services:";
            entry_indent = None;
            if !in_services {
                if let Some(name) = bare_key(trimmed) {
                    // Old-style manifests put services at the root.
                    if !RESERVED_KEYS.contains(&name) && !name.starts_with("x-") {
                        names.push(name.to_string());
                    }
                }
            }
            continue;
        }
        if !in_services {
            continue;
        }
        // Service entries share the indent of the first child of services:;
        // anything deeper belongs to a service body.
        let expected = *entry_indent.get_or_insert(indent);
        if indent == expected {
            if let Some(name) = bare_key(trimmed) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Best-effort image scrape: find the service's header line, then scan its
/// more-deeply indented block for an `image:` key.
fn scrape_image(text: &str, service: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let header = format!("{service}:");
    let header_idx = lines.iter().position(|line| line.trim() == header)?;
    let header_indent = indent_of(lines[header_idx]);

    for line in &lines[header_idx + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        if indent_of(line) <= header_indent {
            break; // end of this service's block
        }
        if let Some(value) = line.trim().strip_prefix("image:") {
            let image = value.trim().trim_matches(|c| c == '"' || c == '\'');
            if image.is_empty() {
                return None;
            }
            return Some(image.to_string());
        }
    }
    None
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::exec::testing::ScriptedRunner;
    use crate::common::exec::CommandOutput;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = "\
services:
  web:
    image: nginx:latest
    ports:
      - \"8080:80\"
  db:
    build: ./db
volumes:
  data:
";

    fn write_manifest(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(body.as_bytes()).expect("write manifest");
        file
    }

    fn by_name<'a>(services: &'a [ComposeService], name: &str) -> &'a ComposeService {
        services
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("service '{name}' missing"))
    }

    /// The assisted path: scripted tool output drives the names, the text
    /// scrape supplies the images.
    #[tokio::test]
    async fn test_parse_services_assisted() {
        let file = write_manifest(MANIFEST);
        let runner = Arc::new(ScriptedRunner::new(|_, args| {
            assert_eq!(args.first().map(String::as_str), Some("compose"));
            CommandOutput::ok("web\ndb\n")
        }));

        let services = parse_services(file.path(), runner, "sh").await;

        assert_eq!(services.len(), 2);
        assert_eq!(by_name(&services, "web").image.as_deref(), Some("nginx:latest"));
        assert_eq!(by_name(&services, "db").image, None);
    }

    /// The fallback path: the tool binary is absent, so names come from the
    /// structural scan. Same result as the assisted path, nothing extra.
    #[tokio::test]
    async fn test_parse_services_fallback() {
        let file = write_manifest(MANIFEST);
        let runner = Arc::new(ScriptedRunner::new(|_, _| {
            panic!("no command should run when the binary is missing")
        }));

        let services =
            parse_services(file.path(), runner, "tendrs-test-no-such-runtime").await;

        // Exactly the two services; neither the section headers nor the
        // `data` volume may leak in.
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "web");
        assert_eq!(services[1].name, "db");
        assert_eq!(by_name(&services, "web").image.as_deref(), Some("nginx:latest"));
        assert_eq!(by_name(&services, "db").image, None);
    }

    /// Children of non-service sections (volumes, networks) are never
    /// reported as services, even though they look like bare `name:` keys.
    #[test]
    fn test_fallback_ignores_other_section_children() {
        let text = "\
services:
  web:
    image: nginx
volumes:
  data:
  cache:
networks:
  backend:
";
        assert_eq!(fallback_service_names(text), vec!["web".to_string()]);
    }

    /// Old-style manifests declare services at the top level with no
    /// `services:` section at all.
    #[tokio::test]
    async fn test_fallback_top_level_services() {
        let file = write_manifest("web:\n  image: nginx\ndb:\n  build: ./db\n");
        let runner = Arc::new(ScriptedRunner::new(|_, _| {
            panic!("no command should run when the binary is missing")
        }));

        let services =
            parse_services(file.path(), runner, "tendrs-test-no-such-runtime").await;

        assert_eq!(services.len(), 2);
        assert_eq!(by_name(&services, "web").image.as_deref(), Some("nginx"));
        assert_eq!(by_name(&services, "db").image, None);
    }

    /// A successful tool invocation that lists zero services is
    /// authoritative: the result is empty, not the textual fallback.
    #[tokio::test]
    async fn test_assisted_empty_listing_is_authoritative() {
        let file = write_manifest(MANIFEST);
        let runner = Arc::new(ScriptedRunner::new(|_, _| CommandOutput::ok("")));

        let services = parse_services(file.path(), runner, "sh").await;
        assert!(services.is_empty());
    }

    /// A failing tool invocation falls back instead of returning empty.
    #[tokio::test]
    async fn test_tool_failure_falls_back() {
        let file = write_manifest(MANIFEST);
        let runner = Arc::new(ScriptedRunner::new(|_, _| {
            CommandOutput::failed(1, "unknown command: compose")
        }));

        let services = parse_services(file.path(), runner, "sh").await;
        assert_eq!(by_name(&services, "web").image.as_deref(), Some("nginx:latest"));
    }

    /// An unreadable manifest yields an empty list, not an error.
    #[tokio::test]
    async fn test_missing_file_yields_empty() {
        let runner = Arc::new(ScriptedRunner::new(|_, _| CommandOutput::ok("web\n")));
        let services = parse_services(
            Path::new("/nonexistent/compose.yml"),
            runner,
            "tendrs-test-no-such-runtime",
        )
        .await;
        assert!(services.is_empty());
    }

    #[test]
    fn test_scrape_image_strips_quotes() {
        let text = "services:\n  web:\n    image: \"nginx:1.27\"\n";
        assert_eq!(scrape_image(text, "web").as_deref(), Some("nginx:1.27"));
    }

    #[test]
    fn test_scrape_image_stays_in_block() {
        // db has no image; web's image below must not leak into db's scrape.
        let text = "services:\n  db:\n    build: ./db\n  web:\n    image: nginx\n";
        assert_eq!(scrape_image(text, "db"), None);
        assert_eq!(scrape_image(text, "web").as_deref(), Some("nginx"));
    }

    #[test]
    fn test_fallback_skips_extension_sections() {
        let text = "x-common:\nservices:\n  web:\n";
        let names = fallback_service_names(text);
        assert_eq!(names, vec!["web".to_string()]);
    }
}
