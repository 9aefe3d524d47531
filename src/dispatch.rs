//! The dispatch engine: which silos run, and what they returned.
//!
//! For each requested silo with both a registered adapter and an API key,
//! invokes the adapter against the full post set exactly once and collects
//! a structured result. Silos lacking either are skipped with a warning;
//! the engine never performs network I/O itself.

use crate::actions;
use crate::post::Post;
use crate::ports::CredentialStore;
use crate::results::RunResults;
use crate::silos::SiloRegistry;

/// Resolves the API key for a silo from its conventional variable name,
/// `<SILO_NAME_UPPERCASE>_API_KEY`.
///
/// A set-but-empty value counts as absent.
///
/// # Errors
///
/// Returns an error when `silo` is empty; that is a caller bug, not a
/// runtime condition.
pub fn api_key_for(
    credentials: &dyn CredentialStore,
    silo: &str,
) -> Result<Option<String>, String> {
    if silo.trim().is_empty() {
        return Err("missing silo name while resolving an API key".to_string());
    }
    let var = format!("{}_API_KEY", silo.to_uppercase());
    Ok(credentials.get(&var).filter(|key| !key.is_empty()))
}

/// Syndicates the given posts to every eligible requested silo.
///
/// Returns `None` both when there is nothing to do (no posts or no silos
/// requested) and when no requested silo turned out eligible; the two
/// exits are logged distinctly. Otherwise returns one entry per eligible
/// silo: its result, or `None` if its adapter call failed.
///
/// # Errors
///
/// Returns an error only for caller bugs surfaced by credential
/// resolution; per-silo adapter failures are captured in the result map.
pub async fn syndicate(
    registry: &SiloRegistry,
    credentials: &dyn CredentialStore,
    posts: &[Post],
    silos: &[String],
) -> Result<Option<RunResults>, String> {
    if posts.is_empty() || silos.is_empty() {
        actions::log("Nothing to syndicate: no posts or no silos were requested.");
        return Ok(None);
    }

    let requested = normalize(silos);
    actions::log(format!("You want to publish to these places: {requested:?}"));

    let mut eligible = Vec::new();
    for name in &requested {
        let adapter = registry.locate(name);
        let api_key = api_key_for(credentials, name)?;
        match (adapter, api_key) {
            (None, _) => {
                actions::warn(format!("Unknown silo '{name}': no adapter is registered."));
            }
            (Some(_), None) => {
                actions::warn(format!(
                    "No API key available for silo '{name}' (expected {}_API_KEY).",
                    name.to_uppercase()
                ));
            }
            (Some(adapter), Some(key)) => eligible.push((name.clone(), adapter, key)),
        }
    }

    if eligible.is_empty() {
        actions::warn("Sorry, can't do anything with that: no requested silo was usable.");
        return Ok(None);
    }

    actions::log("Let's do this thing.");
    let mut results = RunResults::new();
    for (name, adapter, api_key) in eligible {
        actions::group_start(&name.to_uppercase());
        let outcome = adapter.syndicate(posts, &api_key).await;
        actions::group_end();
        match outcome {
            Ok(result) => {
                if !result.is_disjoint() {
                    actions::warn(format!(
                        "Silo '{name}' claimed a post as both added and modified."
                    ));
                }
                results.insert(name, Some(result));
            }
            Err(err) => {
                actions::error(format!("Syndication to '{name}' failed: {err}"));
                results.insert(name, None);
            }
        }
    }
    Ok(Some(results))
}

/// Lowercases and de-duplicates the requested silo names, keeping request
/// order and dropping empties.
fn normalize(silos: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for name in silos {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}
