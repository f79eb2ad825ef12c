//! Deployment tag numbering.
//!
//! Tags follow `pantheon_<env>_<n>` and are strictly monotonically
//! increasing per target environment. Pushing such a tag is what triggers
//! the platform's deployment pipeline.

use regex::Regex;

/// Tag prefix for a target environment, e.g. `pantheon_live_`.
pub fn tag_prefix(env: &str) -> String {
    format!("pantheon_{}_", env)
}

/// Parse the tag number out of an environment's deployed reference.
///
/// A reference that is not a deployment tag for this environment (for
/// example `master`) counts as tag number 0.
pub fn current_tag_number(env: &str, deployed_ref: &str) -> u64 {
    let pattern = format!(r"^{}(\d+)$", regex::escape(&tag_prefix(env)));
    let re = Regex::new(&pattern).expect("static tag pattern");
    re.captures(deployed_ref)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

/// Compute the next deployment tag for an environment, exactly one greater
/// than the number parsed from its current deployed reference.
pub fn next_tag(env: &str, deployed_ref: &str) -> String {
    format!(
        "{}{}",
        tag_prefix(env),
        current_tag_number(env, deployed_ref) + 1
    )
}
