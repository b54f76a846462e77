//! Alias chain resolution.

use crate::error::{ContainerError, Result};
use std::collections::HashMap;
use tracing::trace;

/// Follows `name` through the alias table to its canonical identifier.
///
/// A name with no alias entry is returned unchanged. Otherwise each hop is
/// counted, and exceeding `limit` hops fails with
/// [`ContainerError::UnresolvableAlias`], which is what stops a cycle such as
/// `a -> b -> a` from spinning forever.
pub(crate) fn resolve(aliases: &HashMap<String, String>, name: &str, limit: usize) -> Result<String> {
  let mut current = name;
  let mut hops = 0usize;

  while let Some(target) = aliases.get(current) {
    hops += 1;
    if hops > limit {
      return Err(ContainerError::UnresolvableAlias {
        alias: name.to_owned(),
        reached: target.clone(),
        limit,
      });
    }
    trace!(alias = current, target = target.as_str(), hops, "following alias");
    current = target.as_str();
  }

  Ok(current.to_owned())
}
