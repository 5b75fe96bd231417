//! Usage-mask checks shared by the algorithm families

use webcrypt_api::{Error, Result, UsageMask};

/// Fail with the first usage in `requested` that `legal` does not permit
pub(crate) fn check_usages(legal: UsageMask, requested: UsageMask) -> Result<()> {
    match requested.difference(legal).usages().next() {
        Some(usage) => {
            tracing::debug!(usage = usage.name(), "usage illegal for key family");
            Err(Error::UsageNotAllowed { usage: usage.name() })
        }
        None => Ok(()),
    }
}

/// Secret and private keys must carry at least one usage
pub(crate) fn check_not_empty(usages: UsageMask) -> Result<()> {
    if usages.is_empty() {
        return Err(Error::CreateKeyEmptyUsages);
    }
    Ok(())
}
