//! Package name derivation.

use crate::PackageNameError;

/// Derives the package name of a binding from its exported type name.
///
/// When a subdirectory prefix is given, `prefix.len()` bytes are cut from the front of the
/// type name before lower-casing. Only the length of the prefix is used, so `CostEstimator`
/// under `libs` becomes `estimator`. The result is not escaped; names the target language
/// rejects surface as generator failures.
pub fn resolve_package_name(
    type_name: &str,
    prefix: Option<&str>,
) -> Result<String, PackageNameError> {
    let Some(prefix) = prefix.filter(|p| !p.is_empty()) else {
        return Ok(type_name.to_lowercase());
    };

    if prefix.len() >= type_name.len() {
        return Err(PackageNameError::PrefixTooLong {
            type_name: type_name.to_string(),
            prefix: prefix.to_string(),
            prefix_len: prefix.len(),
        });
    }

    let rest = type_name.get(prefix.len()..).ok_or_else(|| PackageNameError::NotCharBoundary {
        type_name: type_name.to_string(),
        prefix: prefix.to_string(),
    })?;

    Ok(rest.to_lowercase())
}
