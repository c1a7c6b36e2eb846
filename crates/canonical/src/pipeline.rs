use tracing::{debug, warn};

use crate::config::CanonicalizeConfig;
use crate::document::CanonicalSource;
use crate::error::CanonicalError;
use crate::identifiers::{extract_identifiers, IdentifierSet};
use crate::mask::{mask_identifiers, remove_spaces};
use crate::whitespace::{collapse_whitespace, strip_comments};

/// Main entry point. Turns raw source text into its canonical form.
///
/// A file that fails to parse is not an error: it is normalized without
/// identifier masking and flagged through [`CanonicalSource::parse_failed`].
pub fn normalize(
    name: impl Into<String>,
    text: &str,
    cfg: &CanonicalizeConfig,
) -> Result<CanonicalSource, CanonicalError> {
    cfg.validate()?;

    let name: String = name.into();
    if name.trim().is_empty() {
        return Err(CanonicalError::MissingName);
    }

    let (identifiers, parse_failed) = if cfg.mask_identifiers {
        match extract_identifiers(text) {
            Ok(set) => (set, false),
            Err(err) => {
                warn!(name = %name, error = %err, "canonical_parse_failed");
                (IdentifierSet::default(), true)
            }
        }
    } else {
        (IdentifierSet::default(), false)
    };

    let collapsed = collapse_whitespace(&strip_comments(text, &cfg.comment_marker));
    let canonical_text = if identifiers.is_empty() {
        remove_spaces(&collapsed)
    } else {
        mask_identifiers(&collapsed, &identifiers)
    };

    debug!(
        name = %name,
        input_bytes = text.len(),
        canonical_bytes = canonical_text.len(),
        identifiers = identifiers.len(),
        "canonical_normalized"
    );

    Ok(CanonicalSource {
        name,
        canonical_text,
        identifiers_masked: identifiers.len(),
        parse_failed,
        canonical_version: cfg.version,
    })
}
