//! Style catalog
//!
//! Visual styles a user can attach to a generation request. Only the ids are
//! sent to providers; names and descriptions are for display.

use crate::types::{AppError, AppResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StyleOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub static STYLES: [StyleOption; 4] = [
    StyleOption {
        id: "minimal",
        name: "Minimal",
        description: "Clean, uncluttered layout that puts the product first",
    },
    StyleOption {
        id: "vintage",
        name: "Vintage",
        description: "Nostalgic tones and textures for a classic feel",
    },
    StyleOption {
        id: "modern",
        name: "Modern",
        description: "Sleek, forward-looking design for trend products",
    },
    StyleOption {
        id: "colorful",
        name: "Colorful",
        description: "Bright, saturated colors that grab attention",
    },
];

pub fn find_style(id: &str) -> Option<&'static StyleOption> {
    STYLES.iter().find(|s| s.id == id)
}

/// Reject ids that are not in the catalog
pub fn validate_styles<S: AsRef<str>>(ids: &[S]) -> AppResult<()> {
    let unknown: Vec<&str> = ids
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| find_style(id).is_none())
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!(
            "unknown style(s): {}",
            unknown.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_styles() {
        assert!(validate_styles(&["minimal", "colorful"]).is_ok());
        assert!(validate_styles::<&str>(&[]).is_ok());

        let err = validate_styles(&["minimal", "baroque"]).unwrap_err();
        assert!(err.to_string().contains("baroque"));
    }
}
