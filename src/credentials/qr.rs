// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Brightside

//! Scannable-code rendering for the encrypted credential blob.
//!
//! Produces an SVG image the onboarding page embeds directly. Oversized
//! payloads for the chosen error-correction level are reported as
//! [`CredentialError::VisualCode`], never silently truncated.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use super::encryption::CredentialError;

/// Error-correction level for the scannable code.
///
/// Higher levels tolerate more scan damage but shrink the payload capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Rendering options for the scannable code.
#[derive(Debug, Clone)]
pub struct VisualCodeOptions {
    /// Minimum rendered edge length in pixels.
    pub size: u32,
    /// Quiet-zone margin; `0` disables the quiet zone.
    pub margin: u32,
    /// Error-correction level.
    pub error_correction: ErrorCorrection,
    /// Module (foreground) color, as a CSS color string.
    pub dark_color: String,
    /// Background color, as a CSS color string.
    pub light_color: String,
}

impl Default for VisualCodeOptions {
    fn default() -> Self {
        Self {
            size: 256,
            margin: 4,
            error_correction: ErrorCorrection::default(),
            dark_color: "#000000".to_string(),
            light_color: "#ffffff".to_string(),
        }
    }
}

/// Render a transport blob as an SVG scannable code.
pub fn render_visual_code(
    blob: &str,
    options: &VisualCodeOptions,
) -> Result<String, CredentialError> {
    let code = QrCode::with_error_correction_level(blob, options.error_correction.into())
        .map_err(|e| CredentialError::VisualCode(e.to_string()))?;

    let image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(options.size, options.size)
        .quiet_zone(options.margin > 0)
        .dark_color(svg::Color(&options.dark_color))
        .light_color(svg::Color(&options.light_color))
        .build();

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_svg_with_configured_colors() {
        let options = VisualCodeOptions {
            dark_color: "#1a1a2e".to_string(),
            light_color: "#f5f5f5".to_string(),
            ..VisualCodeOptions::default()
        };
        let image = render_visual_code("dGVzdC1ibG9i", &options).unwrap();
        assert!(image.starts_with("<?xml") || image.starts_with("<svg"));
        assert!(image.contains("#1a1a2e"));
        assert!(image.contains("#f5f5f5"));
    }

    #[test]
    fn higher_error_correction_still_renders_typical_blob() {
        // A realistic encrypted-credential blob is a few hundred chars.
        let blob = "A".repeat(400);
        let options = VisualCodeOptions {
            error_correction: ErrorCorrection::High,
            ..VisualCodeOptions::default()
        };
        assert!(render_visual_code(&blob, &options).is_ok());
    }

    #[test]
    fn oversized_payload_is_reported() {
        // Version 40 QR at high correction tops out well below 8 KiB.
        let blob = "A".repeat(8192);
        let options = VisualCodeOptions {
            error_correction: ErrorCorrection::High,
            ..VisualCodeOptions::default()
        };
        let err = render_visual_code(&blob, &options).unwrap_err();
        assert!(matches!(err, CredentialError::VisualCode(_)));
    }

    #[test]
    fn ec_level_mapping_is_stable() {
        assert_eq!(EcLevel::from(ErrorCorrection::Low), EcLevel::L);
        assert_eq!(EcLevel::from(ErrorCorrection::Medium), EcLevel::M);
        assert_eq!(EcLevel::from(ErrorCorrection::Quartile), EcLevel::Q);
        assert_eq!(EcLevel::from(ErrorCorrection::High), EcLevel::H);
    }
}
