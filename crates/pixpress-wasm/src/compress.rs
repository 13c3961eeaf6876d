//! Compression bindings.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@pixpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = compress_image(bytes, { mode: 'target', targetSizeKB: 200 });
//! const blob = new Blob([out.bytes()], { type: out.contentType });
//! ```

use pixpress_core::{
    detect_format as detect_source_format, resolve_output_format as resolve_format,
    CompressionOptions, Compressor, PresetSize, RequestedFormat, SourceFormat,
};
use wasm_bindgen::prelude::*;

use crate::types::JsCompressedImage;

/// Compress encoded image bytes.
///
/// `options` is a plain object with the same fields as the upload form:
/// `mode`, `preset`, `outputFormat`, `quality`, `width`, `height` and
/// `targetSizeKB`. Numbers may be passed as numbers or strings. `undefined`
/// or `null` compresses in custom mode at quality 80.
///
/// # Errors
///
/// Returns an error string for invalid options, undecodable input, or an
/// encoder failure. A target that cannot be reached is not an error: the
/// result has `withinBudget === false` and a console warning is logged.
#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], options: JsValue) -> Result<JsCompressedImage, JsValue> {
    let options = if options.is_undefined() || options.is_null() {
        CompressionOptions::default()
    } else {
        serde_wasm_bindgen::from_value::<CompressionOptions>(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))?
    };

    let image = compress_with_options(bytes, options).map_err(|e| JsValue::from_str(&e))?;

    if !image.within_budget() {
        console_warn(&format!(
            "pixpress: target size not reached, returning {} bytes at quality {}",
            image.byte_length(),
            image.quality()
        ));
    }

    Ok(image)
}

pub(crate) fn compress_with_options(
    bytes: &[u8],
    options: CompressionOptions,
) -> Result<JsCompressedImage, String> {
    let request = options.into_request().map_err(|e| e.to_string())?;
    let result = Compressor::new()
        .compress(bytes, &request)
        .map_err(|e| e.to_string())?;
    Ok(JsCompressedImage::from_result(result))
}

/// Output format the compressor would pick.
///
/// `detected` is a source format name as returned by [`detect_format`];
/// `requested` is `auto` or an explicit format. Unknown values fall back to
/// `auto` behaviour.
#[wasm_bindgen]
pub fn resolve_output_format(detected: &str, requested: &str) -> String {
    resolve_format(
        SourceFormat::from_name(detected),
        RequestedFormat::parse(requested),
    )
    .as_str()
    .to_string()
}

/// Sniff the container of encoded bytes (`png`, `jpeg`, ... or `unknown`).
#[wasm_bindgen]
pub fn detect_format(bytes: &[u8]) -> String {
    detect_source_format(bytes).as_str().to_string()
}

/// Preset table entry as `{ maxWidth, maxHeight, quality }`.
#[wasm_bindgen]
pub fn preset_settings(name: &str) -> Result<JsValue, JsValue> {
    let preset = name
        .parse::<PresetSize>()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&preset.settings()).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn console_warn(_message: &str) {}
