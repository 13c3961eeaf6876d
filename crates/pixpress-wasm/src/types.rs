//! WASM-compatible wrapper types for compression output.

use pixpress_core::CompressionResult;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A compressed image handed back to JavaScript.
///
/// The encoded bytes stay in WASM memory until `bytes()` copies them out, so
/// metadata can be inspected without touching the buffer.
#[wasm_bindgen]
pub struct JsCompressedImage {
    result: CompressionResult,
}

#[wasm_bindgen]
impl JsCompressedImage {
    /// Encoded output as a `Uint8Array` copy.
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.result.bytes.as_slice())
    }

    /// MIME type of the output, e.g. `image/jpeg`
    #[wasm_bindgen(getter, js_name = contentType)]
    pub fn content_type(&self) -> String {
        self.result.content_type().to_string()
    }

    /// File extension without the dot (`jpg` for JPEG)
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.result.extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.result.format.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.result.quality
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.result.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.result.height
    }

    /// Number of encodes performed; more than one only in target mode.
    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.result.attempts
    }

    /// False when a target search could not reach its budget.
    #[wasm_bindgen(getter, js_name = withinBudget)]
    pub fn within_budget(&self) -> bool {
        self.result.within_budget
    }

    #[wasm_bindgen(getter, js_name = originalSize)]
    pub fn original_size(&self) -> usize {
        self.result.original_size
    }

    /// Size of the encoded output in bytes
    #[wasm_bindgen(getter, js_name = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.result.size()
    }

    /// Suggested download name for an uploaded file name.
    #[wasm_bindgen(js_name = fileName)]
    pub fn file_name(&self, original: Option<String>) -> String {
        self.result.file_name(original.as_deref())
    }

    /// All metadata as a plain object, without the bytes.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&CompressionSummary::from(&self.result))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCompressedImage {
    pub(crate) fn from_result(result: CompressionResult) -> Self {
        Self { result }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompressionSummary {
    pub format: &'static str,
    pub source_format: &'static str,
    pub content_type: &'static str,
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    pub original_size: usize,
    pub compressed_size: usize,
    pub attempts: u32,
    pub within_budget: bool,
}

impl From<&CompressionResult> for CompressionSummary {
    fn from(result: &CompressionResult) -> Self {
        Self {
            format: result.format.as_str(),
            source_format: result.source_format.as_str(),
            content_type: result.content_type(),
            quality: result.quality,
            width: result.width,
            height: result.height,
            original_size: result.original_size,
            compressed_size: result.size(),
            attempts: result.attempts,
            within_budget: result.within_budget,
        }
    }
}
