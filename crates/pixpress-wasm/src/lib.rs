//! Pixpress WASM - WebAssembly bindings for pixpress
//!
//! This crate exposes the pixpress-core compressor to JavaScript so the
//! website can compress images in the browser without uploading them.
//!
//! # Module Structure
//!
//! - `compress` - Compression, format detection and preset lookup
//! - `types` - WASM-compatible wrapper for compression output
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@pixpress/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = compress_image(bytes, { mode: 'preset', preset: 'medium' });
//! console.log(`${out.originalSize} -> ${out.byteLength} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

// Re-export public types
pub use compress::{compress_image, detect_format, preset_settings, resolve_output_format};
pub use types::JsCompressedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
