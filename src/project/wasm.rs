//! WASM bindings for project generation.
//!
//! Prompts and projects cross the boundary as plain JS objects with the same
//! field names as the Rust model.

use js_sys::Uint8Array;
use serde::{de::DeserializeOwned, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::pipeline::ComponentGenerator;
use crate::project::document::ProjectDocument;
use crate::project::model::{ParsedPrompt, ProjectComponents};

/// Serialize a value to JsValue with maps as plain JS objects (not Map).
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

/// Deserialize a JS object, reporting failures as [`GenError::Serialization`].
fn from_js_value<T: DeserializeOwned>(value: JsValue) -> Result<T, GenError> {
    from_value(value).map_err(|e| GenError::serialization(e.to_string()))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<GenError> for JsValue {
    fn from(err: GenError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: GenError| JsValue::from(e))
    };
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around [`ComponentGenerator`].
#[wasm_bindgen]
pub struct JsProjectGenerator {
    inner: ComponentGenerator,
}

#[wasm_bindgen]
impl JsProjectGenerator {
    /// Creates a generator with the default configuration.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const generator = new JsProjectGenerator();
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsProjectGenerator {
        JsProjectGenerator {
            inner: ComponentGenerator::new(),
        }
    }

    /// Creates a generator from a TOML configuration string.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(toml: &str) -> Result<JsProjectGenerator, JsValue> {
        let config = js_result!(GeneratorConfig::from_toml_str(toml))?;
        Ok(JsProjectGenerator {
            inner: ComponentGenerator::with_config(config),
        })
    }

    /// Generates a project from a parsed prompt object.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const project = generator.generate({
    ///   title: "Neon Rain",
    ///   genre: "cyberpunk",
    ///   video_type: "trailer",
    ///   duration_seconds: 60,
    ///   aspect_ratio: "16:9",
    /// });
    /// console.log(project.coherence.is_coherent);
    /// ```
    pub fn generate(&self, prompt: JsValue) -> Result<JsValue, JsValue> {
        let prompt: ParsedPrompt = js_result!(from_js_value(prompt))?;
        let components = js_result!(self.inner.generate(&prompt))?;
        Ok(to_js_value(&components)?)
    }

    /// Generates a project and returns it as a saved Automerge document.
    #[wasm_bindgen(js_name = generateDocument)]
    pub fn generate_document(&self, prompt: JsValue) -> Result<Uint8Array, JsValue> {
        let prompt: ParsedPrompt = js_result!(from_js_value(prompt))?;
        let components = js_result!(self.inner.generate(&prompt))?;
        let mut doc = js_result!(ProjectDocument::from_components(&components))?;
        let bytes = doc.save();
        Ok(Uint8Array::from(&bytes[..]))
    }

    /// Validates a project object and returns its coherence report.
    ///
    /// # Example (JavaScript)
    /// ```js
    /// const report = generator.validate(project);
    /// report.issues.forEach(i => console.warn(i.severity, i.description));
    /// ```
    pub fn validate(&self, components: JsValue) -> Result<JsValue, JsValue> {
        let components: ProjectComponents = js_result!(from_js_value(components))?;
        let report = self.inner.validate_coherence(&components);
        Ok(to_js_value(&report)?)
    }
}

impl Default for JsProjectGenerator {
    fn default() -> Self {
        Self::new()
    }
}
