use wasm_bindgen::prelude::*;

use crate::error::Result;
use crate::options::Options;

/// `toJson(xml, options?)` for JavaScript hosts. `options` is a profile name
/// or a JSON option map; the tree comes back as JSON text.
#[wasm_bindgen(js_name = toJson)]
pub fn to_json_js(xml: &str, options: Option<String>) -> std::result::Result<String, JsValue> {
    xml_to_json_string(xml, options.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `toXml(json)` for JavaScript hosts.
#[wasm_bindgen(js_name = toXml)]
pub fn to_xml_js(json: &str) -> std::result::Result<String, JsValue> {
    json_string_to_xml(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn xml_to_json_string(xml: &str, options: Option<&str>) -> Result<String> {
    let options = match options {
        Some(arg) => Options::from_arg(arg)?,
        None => Options::default(),
    };
    Ok(serde_json::to_string(&crate::to_json(xml, options))?)
}

pub(crate) fn json_string_to_xml(json: &str) -> Result<String> {
    Ok(crate::to_xml(&crate::tree_from_json(json)?))
}
