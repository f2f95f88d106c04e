//! Document-level preprocessors, run on every source before merging.

use serde_json::Value;

use crate::error::{Error, Result};

pub type Preprocessor = fn(&mut Value);

/// Looks up a preprocessor by the name used in the config.
pub fn preprocessor(name: &str) -> Result<Preprocessor> {
    match name {
        "tokens-studio" => Ok(tokens_studio),
        _ => Err(Error::UnknownPreprocessor(name.to_string())),
    }
}

/// Tokens Studio exports: drops the theme/metadata sections, orders token
/// sets by `$metadata.tokenSetOrder` and aligns type names with DTCG.
pub fn tokens_studio(document: &mut Value) {
    let Value::Object(root) = document else {
        return;
    };
    let order = root
        .get("$metadata")
        .and_then(|metadata| metadata.get("tokenSetOrder"))
        .and_then(Value::as_array)
        .map(|sets| sets.iter().filter_map(Value::as_str).map(str::to_string).collect::<Vec<_>>());
    root.retain(|key, _| key != "$themes" && key != "$metadata");

    if let Some(order) = order {
        let (mut listed, rest): (Vec<_>, Vec<_>) = std::mem::take(root)
            .into_iter()
            .partition(|(name, _)| order.contains(name));
        listed.sort_by_key(|(name, _)| order.iter().position(|set| set == name));
        *root = listed.into_iter().chain(rest).collect();
    }

    align_types(document);
}

fn align_types(node: &mut Value) {
    match node {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if key == "type" || key == "$type" {
                    if let Value::String(type_) = value {
                        if let Some(aligned) = dtcg_type(type_) {
                            *type_ = aligned.to_string();
                        }
                        continue;
                    }
                }
                align_types(value);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(align_types),
        _ => {}
    }
}

fn dtcg_type(type_: &str) -> Option<&'static str> {
    Some(match type_ {
        "boxShadow" => "shadow",
        "fontFamilies" => "fontFamily",
        "fontWeights" => "fontWeight",
        "fontSizes" => "fontSize",
        "lineHeights" => "lineHeight",
        "borderRadius" | "borderWidth" | "spacing" | "sizing" | "paragraphSpacing" => "dimension",
        _ => return None,
    })
}
