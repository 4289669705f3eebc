use serde_json::{json, Value};

pub const TEXT_FIELDS: [&str; 3] = ["tastingNotes", "pairingSuggestion", "regionHistory"];

pub fn insights_instruction(product_name: &str) -> String {
    format!(
        "Generate sophisticated tasting notes, a beverage pairing, and a brief historical tidbit \
         about the region for a premium Portuguese tinned fish product: \"{}\". \
         Keep it poetic and marketing-friendly.",
        product_name
    )
}

/// Gemini `responseSchema` for the insights reply.
pub fn insights_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tastingNotes": {
                "type": "STRING",
                "description": "Sensory description of flavors and textures, approx 30 words."
            },
            "pairingSuggestion": {
                "type": "STRING",
                "description": "A wine or beverage pairing recommendation."
            },
            "regionHistory": {
                "type": "STRING",
                "description": "A 1-sentence fact about Portuguese coastal fishing tradition related to this fish."
            }
        },
        "required": TEXT_FIELDS,
    })
}

/// Open tin, top-down, rustic wood, oil or sauce texture in focus.
pub fn image_prompt(product_name: &str) -> String {
    format!(
        "A hyper-realistic food photography shot of an open metal tin of premium {}, \
         placed on a dark, weathered rustic wooden table. \
         Top-down perspective looking directly into the can. \
         The fish is beautifully arranged inside the tin, glistening with high-quality olive oil or rich tomato sauce. \
         The texture of the fish skin and the metallic rim of the can are sharp and detailed. \
         Dramatic, warm lighting creating a premium, artisanal Portuguese aesthetic. \
         8k resolution, culinary magazine style.",
        product_name
    )
}
