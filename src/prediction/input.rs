use serde::Serialize;

// Generation defaults found by experimentation against the portrait LoRA.
// Tuning happens through the form fields, not here.
const STEPS: u32 = 28;
const LORA_STRENGTH: f64 = 1.0;
const OUTPUT_FORMAT: &str = "png";
const GUIDANCE_SCALE: f64 = 2.5;
const OUTPUT_QUALITY: u32 = 100;
const CONTROL_STRENGTH: f64 = 0.65;
const DEPTH_PREPROCESSOR: &str = "DepthAnything";
const SOFT_EDGE_PREPROCESSOR: &str = "HED";
const IMAGE_TO_IMAGE_STRENGTH: f64 = 0.13;

/// Parameter bag submitted with a prediction. Immutable once submitted.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput {
    steps: u32,
    prompt: String,
    lora_url: String,
    control_type: String,
    control_image: String,
    lora_strength: f64,
    output_format: &'static str,
    guidance_scale: f64,
    output_quality: u32,
    negative_prompt: String,
    control_strength: f64,
    depth_preprocessor: &'static str,
    soft_edge_preprocessor: &'static str,
    image_to_image_strength: f64,
    return_preprocessed_image: bool,
}

impl PredictionInput {
    pub fn new(
        prompt: String,
        control_image: String,
        control_type: String,
        negative_prompt: String,
        lora_url: String,
    ) -> Self {
        Self {
            steps: STEPS,
            prompt,
            lora_url,
            control_type,
            control_image,
            lora_strength: LORA_STRENGTH,
            output_format: OUTPUT_FORMAT,
            guidance_scale: GUIDANCE_SCALE,
            output_quality: OUTPUT_QUALITY,
            negative_prompt,
            control_strength: CONTROL_STRENGTH,
            depth_preprocessor: DEPTH_PREPROCESSOR,
            soft_edge_preprocessor: SOFT_EDGE_PREPROCESSOR,
            image_to_image_strength: IMAGE_TO_IMAGE_STRENGTH,
            return_preprocessed_image: false,
        }
    }
}
