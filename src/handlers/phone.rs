use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Country;
use crate::services::masking;

#[derive(Deserialize)]
pub struct MaskRequest {
    pub country: Country,
    pub input: String,
}

#[derive(Serialize)]
pub struct MaskResponse {
    masked: String,
    digits: usize,
    max_digits: usize,
    complete: bool,
    placeholder: &'static str,
}

// POST /api/phone/mask
pub async fn mask(Json(body): Json<MaskRequest>) -> Json<MaskResponse> {
    let masked = masking::mask_phone(&body.input, body.country);
    let format = body.country.phone_format();

    Json(MaskResponse {
        digits: masking::digit_count(&masked),
        max_digits: format.max_digits,
        complete: masking::is_complete(&masked, body.country),
        placeholder: format.placeholder,
        masked,
    })
}
