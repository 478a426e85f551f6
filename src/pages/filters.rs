use std::fmt::Display;

const PLACEHOLDER_COVER: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/6/65/No-Image-Placeholder.svg/800px-No-Image-Placeholder.svg.png";

/// Placeholder image when a thumbnail is missing
pub fn cover<T: Display>(thumb: T) -> ::askama::Result<String> {
    let thumb = thumb.to_string();
    if thumb.trim().is_empty() {
        Ok(PLACEHOLDER_COVER.to_string())
    } else {
        Ok(thumb)
    }
}

pub fn or_na<T: Display>(value: T) -> ::askama::Result<String> {
    let value = value.to_string();
    if value.trim().is_empty() {
        Ok("N/A".to_string())
    } else {
        Ok(value)
    }
}
