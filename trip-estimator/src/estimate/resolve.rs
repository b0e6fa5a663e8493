//! Location resolution.
//!
//! Turns a pair of endpoints into the single string the routing endpoint
//! takes in its path. Each endpoint contributes its place-code when it has
//! one, otherwise its coordinate as `lng,lat`.

use crate::domain::{CoordinateString, Endpoint, InputError};

/// Resolve source and destination into a provider coordinate string.
///
/// # Errors
///
/// Returns [`InputError`] naming the first endpoint with neither a
/// place-code nor a usable coordinate, or with a malformed place-code.
pub fn resolve(source: &Endpoint, destination: &Endpoint) -> Result<CoordinateString, InputError> {
    let from = resolve_endpoint(source, "source")?;
    let to = resolve_endpoint(destination, "destination")?;
    Ok(CoordinateString::new(format!("{from};{to}")))
}

/// Longest place-code accepted; eLocs are six characters.
const MAX_PLACE_CODE_LEN: usize = 32;

fn resolve_endpoint(endpoint: &Endpoint, name: &'static str) -> Result<String, InputError> {
    if let Some(code) = endpoint.usable_place_code() {
        if !is_place_code(code) {
            return Err(InputError::InvalidPlaceCode {
                endpoint: name,
                code: code.to_string(),
            });
        }
        return Ok(code.to_string());
    }

    endpoint
        .usable_coordinate()
        .map(|c| c.to_lng_lat())
        .ok_or(InputError::Unresolvable { endpoint: name })
}

/// A place-code goes into the request path verbatim, so only plain
/// alphanumeric tokens are allowed.
fn is_place_code(code: &str) -> bool {
    code.len() <= MAX_PLACE_CODE_LEN && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
