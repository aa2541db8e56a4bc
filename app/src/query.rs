//! Extract typed query parameters from the request target.
use serde::de::DeserializeOwned;

/// Parse the query string of the incoming request into `T`.
///
/// A missing query string is treated as an empty one.
pub fn extract<T>(query: Option<&str>) -> Result<T, ExtractQueryParamsError>
where
    T: DeserializeOwned,
{
    let parse = form_urlencoded::parse(query.unwrap_or_default().as_bytes());
    let deserializer = serde_html_form::Deserializer::new(parse);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        ExtractQueryParamsError::QueryDeserializationError(QueryDeserializationError { inner: e })
    })
}

/// The error returned by [`extract`] when the extraction fails.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractQueryParamsError {
    #[error(transparent)]
    /// See [`QueryDeserializationError`] for details.
    QueryDeserializationError(QueryDeserializationError),
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
/// Something went wrong when trying to deserialize the percent-decoded query parameters into
/// the target type.
pub struct QueryDeserializationError {
    inner: serde_path_to_error::Error<serde_html_form::de::Error>,
}
