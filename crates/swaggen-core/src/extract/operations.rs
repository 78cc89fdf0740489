use std::borrow::Cow;

use serde::Deserialize;

use crate::error::ExtractError;
use crate::parse::document::Document;
use crate::parse::operation::{NON_OPERATION_KEYS, Operation, Parameter, PathItem, Response};

use super::metadata::{
    HttpMethod, OperationMetadata, ParameterMetadata, ParameterSource, ResponseMetadata,
};
use super::reference::{get_type_reference, lookup_ref, void_reference};

/// Extract metadata for every operation under `paths`, in document order.
pub fn get_operations(document: &Document) -> Result<Vec<OperationMetadata>, ExtractError> {
    let mut operations = Vec::new();

    for (path, item) in &document.spec().paths {
        let Some(item) = item else { continue };
        collect_operations(document, path, item, &mut operations)?;
    }

    Ok(operations)
}

fn collect_operations(
    document: &Document,
    path: &str,
    item: &PathItem,
    out: &mut Vec<OperationMetadata>,
) -> Result<(), ExtractError> {
    let shared = match item.get("parameters") {
        Some(value) if !value.is_null() => Vec::<Parameter>::deserialize(value).map_err(|source| {
            ExtractError::MalformedOperation {
                path: path.to_string(),
                method: "parameters".to_string(),
                source,
            }
        })?,
        _ => Vec::new(),
    };

    for (key, value) in item {
        if value.is_null() || is_non_operation_key(key) {
            continue;
        }
        let method = HttpMethod::parse(key)?;
        let operation = Operation::deserialize(value).map_err(|source| {
            ExtractError::MalformedOperation {
                path: path.to_string(),
                method: key.clone(),
                source,
            }
        })?;
        out.push(build_operation(document, path, method, &operation, &shared)?);
    }
    Ok(())
}

fn is_non_operation_key(key: &str) -> bool {
    key.starts_with("x-") || NON_OPERATION_KEYS.contains(&key)
}

fn build_operation(
    document: &Document,
    path: &str,
    method: HttpMethod,
    op: &Operation,
    shared: &[Parameter],
) -> Result<OperationMetadata, ExtractError> {
    let name = match op.operation_id.as_deref() {
        Some(id) => id.to_string(),
        None => {
            let tag = op.tags.first().map(String::as_str).unwrap_or_default();
            format!("{tag}_{method}")
        }
    };

    let parameters = merge_parameters(shared, &op.parameters)
        .map(|p| build_parameter(document, p))
        .collect::<Result<Vec<_>, _>>()?;

    let responses = op
        .responses
        .iter()
        .filter_map(|(code, resp)| resp.as_ref().map(|r| (code, r)))
        .map(|(code, resp)| build_response(document, code, resp))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OperationMetadata {
        name,
        path: path.to_string(),
        method,
        tags: op.tags.clone(),
        description: op.summary.clone().unwrap_or_default(),
        parameters,
        responses,
    })
}

/// Path-level parameters first, minus those the operation redeclares with the
/// same name and location, then the operation's own.
fn merge_parameters<'a>(
    shared: &'a [Parameter],
    own: &'a [Parameter],
) -> impl Iterator<Item = &'a Parameter> {
    shared
        .iter()
        .filter(|s| {
            !own.iter()
                .any(|o| o.name == s.name && o.location == s.location)
        })
        .chain(own)
}

fn build_parameter(
    document: &Document,
    param: &Parameter,
) -> Result<ParameterMetadata, ExtractError> {
    Ok(ParameterMetadata {
        name: param.name.clone(),
        description: param.description.clone().unwrap_or_default(),
        source: ParameterSource::parse(&param.location)?,
        required: param.required,
        type_reference: get_type_reference(document, param.effective_schema())?,
    })
}

fn build_response(
    document: &Document,
    code: &str,
    resp: &Response,
) -> Result<ResponseMetadata, ExtractError> {
    let resp = dereference_response(document, resp)?;
    let type_reference = match resp.body_schema() {
        Some(schema) if is_success(code) => get_type_reference(document, schema)?,
        _ => void_reference(),
    };

    Ok(ResponseMetadata {
        description: resp.description.clone().unwrap_or_default(),
        response_code: code.to_string(),
        type_reference,
    })
}

fn dereference_response<'a>(
    document: &Document,
    resp: &'a Response,
) -> Result<Cow<'a, Response>, ExtractError> {
    let Some(ref_path) = resp.ref_path.as_deref() else {
        return Ok(Cow::Borrowed(resp));
    };
    let target = lookup_ref(document, ref_path)?;
    let mut resolved =
        Response::deserialize(target).map_err(|source| ExtractError::MalformedResponse {
            reference: ref_path.to_string(),
            source,
        })?;
    if resolved.description.is_none() {
        resolved.description = resp.description.clone();
    }
    Ok(Cow::Owned(resolved))
}

/// `200`, `201`, `2XX` and friends.
fn is_success(code: &str) -> bool {
    code.len() == 3 && code.starts_with('2')
}
