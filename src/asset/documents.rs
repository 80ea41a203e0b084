//! Document Registry
//!
//! Name-keyed records of `{hash, uri, last_modified}` attached to the
//! token (prospectuses, charters, legal notices). Writes are gated on
//! the document role; reads are open. An auxiliary name list supports
//! enumeration in attachment order.

use crate::asset::constants::{MAX_DOCUMENT_NAME_LENGTH, MAX_DOCUMENT_URI_LENGTH};
use crate::asset::error::{AssetError, AssetResult};
use crate::asset::operations::require_role;
use crate::asset::roles::DOCUMENT_ROLE;
use crate::asset::storage::AssetStorage;
use crate::asset::types::Document;
use crate::context::RuntimeContext;
use crate::crypto::Hash;

fn validate_name(name: &str) -> AssetResult<()> {
    if name.is_empty() || name.len() > MAX_DOCUMENT_NAME_LENGTH {
        return Err(AssetError::DocumentNameInvalid);
    }
    Ok(())
}

/// Attach or update a document under `name`
pub fn set_document<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    name: &str,
    hash: Hash,
    uri: &str,
) -> AssetResult<()> {
    require_role(storage, &DOCUMENT_ROLE, &ctx.caller)?;
    validate_name(name)?;
    if uri.len() > MAX_DOCUMENT_URI_LENGTH {
        return Err(AssetError::UriTooLong);
    }

    let document = Document {
        hash,
        uri: uri.to_string(),
        last_modified: ctx.timestamp,
    };
    storage.set_document(name, &document);
    Ok(())
}

/// Remove the document under `name`
pub fn remove_document<S: AssetStorage + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    name: &str,
) -> AssetResult<()> {
    require_role(storage, &DOCUMENT_ROLE, &ctx.caller)?;
    validate_name(name)?;
    if !storage.remove_document(name) {
        return Err(AssetError::DocumentNotFound);
    }
    Ok(())
}

/// Look up the document under `name`
pub fn get_document<S: AssetStorage + ?Sized>(
    storage: &S,
    name: &str,
) -> AssetResult<Document> {
    storage.document(name).ok_or(AssetError::DocumentNotFound)
}

/// Enumerate document names in attachment order
pub fn all_documents<S: AssetStorage + ?Sized>(storage: &S) -> Vec<String> {
    storage.document_names()
}
