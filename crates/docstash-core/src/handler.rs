//! DocStash handler implementation bridging HTTP to the provider.

use std::sync::Arc;

use bytes::Bytes;

use docstash_http::body::DocStashResponseBody;
use docstash_http::dispatch::{DocStashHandler, HandlerFuture, RequestContext};
use docstash_http::query::QueryParams;
use docstash_http::response::json_response;
use docstash_model::error::DocStashError;
use docstash_model::input::{
    GenerateShareUrlInput, ListDocumentsInput, RemoveDocumentInput, RenameDocumentInput,
};
use docstash_model::operations::DocStashOperation;

use crate::provider::DocStash;

/// Handler that bridges the HTTP layer to the DocStash provider.
#[derive(Debug)]
pub struct DocStashRequestHandler {
    provider: Arc<DocStash>,
}

impl DocStashRequestHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<DocStash>) -> Self {
        Self { provider }
    }
}

impl DocStashHandler for DocStashRequestHandler {
    fn handle_operation(&self, ctx: RequestContext, body: Bytes) -> HandlerFuture {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move { dispatch(provider.as_ref(), ctx, &body).await })
    }
}

/// Dispatch a DocStash operation to the matching provider method.
async fn dispatch(
    provider: &DocStash,
    ctx: RequestContext,
    body: &[u8],
) -> Result<http::Response<DocStashResponseBody>, DocStashError> {
    let query = &ctx.query;

    match ctx.operation {
        DocStashOperation::InitiateMultipartUpload => {
            let input = deserialize(body)?;
            json_response(provider.initiate_multipart_upload(input).await?)
        }
        DocStashOperation::GeneratePresignedUrls => {
            let input = deserialize(body)?;
            json_response(provider.generate_presigned_urls(input).await?)
        }
        DocStashOperation::CompleteMultipartUpload => {
            let input = deserialize(body)?;
            json_response(provider.complete_multipart_upload(input).await?)
        }
        DocStashOperation::ListDocuments => {
            json_response(provider.list_documents(list_input(query)).await?)
        }
        DocStashOperation::RemoveDocument => {
            let input = RemoveDocumentInput {
                file_key: query.get_or_empty("fileKey"),
            };
            json_response(provider.remove_document(input).await?)
        }
        DocStashOperation::RenameDocument => {
            let input = RenameDocumentInput {
                old_file_key: query.get_or_empty("oldFileKey"),
                new_file_key: query.get_or_empty("newFileKey"),
            };
            let outcome = provider.rename_document(&input).await?;
            json_response(outcome.into_result(&input.old_file_key, &input.new_file_key)?)
        }
        DocStashOperation::GenerateShareUrl => {
            json_response(provider.generate_share_url(share_input(query)).await?)
        }
    }
}

fn list_input(query: &QueryParams) -> ListDocumentsInput {
    ListDocumentsInput {
        prefix: query.get_or_empty("prefix"),
        delimiter: query.get_or_empty("delimiter"),
    }
}

/// A non-integer `expiresIn` is treated like a missing one.
fn share_input(query: &QueryParams) -> GenerateShareUrlInput {
    GenerateShareUrlInput {
        file_key: query.get_or_empty("fileKey"),
        expires_in: query
            .get("expiresIn")
            .and_then(|v| v.trim().parse::<i64>().ok()),
    }
}

/// Deserialize a JSON request body into the input type.
fn deserialize<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, DocStashError> {
    serde_json::from_slice(body).map_err(|e| {
        DocStashError::invalid_input(format!("Invalid request payload: {e}")).with_source(e)
    })
}
