use crate::assistant::{AssistantApi, UploadedImageRef};

use super::decode::decode_image;
use super::error::ReportError;
use super::observer::ReportObserver;

pub const UPLOAD_PURPOSE: &str = "vision";

/// Decodes and uploads every image concurrently, then aggregates.
///
/// Every upload runs to completion even when a sibling fails; the batch fails
/// if any single image failed. References come back in input order.
#[tracing::instrument(
    name = "pipeline_stage upload",
    skip(api, observer, images),
    fields(
        pipeline.stage = "upload",
        images.count = images.len(),
        images.failed,
    )
)]
pub async fn upload_images(
    api: &dyn AssistantApi,
    observer: &dyn ReportObserver,
    images: &[String],
) -> Result<Vec<UploadedImageRef>, ReportError> {
    if images.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(count = images.len(), "Uploading images");
    let results = upload_all(api, observer, images).await;
    let outcome = aggregate(results);

    if let Err(ReportError::Upload { failed, .. }) = &outcome {
        tracing::Span::current().record("images.failed", *failed);
    } else {
        tracing::info!("All images uploaded successfully");
    }

    outcome
}

/// One result per input image, in input order.
pub async fn upload_all(
    api: &dyn AssistantApi,
    observer: &dyn ReportObserver,
    images: &[String],
) -> Vec<Result<UploadedImageRef, ReportError>> {
    let uploads = images
        .iter()
        .enumerate()
        .map(|(index, raw)| upload_one(api, observer, index, raw));

    futures::future::join_all(uploads).await
}

async fn upload_one(
    api: &dyn AssistantApi,
    observer: &dyn ReportObserver,
    index: usize,
    raw_base64: &str,
) -> Result<UploadedImageRef, ReportError> {
    let result: Result<UploadedImageRef, ReportError> = async {
        let asset =
            decode_image(raw_base64).map_err(|source| ReportError::Decode { index, source })?;
        let file_id = api
            .upload_file(&asset, UPLOAD_PURPOSE)
            .await
            .map_err(|source| ReportError::FileUpload { index, source })?;
        Ok(UploadedImageRef { file_id })
    }
    .await;

    match &result {
        Ok(uploaded) => observer.image_uploaded(index, &uploaded.file_id),
        Err(e) => observer.image_failed(index, e),
    }

    result
}

fn aggregate(
    results: Vec<Result<UploadedImageRef, ReportError>>,
) -> Result<Vec<UploadedImageRef>, ReportError> {
    let total = results.len();
    let mut uploaded = Vec::with_capacity(total);
    let mut failed = 0;
    let mut first_error = None;

    for result in results {
        match result {
            Ok(image) => uploaded.push(image),
            Err(e) => {
                failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        None => Ok(uploaded),
        Some(first) => Err(ReportError::Upload {
            failed,
            total,
            first: Box::new(first),
        }),
    }
}
