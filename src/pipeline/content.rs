use crate::assistant::{ContentBlock, UploadedImageRef};

/// Image blocks in upload order, then the caller's text as the final block.
pub fn assemble_content(images: &[UploadedImageRef], text: &str) -> Vec<ContentBlock> {
    let mut content: Vec<ContentBlock> = images
        .iter()
        .map(|image| ContentBlock::Image {
            file_id: image.file_id.clone(),
        })
        .collect();

    content.push(ContentBlock::Text {
        value: text.to_string(),
    });

    content
}
