use super::{escape, format_size, gallery_url, layout, scripts};
use crate::{
    models::{
        blob::{BlobObject, ImageEntry, image_url},
        photo::PhotoMetadata,
    },
    services::metadata_store::PhotoFilter,
};
use axum::response::Html;
use chrono::{DateTime, Utc};

fn format_time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn home() -> Html<String> {
    let body = format!(
        r#"
<header><h1>In memory</h1><p class="muted">Share the photos you took together. <a href="/gallery">Open the gallery</a></p></header>
<section id="upload">
  <h2>Add a photo</h2>
  <form id="upload-form">
    <input type="file" name="file" accept="image/*,.heic,.heif" required>
    <input type="text" name="capturedBy" placeholder="Taken by (optional)">
    <textarea name="subjects" rows="2" placeholder="People in the photo, separated by commas or new lines"></textarea>
    <textarea name="comment" rows="3" placeholder="A few words (optional)"></textarea>
    <button type="submit">Upload</button>
    <p id="upload-status" class="muted"></p>
  </form>
</section>
<script type="module">{script}</script>"#,
        script = scripts::UPLOAD,
    );
    layout("In memory", &body)
}

pub fn gallery(images: &[ImageEntry], filter: &PhotoFilter) -> Html<String> {
    let tiles = if images.is_empty() {
        if filter.is_empty() {
            r#"<p class="muted">No photos yet. <a href="/#upload">Add the first one.</a></p>"#
                .to_string()
        } else {
            r#"<p class="muted">No photos match this filter.</p>"#.to_string()
        }
    } else {
        let items: String = images
            .iter()
            .map(|img| {
                format!(
                    r#"<a href="{href}"><img src="{src}" alt="Photo" loading="lazy"></a>"#,
                    href = escape(&gallery_url(&img.key)),
                    src = escape(&img.url),
                )
            })
            .collect();
        format!(r#"<div class="grid">{}</div>"#, items)
    };

    let body = format!(
        r#"
<header><a href="/">Home</a> → Gallery · <a href="/#upload">Add a photo</a></header>
<section>
  <h2>Gallery</h2>
  <p class="muted">{count} photos</p>
  <form class="inline" method="get" action="/gallery">
    <input type="text" name="capturedBy" value="{captured_by}" placeholder="Taken by">
    <input type="text" name="subject" value="{subject}" placeholder="Person in photo">
    <button type="submit">Filter</button>
    <a href="/gallery">Clear</a>
  </form>
  {tiles}
</section>"#,
        count = images.len(),
        captured_by = escape(&filter.captured_by),
        subject = escape(&filter.subject),
        tiles = tiles,
    );
    layout("Gallery", &body)
}

pub fn detail(blob: &BlobObject, metadata: Option<&PhotoMetadata>) -> Html<String> {
    let key = escape(&blob.key);

    let card = match metadata {
        Some(meta) => {
            let subjects = if meta.subjects.is_empty() {
                "—".to_string()
            } else {
                escape(&meta.subjects.join(", "))
            };
            format!(
                r#"<dl>
  <dt>Taken by</dt><dd>{captured_by}</dd>
  <dt>In the photo</dt><dd>{subjects}</dd>
  <dt>Comment</dt><dd>{comment}</dd>
  <dt>Last updated</dt><dd>{updated}</dd>
</dl>"#,
                captured_by = or_dash(&meta.captured_by),
                subjects = subjects,
                comment = or_dash(&meta.comment),
                updated = format_time(&meta.created_at),
            )
        }
        None => r#"<p class="muted">No details recorded yet.</p>"#.to_string(),
    };

    let (captured_by, subjects, comment) = metadata
        .map(|m| {
            (
                escape(&m.captured_by),
                escape(&m.subjects.join("\n")),
                escape(&m.comment),
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"
<header><a href="/">Home</a> → <a href="/gallery">Gallery</a> → Photo</header>
<section class="detail">
  <img src="{src}" alt="Uploaded memory">
  <p class="muted">Key: {key}</p>
  <p class="muted">Size: {size} · Uploaded: {uploaded}</p>
</section>
<section>
  <h2>Details</h2>
  {card}
</section>
<section>
  <h2>Edit details</h2>
  <form id="metadata-form" data-key="{key}">
    <input type="text" name="capturedBy" value="{captured_by}" placeholder="Taken by">
    <textarea name="subjects" rows="3" placeholder="People in the photo, one per line">{subjects}</textarea>
    <textarea name="comment" rows="3" placeholder="Comment">{comment}</textarea>
    <button type="submit">Save</button>
    <p id="metadata-status" class="muted"></p>
  </form>
</section>
<section>
  <button id="delete-button" class="danger" data-key="{key}">Delete this photo</button>
</section>
<script type="module">{editor}{delete}</script>"#,
        src = escape(&image_url(&blob.key)),
        key = key,
        size = format_size(blob.size_bytes),
        uploaded = format_time(&blob.uploaded_at),
        card = card,
        captured_by = captured_by,
        subjects = subjects,
        comment = comment,
        editor = scripts::EDITOR,
        delete = scripts::DELETE,
    );
    layout("Photo", &body)
}

pub fn not_found() -> Html<String> {
    layout(
        "Not found",
        r#"<section><h2>Photo not found</h2><p><a href="/gallery">Back to the gallery</a></p></section>"#,
    )
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "—".to_string()
    } else {
        escape(value)
    }
}
