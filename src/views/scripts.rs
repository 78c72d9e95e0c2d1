//! Browser-side widgets embedded in the rendered pages.

/// Upload form: optional HEIC/HEIF → JPEG conversion in the browser, raw
/// upload, then an optional metadata save for the new key.
pub const UPLOAD: &str = r##"
const HEIC_DECODER = "https://cdn.jsdelivr.net/npm/heic2any@0.0.4/+esm";

function isHeif(file) {
  const name = file.name.toLowerCase();
  return file.type === "image/heic" || file.type === "image/heif" ||
    name.endsWith(".heic") || name.endsWith(".heif");
}

async function normalizeImage(file) {
  if (!isHeif(file)) return { file, converted: false };
  const heic2any = (await import(HEIC_DECODER)).default;
  let blob;
  try {
    blob = await heic2any({ blob: file, toType: "image/jpeg", quality: 0.9 });
  } catch (err) {
    const msg = err && err.message ? String(err.message) : String(err ?? "unknown");
    throw new Error(msg.includes("ERR_LIBHEIF")
      ? "This HEIC image cannot be decoded by the browser (HEVC/10-bit and similar are unsupported). Export it as JPEG from your photo app and upload again."
      : "HEIC conversion failed: " + msg);
  }
  if (Array.isArray(blob)) blob = blob[0];
  const jpeg = new File([blob], file.name.replace(/\.hei[cf]$/i, ".jpg"), { type: "image/jpeg" });
  return { file: jpeg, converted: true };
}

document.getElementById("upload-form").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = e.currentTarget;
  const status = document.getElementById("upload-status");
  const button = form.querySelector("button");
  const input = form.elements.file;
  if (!input.files || !input.files[0]) return;
  status.className = "muted";
  status.textContent = "Uploading…";
  button.disabled = true;
  try {
    const { file, converted } = await normalizeImage(input.files[0]);
    const res = await fetch("/api/upload", {
      method: "POST",
      headers: { "Content-Type": file.type || "application/octet-stream" },
      body: file,
    });
    const body = await res.json().catch(() => ({}));
    if (!res.ok || !body.ok) throw new Error(body.error || "upload failed");

    const capturedBy = form.elements.capturedBy.value.trim();
    const subjects = form.elements.subjects.value;
    const comment = form.elements.comment.value.trim();
    if (capturedBy || subjects.trim() || comment) {
      const meta = await fetch("/api/metadata", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ key: body.key, capturedBy, subjects, comment }),
      });
      if (!meta.ok) throw new Error("the photo was saved, but its details were not");
    }
    status.textContent = converted ? "Converted HEIC to JPEG and saved." : "Saved.";
    form.reset();
  } catch (err) {
    console.error(err);
    status.className = "error";
    status.textContent = err instanceof Error ? err.message : String(err);
  } finally {
    button.disabled = false;
  }
});
"##;

/// Inline metadata editor on the detail page.
pub const EDITOR: &str = r##"
document.getElementById("metadata-form").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = e.currentTarget;
  const status = document.getElementById("metadata-status");
  const res = await fetch("/api/metadata", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({
      key: form.dataset.key,
      capturedBy: form.elements.capturedBy.value,
      subjects: form.elements.subjects.value,
      comment: form.elements.comment.value,
    }),
  });
  if (res.ok) {
    location.reload();
  } else {
    const body = await res.json().catch(() => ({}));
    status.className = "error";
    status.textContent = body.error || "failed to save";
  }
});
"##;

/// Delete button on the detail page.
pub const DELETE: &str = r##"
document.getElementById("delete-button").addEventListener("click", async (e) => {
  const key = e.currentTarget.dataset.key;
  if (!confirm("Delete this photo?")) return;
  const res = await fetch("/api/photos/delete", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ key }),
  });
  if (res.ok) {
    location.href = "/gallery";
  } else {
    alert("failed to delete");
  }
});
"##;
