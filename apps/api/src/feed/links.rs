//! Link derivation for resource cards and the viewer: embeddable player
//! URLs and cover-image URLs from the raw content links admins paste in.

use crate::models::resource::{Resource, ResourceType};

/// Rewrites a content URL into its embeddable form.
///
/// YouTube watch/short links become `/embed/{id}` players; Google Drive
/// share links swap `/view` for `/preview`, which serves without the
/// frame-busting headers. Anything unrecognized passes through
/// unchanged; an empty URL yields nothing to embed.
pub fn embed_url(url: &str, kind: ResourceType) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    match kind {
        ResourceType::Video => {
            if url.contains("youtube.com") || url.contains("youtu.be") {
                if let Some(id) = youtube_id(url) {
                    return Some(format!("https://www.youtube.com/embed/{id}?autoplay=1"));
                }
            }
        }
        ResourceType::Pdf => {
            if url.contains("drive.google.com") {
                if let Some(pos) = url.find("/view") {
                    return Some(format!("{}/preview", &url[..pos]));
                }
            }
        }
    }

    Some(url.to_string())
}

/// Picks the cover image for a resource card.
///
/// An explicit thumbnail wins, with Google Drive links rewritten to the
/// `lh3.googleusercontent.com` host (far more reliable inside an img
/// tag). Failing that, YouTube videos derive the standard frame-0
/// thumbnail. Everything else renders without a cover.
pub fn thumbnail_url(resource: &Resource) -> Option<String> {
    if let Some(explicit) = resource.thumbnail_url.as_deref() {
        if explicit.contains("drive.google.com") {
            if let Some(id) = drive_file_id(explicit) {
                return Some(format!("https://lh3.googleusercontent.com/d/{id}"));
            }
        }
        return Some(explicit.to_string());
    }

    if resource.kind == ResourceType::Video && resource.url.contains("youtube.com") {
        if let Some(id) = query_param_id(&resource.url, "v=", '&') {
            return Some(format!("https://img.youtube.com/vi/{id}/0.jpg"));
        }
    }

    None
}

fn youtube_id(url: &str) -> Option<String> {
    if let Some(id) = query_param_id(url, "v=", '&') {
        return Some(id);
    }
    query_param_id(url, "youtu.be/", '?')
}

fn query_param_id(url: &str, marker: &str, terminator: char) -> Option<String> {
    let rest = url.split(marker).nth(1)?;
    let id = rest.split(terminator).next().unwrap_or_default();
    (!id.is_empty()).then(|| id.to_string())
}

/// Extracts a Drive file id from either `…/d/{id}/…` or `…?id={id}`.
fn drive_file_id(url: &str) -> Option<String> {
    let take_id = |rest: &str| {
        let id: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        (!id.is_empty()).then_some(id)
    };

    if let Some(rest) = url.split("/d/").nth(1) {
        if let Some(id) = take_id(rest) {
            return Some(id);
        }
    }
    for marker in ["?id=", "&id="] {
        if let Some(rest) = url.split(marker).nth(1) {
            if let Some(id) = take_id(rest) {
                return Some(id);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(url: &str) -> Resource {
        Resource {
            id: "v".to_string(),
            title: "Video".to_string(),
            description: String::new(),
            kind: ResourceType::Video,
            url: url.to_string(),
            thumbnail_url: None,
            category: "History".to_string(),
            added_at: 0,
            likes: 0,
            dislikes: 0,
            views: 0,
            is_pinned: false,
        }
    }

    #[test]
    fn test_embed_youtube_watch_link() {
        let embed = embed_url(
            "https://www.youtube.com/watch?v=VEZqarUnVpo&t=10",
            ResourceType::Video,
        );
        assert_eq!(
            embed.as_deref(),
            Some("https://www.youtube.com/embed/VEZqarUnVpo?autoplay=1")
        );
    }

    #[test]
    fn test_embed_youtube_short_link() {
        let embed = embed_url("https://youtu.be/VEZqarUnVpo?si=xyz", ResourceType::Video);
        assert_eq!(
            embed.as_deref(),
            Some("https://www.youtube.com/embed/VEZqarUnVpo?autoplay=1")
        );
    }

    #[test]
    fn test_embed_drive_view_link_becomes_preview() {
        let embed = embed_url(
            "https://drive.google.com/file/d/abc123/view?usp=sharing",
            ResourceType::Pdf,
        );
        assert_eq!(
            embed.as_deref(),
            Some("https://drive.google.com/file/d/abc123/preview")
        );
    }

    #[test]
    fn test_embed_passes_unknown_urls_through() {
        let url = "https://example.com/notes.pdf";
        assert_eq!(embed_url(url, ResourceType::Pdf).as_deref(), Some(url));
    }

    #[test]
    fn test_embed_empty_url_is_none() {
        assert_eq!(embed_url("", ResourceType::Video), None);
    }

    #[test]
    fn test_thumbnail_explicit_wins_over_derivation() {
        let mut resource = video("https://www.youtube.com/watch?v=VEZqarUnVpo");
        resource.thumbnail_url = Some("https://example.com/cover.jpg".to_string());
        assert_eq!(
            thumbnail_url(&resource).as_deref(),
            Some("https://example.com/cover.jpg")
        );
    }

    #[test]
    fn test_thumbnail_rewrites_drive_share_links() {
        let mut resource = video("https://example.com");
        resource.thumbnail_url =
            Some("https://drive.google.com/file/d/abc_12-3/view".to_string());
        assert_eq!(
            thumbnail_url(&resource).as_deref(),
            Some("https://lh3.googleusercontent.com/d/abc_12-3")
        );

        resource.thumbnail_url =
            Some("https://drive.google.com/open?id=xyz789".to_string());
        assert_eq!(
            thumbnail_url(&resource).as_deref(),
            Some("https://lh3.googleusercontent.com/d/xyz789")
        );
    }

    #[test]
    fn test_thumbnail_derives_from_youtube_url() {
        let resource = video("https://www.youtube.com/watch?v=VEZqarUnVpo");
        assert_eq!(
            thumbnail_url(&resource).as_deref(),
            Some("https://img.youtube.com/vi/VEZqarUnVpo/0.jpg")
        );
    }

    #[test]
    fn test_thumbnail_absent_when_nothing_derivable() {
        let resource = video("https://vimeo.com/12345");
        assert_eq!(thumbnail_url(&resource), None);
    }
}
