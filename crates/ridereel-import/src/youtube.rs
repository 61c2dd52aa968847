/// Derive a YouTube thumbnail URL from a watch or short-link URL.
///
/// Returns `None` for anything that is not recognizably YouTube or where no
/// video id can be extracted.
pub fn youtube_thumbnail(url: &str) -> Option<String> {
    if !url.contains("youtube.com") && !url.contains("youtu.be") {
        return None;
    }

    let video_id = if let Some(rest) = url.split("youtu.be/").nth(1) {
        rest.split('?').next().unwrap_or("")
    } else if let Some(rest) = url.split("v=").nth(1) {
        rest.split('&').next().unwrap_or("")
    } else {
        ""
    };

    if video_id.is_empty() {
        None
    } else {
        Some(format!(
            "https://img.youtube.com/vi/{}/hqdefault.jpg",
            video_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_link() {
        assert_eq!(
            youtube_thumbnail("https://youtu.be/abc123").as_deref(),
            Some("https://img.youtube.com/vi/abc123/hqdefault.jpg")
        );
    }

    #[test]
    fn short_link_with_query() {
        assert_eq!(
            youtube_thumbnail("https://youtu.be/abc123?t=42").as_deref(),
            Some("https://img.youtube.com/vi/abc123/hqdefault.jpg")
        );
    }

    #[test]
    fn watch_url() {
        assert_eq!(
            youtube_thumbnail("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=x").as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
    }

    #[test]
    fn non_youtube_url() {
        assert_eq!(youtube_thumbnail("https://vimeo.com/12345"), None);
        assert_eq!(
            youtube_thumbnail("https://storage.googleapis.com/sample/BigBuckBunny.mp4"),
            None
        );
    }

    #[test]
    fn youtube_url_without_id() {
        assert_eq!(youtube_thumbnail("https://www.youtube.com/feed"), None);
    }
}
