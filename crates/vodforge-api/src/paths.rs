//! Media path layout under the configured media root.

use vodforge_models::MediaId;

/// Directory the transcoder populates with renditions.
pub fn rendition_dir(media_root: &str, media_id: &MediaId) -> String {
    format!("{}/{}/transcoded", media_root.trim_end_matches('/'), media_id)
}

/// Default thumbnail path, assigned on `ready` only when no thumbnail was
/// ever set.
pub fn default_thumbnail(media_root: &str, media_id: &MediaId) -> String {
    format!("{}/{}/thumbnail.jpg", media_root.trim_end_matches('/'), media_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_rooted_per_media() {
        let id = MediaId::from_string("V1");
        assert_eq!(rendition_dir("data/videos", &id), "data/videos/V1/transcoded");
        assert_eq!(rendition_dir("data/videos/", &id), "data/videos/V1/transcoded");
        assert_eq!(
            default_thumbnail("data/videos", &id),
            "data/videos/V1/thumbnail.jpg"
        );
    }
}
