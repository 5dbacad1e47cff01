/// URL utilities
pub mod url {
    /// Image extensions the target platform accepts as uploads.
    pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

    /// Everything after the last `.` in the URL.
    ///
    /// Deliberately naive: query strings and paths without a dot are not
    /// special-cased, so `x.com/page` yields `com/page`.
    pub fn file_extension(url_str: &str) -> &str {
        url_str.rsplit('.').next().unwrap_or("")
    }

    /// Check if URL points directly at an uploadable image file
    pub fn is_image_url(url_str: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&file_extension(url_str))
    }

    /// Check if URL contains one of the known embeddable host markers
    pub fn is_embeddable_url<S: AsRef<str>>(url_str: &str, hosts: &[S]) -> bool {
        hosts.iter().any(|host| url_str.contains(host.as_ref()))
    }
}

/// Time utilities
pub mod time {
    use std::time::Duration;

    /// Format duration in human-readable form
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();

        if total_seconds < 60 {
            format!("{}s", total_seconds)
        } else if total_seconds < 3600 {
            format!("{}m", total_seconds / 60)
        } else if total_seconds < 86400 {
            format!("{}h", total_seconds / 3600)
        } else {
            format!("{}d", total_seconds / 86400)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::url::*;
    use std::time::Duration;

    #[test]
    fn extension_is_text_after_last_dot() {
        assert_eq!(file_extension("https://i.redd.it/abc.jpeg"), "jpeg");
        assert_eq!(file_extension("x.com/img.png"), "png");
        assert_eq!(file_extension("https://v.redd.it/clip.mp4"), "mp4");
    }

    #[test]
    fn image_urls_are_recognised() {
        assert!(is_image_url("https://i.redd.it/abc.jpg"));
        assert!(is_image_url("x.com/img.png"));
        assert!(!is_image_url("https://v.redd.it/clip.mp4"));
        assert!(!is_image_url("https://i.imgur.com/abc.gifv"));
        assert!(!is_image_url("https://i.redd.it/abc.JPG"));
    }

    #[test]
    fn embeddable_hosts_match_by_substring() {
        let hosts = ["imgur", "gfycat"];
        assert!(is_embeddable_url("https://i.imgur.com/abc.gifv", &hosts));
        assert!(is_embeddable_url("https://gfycat.com/SomeClip", &hosts));
        assert!(!is_embeddable_url("https://v.redd.it/clip.mp4", &hosts));
        assert!(!is_embeddable_url("https://imgur.com/a", &[] as &[&str]));
    }

    #[test]
    fn durations_are_humanised() {
        assert_eq!(super::time::format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(super::time::format_duration(Duration::from_secs(120)), "2m");
        assert_eq!(super::time::format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(super::time::format_duration(Duration::from_secs(172_800)), "2d");
    }
}
