//! Host classification helpers.

/// Returns true for Google-operated hosts that never are a final destination.
///
/// Matches `google.<tld>` and `google.<sld>.<tld>` (e.g. `google.co.uk`) with
/// any subdomain, plus Google's static/API/content hosts.
pub fn is_google_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    const SERVICE_DOMAINS: &[&str] = &["gstatic.com", "googleapis.com", "googleusercontent.com"];
    if SERVICE_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    {
        return true;
    }

    let labels: Vec<&str> = host.split('.').collect();
    labels.iter().enumerate().any(|(i, label)| {
        let suffix = &labels[i + 1..];
        *label == "google"
            && (1..=2).contains(&suffix.len())
            && suffix.iter().all(|l| !l.is_empty() && l.len() <= 3)
    })
}

/// Returns true for YouTube hosts.
pub fn is_youtube_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be"
}
