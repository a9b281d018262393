use anyhow::{Context, Result};

use crate::api::PropertyManager;

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

/// The manager's own website, with a scheme added when the listing omits one.
pub fn manager_url(manager: &PropertyManager) -> Option<String> {
    let site = manager.website.as_deref()?.trim();
    if site.is_empty() {
        None
    } else if site.starts_with("http://") || site.starts_with("https://") {
        Some(site.to_string())
    } else {
        Some(format!("https://{}", site))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_site(site: Option<&str>) -> PropertyManager {
        PropertyManager {
            website: site.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_manager_url() {
        assert_eq!(manager_url(&with_site(Some("bluedoor.com"))).as_deref(), Some("https://bluedoor.com"));
        assert_eq!(manager_url(&with_site(Some("http://x.io"))).as_deref(), Some("http://x.io"));
        assert_eq!(manager_url(&with_site(Some("  "))), None);
        assert_eq!(manager_url(&with_site(None)), None);
    }
}
