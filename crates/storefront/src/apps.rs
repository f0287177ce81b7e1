//! Installed sub-applications and the paths that require them.

use mother_vegetables_core::AppKind;

/// Paths that only exist when the matching app is installed.
///
/// Matched exactly against the request path.
pub const GATED_PATHS: &[(&str, AppKind)] = &[
    ("/booking", AppKind::Bookings),
    ("/store", AppKind::Store),
    ("/events", AppKind::Events),
    ("/subscriptions", AppKind::Subscriptions),
];

/// App required to serve `path`, if it is gated.
#[must_use]
pub fn required_app(path: &str) -> Option<AppKind> {
    GATED_PATHS
        .iter()
        .find(|(gated, _)| *gated == path)
        .map(|(_, app)| *app)
}

/// Source of the site's installed apps.
pub trait InstalledApps: Send + Sync {
    fn installed_apps(&self) -> Vec<AppKind>;

    fn is_installed(&self, app: AppKind) -> bool {
        self.installed_apps().contains(&app)
    }
}

/// Installed apps fixed at startup from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticInstalledApps {
    apps: Vec<AppKind>,
}

impl StaticInstalledApps {
    #[must_use]
    pub const fn new(apps: Vec<AppKind>) -> Self {
        Self { apps }
    }
}

impl InstalledApps for StaticInstalledApps {
    fn installed_apps(&self) -> Vec<AppKind> {
        self.apps.clone()
    }

    fn is_installed(&self, app: AppKind) -> bool {
        self.apps.contains(&app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_app_exact_match() {
        assert_eq!(required_app("/booking"), Some(AppKind::Bookings));
        assert_eq!(required_app("/store"), Some(AppKind::Store));
        assert_eq!(required_app("/events"), Some(AppKind::Events));
        assert_eq!(required_app("/subscriptions"), Some(AppKind::Subscriptions));
    }

    #[test]
    fn test_required_app_ignores_other_paths() {
        assert_eq!(required_app("/"), None);
        assert_eq!(required_app("/store/item"), None);
        assert_eq!(required_app("/bookings"), None);
        assert_eq!(required_app("/STORE"), None);
    }

    #[test]
    fn test_static_installed_apps() {
        let apps = StaticInstalledApps::new(vec![AppKind::Store]);
        assert!(apps.is_installed(AppKind::Store));
        assert!(!apps.is_installed(AppKind::Events));
        assert_eq!(apps.installed_apps(), vec![AppKind::Store]);

        assert!(StaticInstalledApps::default().installed_apps().is_empty());
    }
}
