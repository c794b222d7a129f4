//! Application shell: login, role-gated navigation and the open evaluation

use crate::capture::image::ImageSource;
use crate::config::{AppConfig, PreferenceStore, SIDEBAR_COLLAPSED};
use crate::core::data::DashboardData;
use crate::core::routes::{self, Role, Screen, View};
use crate::session::view::{EvaluationView, ViewportLayout};

/// What the login form submits
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// Role picked in the form, e.g. "evaluator"
    pub role: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        [&self.username, &self.password, &self.role]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// External identity service
pub trait IdentityProvider {
    fn authenticate(&self, credentials: &Credentials) -> anyhow::Result<Role>;
}

/// Accepts any complete credentials and grants the role that was asked for
#[derive(Clone, Copy, Debug, Default)]
pub struct MockIdentity;

impl IdentityProvider for MockIdentity {
    fn authenticate(&self, credentials: &Credentials) -> anyhow::Result<Role> {
        credentials.role.parse()
    }
}

pub struct App<P: PreferenceStore> {
    pub config: AppConfig,
    preferences: P,
    role: Option<Role>,
    screen: Screen,
    sidebar_collapsed: bool,
    evaluation: Option<EvaluationView>,
}

impl<P: PreferenceStore> App<P> {
    pub fn new(config: AppConfig, preferences: P) -> Self {
        let sidebar_collapsed = preferences.get(SIDEBAR_COLLAPSED, false);
        Self {
            config,
            preferences,
            role: None,
            screen: Screen::Login,
            sidebar_collapsed,
            evaluation: None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    /// Sidebar entries for the logged-in role; empty before login
    pub fn nav_items(&self) -> Vec<View> {
        self.role.map(routes::nav_items).unwrap_or_default()
    }

    /// Returns true when the user is now logged in
    pub fn login(&mut self, identity: &dyn IdentityProvider, credentials: &Credentials) -> bool {
        if !credentials.is_complete() {
            log::error!("Login rejected: username, password and role are required");
            return false;
        }
        match identity.authenticate(credentials) {
            Ok(role) => {
                log::info!("{} logged in as {role}", credentials.username);
                self.role = Some(role);
                self.screen = Screen::View(View::Dashboard);
                true
            }
            Err(err) => {
                log::error!("Login failed: {:?}", err);
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.close_evaluation();
        self.role = None;
        self.screen = Screen::Login;
    }

    /// Switch the content area; leaving the evaluation view tears it down
    pub fn navigate(&mut self, view: View) -> Screen {
        let Some(role) = self.role else {
            log::warn!("Navigation to {} before login", view.title());
            return self.screen;
        };
        let screen = routes::route(role, view);
        if screen != Screen::View(View::Assignment) {
            self.close_evaluation();
        }
        self.screen = screen;
        screen
    }

    /// Flip the sidebar and persist the new state
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.preferences
            .set(SIDEBAR_COLLAPSED, self.sidebar_collapsed);
        self.sidebar_collapsed
    }

    /// Open the next workbook for marking
    ///
    /// Only possible from the assignment view; returns `None` elsewhere or
    /// when the data service has nothing queued.
    pub fn open_evaluation(
        &mut self,
        data: &dyn DashboardData,
        source: Box<dyn ImageSource>,
        layout: ViewportLayout,
    ) -> Option<&mut EvaluationView> {
        if self.screen != Screen::View(View::Assignment) {
            log::warn!("Evaluation can only be opened from the assignment view");
            return None;
        }
        let Some(workbook) = data.next_workbook() else {
            log::info!("No workbook waiting for evaluation");
            return None;
        };
        self.close_evaluation();
        let view = EvaluationView::open(workbook, &self.config, source, layout);
        Some(self.evaluation.insert(view))
    }

    pub fn evaluation(&self) -> Option<&EvaluationView> {
        self.evaluation.as_ref()
    }

    fn close_evaluation(&mut self) {
        if let Some(mut view) = self.evaluation.take() {
            view.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::image::PageListSource;
    use crate::config::JsonPreferenceStore;
    use crate::core::data::MockData;
    use crate::domain::BoundingBox;

    fn credentials(role: &str) -> Credentials {
        Credentials {
            username: "asha".to_string(),
            password: "secret".to_string(),
            role: role.to_string(),
        }
    }

    fn layout() -> ViewportLayout {
        let image_box = BoundingBox::new(0.0, 0.0, 400.0, 300.0);
        ViewportLayout {
            image_box,
            parent_box: image_box,
        }
    }

    fn app(dir: &tempfile::TempDir) -> App<JsonPreferenceStore> {
        let prefs = JsonPreferenceStore::new(dir.path().join("prefs.json"));
        App::new(AppConfig::default(), prefs)
    }

    #[test]
    fn test_login_requires_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert!(!app.login(&MockIdentity, &credentials("")));
        assert_eq!(app.screen(), Screen::Login);
        assert!(app.nav_items().is_empty());

        assert!(app.login(&MockIdentity, &credentials("evaluator")));
        assert_eq!(app.role(), Some(Role::Evaluator));
        assert_eq!(app.screen(), Screen::View(View::Dashboard));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert!(!app.login(&MockIdentity, &credentials("superuser")));
        assert_eq!(app.role(), None);
    }

    #[test]
    fn test_navigation_is_role_gated() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        assert_eq!(app.navigate(View::Dashboard), Screen::Login);

        app.login(&MockIdentity, &credentials("user"));
        assert_eq!(
            app.navigate(View::System),
            Screen::AccessDenied(View::System)
        );
        app.logout();
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.role(), None);
    }

    #[test]
    fn test_sidebar_state_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = app(&dir);
        assert!(!first.sidebar_collapsed());
        assert!(first.toggle_sidebar());

        let second = app(&dir);
        assert!(second.sidebar_collapsed());
    }

    #[test]
    fn test_evaluation_opens_only_from_assignment() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        let data = MockData::default();
        app.login(&MockIdentity, &credentials("evaluator"));

        assert!(
            app.open_evaluation(&data, Box::new(PageListSource::default()), layout())
                .is_none()
        );

        app.navigate(View::Assignment);
        let view = app
            .open_evaluation(&data, Box::new(PageListSource::default()), layout())
            .unwrap();
        assert_eq!(view.session().workbook_id(), "W-1234");
        assert!(view.overlay().is_mounted());

        app.navigate(View::Dashboard);
        assert!(app.evaluation().is_none());
    }
}
