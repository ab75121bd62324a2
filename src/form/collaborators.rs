use std::collections::HashMap;

/// Toast-style feedback sink
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier for headless hosts: feedback goes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(notification = "success", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(notification = "error", "{}", message);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationOptions {
    /// Rebuild the target view instead of reusing a cached one
    pub force_reload: bool,
}

impl NavigationOptions {
    pub fn force_reload() -> Self {
        Self { force_reload: true }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, options: NavigationOptions);
}

/// Navigation context a form is opened with: the path segments relative to
/// the resource (`new`, or `<id>/edit`) and the named parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    segments: Vec<String>,
    params: HashMap<String, String>,
}

impl Route {
    pub fn new(segments: Vec<String>, params: HashMap<String, String>) -> Self {
        Self { segments, params }
    }

    /// Route of the create form
    pub fn new_record() -> Self {
        Self::from_path(super::NEW_ROUTE_SEGMENT)
    }

    /// Route of the edit form for `id`
    pub fn edit(id: impl ToString) -> Self {
        Self::from_path(&format!("{}/edit", id.to_string()))
    }

    /// Splits `new` or `<id>/edit` into segments; a first segment other than
    /// `new` is exposed as the `id` parameter.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut params = HashMap::new();
        if let Some(first) = segments.first() {
            if first != super::NEW_ROUTE_SEGMENT {
                params.insert("id".to_string(), first.clone());
            }
        }

        Self { segments, params }
    }

    pub fn first_segment(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
